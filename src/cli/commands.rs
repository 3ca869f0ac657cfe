use crate::core::{AppState, Blog, HtmlGenerator, Server};
use crate::models::config::Config;
use crate::theme::{default_theme, ThemeRenderer};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 指定站点目录
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 初始化新的站点目录
    Init(InitArgs),

    /// 生成静态文件
    Generate(GenArgs),

    /// 启动服务器，按请求从 CMS 渲染页面
    Server(ServerArgs),

    /// 列出所有文章路径
    Paths,

    /// 清理生成的文件
    Clean,
}

#[derive(Args)]
pub struct InitArgs {
    /// 站点目录名称
    #[arg(value_name = "NAME")]
    pub name: String,

    /// 站点标题
    #[arg(short, long)]
    pub title: Option<String>,

    /// CMS 接口地址
    #[arg(short, long)]
    pub endpoint: Option<String>,
}

#[derive(Args)]
pub struct GenArgs {
    /// 输出目录，默认使用配置中的 public_dir
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ServerArgs {
    /// 服务器端口
    #[arg(short, long)]
    pub port: Option<u16>,

    /// 监听地址
    #[arg(long)]
    pub host: Option<String>,
}

// 默认配置模板
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# 站点信息
title: {title}
description: 'Um blog sobre tecnologia'
language: pt_BR

# URL配置
url: http://localhost:4000
theme: default
public_dir: public

# 服务器
server:
  host: 0.0.0.0
  port: 4000

# CMS，可用 PRISMIC_API_ENDPOINT / PRISMIC_ACCESS_TOKEN 覆盖
cms:
  endpoint: {endpoint}
  access_token:
  document_type: posts
  page_size: 1
  timeout_secs: 10
"#;

/// 初始化网站文件结构：配置文件和默认主题
pub fn initialize_site_structure(site_path: &Path, site_title: &str, endpoint: &str) -> Result<()> {
    let theme_dir = site_path.join("themes").join("default");
    let layout_dir = theme_dir.join("layout");
    let source_dir = theme_dir.join("source");

    fs::create_dir_all(&layout_dir)?;
    fs::create_dir_all(&source_dir)?;

    let config_content = DEFAULT_CONFIG_TEMPLATE
        .replace("{title}", site_title)
        .replace("{endpoint}", endpoint);
    fs::write(site_path.join("_config.yml"), config_content)?;

    for (name, content) in default_theme::LAYOUTS {
        fs::write(layout_dir.join(name), content)?;
    }
    for (path, content, _) in default_theme::ASSETS {
        let target = source_dir.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, content)?;
    }

    Ok(())
}

fn load_site(site_path: &Path) -> Result<(Config, Blog, ThemeRenderer)> {
    let config = Config::load(site_path)?;
    let blog = Blog::new(config.clone()).context("创建 CMS 客户端失败")?;
    let renderer = ThemeRenderer::new(site_path, config.clone())?;
    Ok((config, blog, renderer))
}

/// 执行命令
pub async fn execute(cli: Cli) -> Result<()> {
    let site_path = cli.path.clone();

    match cli.command {
        Commands::Init(args) => {
            let site_path = site_path.join(&args.name);

            if site_path.join("_config.yml").exists() {
                anyhow::bail!("站点已存在: {}", site_path.display());
            }
            fs::create_dir_all(&site_path)?;

            let site_title = args.title.unwrap_or_else(|| args.name.clone());
            let endpoint = args
                .endpoint
                .unwrap_or_else(|| Config::default().cms.endpoint);
            initialize_site_structure(&site_path, &site_title, &endpoint)?;

            info!("Initialized new site at: {}", site_path.display());
        }
        Commands::Generate(args) => {
            let (config, blog, renderer) = load_site(&site_path)?;
            let output = args
                .output
                .unwrap_or_else(|| site_path.join(&config.public_dir));
            let generator = HtmlGenerator::new(output, blog, renderer);
            generator.generate().await?;
        }
        Commands::Server(args) => {
            let (config, blog, renderer) = load_site(&site_path)?;
            let host = args.host.unwrap_or(config.server.host);
            let port = args.port.unwrap_or(config.server.port);
            Server::new(AppState::new(blog, renderer), host, port).start().await?;
        }
        Commands::Paths => {
            let (_, blog, _) = load_site(&site_path)?;
            for path in blog.post_paths().await? {
                println!("{}", path);
            }
        }
        Commands::Clean => {
            let (config, blog, renderer) = load_site(&site_path)?;
            let output = site_path.join(&config.public_dir);
            HtmlGenerator::new(output, blog, renderer).clean()?;
        }
    }

    Ok(())
}
