use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tera::{Context as TeraContext, Tera};
use tracing::{debug, error, info};

use crate::models::config::Config;
use crate::models::types::{LoadMore, Post, PostPagination};
use crate::theme::default_theme;
use crate::utils::format_date_in;

/// 模板中可用的站点信息
#[derive(Debug, Clone, Serialize)]
struct SiteContext {
    title: String,
    description: Option<String>,
    url: Option<String>,
    lang: String,
}

#[derive(Clone)]
pub struct ThemeRenderer {
    /// 主题目录，使用内置主题时为 None
    pub theme_dir: Option<PathBuf>,
    /// 模板引擎
    pub tera: Tera,
    /// 站点配置
    pub config: Config,
}

impl ThemeRenderer {
    /// 创建主题渲染器：站点目录下的主题覆盖内置模板
    pub fn new(base_dir: &Path, config: Config) -> Result<Self> {
        let theme_dir = base_dir.join("themes").join(&config.theme);
        let layout_dir = theme_dir.join("layout");

        if !layout_dir.exists() {
            debug!("主题目录不存在，使用内置主题: {}", theme_dir.display());
            return Self::embedded(config);
        }

        info!("Loading theme from {}", theme_dir.display());
        let mut tera = Tera::new(&format!("{}/**/*.html", layout_dir.display()))
            .with_context(|| format!("加载主题模板失败: {}", layout_dir.display()))?;
        tera.extend(&Self::builtin_templates()?)?;
        Self::register_filters(&mut tera, &config);

        Ok(ThemeRenderer {
            theme_dir: Some(theme_dir),
            tera,
            config,
        })
    }

    /// 仅使用内置主题
    pub fn embedded(config: Config) -> Result<Self> {
        let mut tera = Self::builtin_templates()?;
        Self::register_filters(&mut tera, &config);
        Ok(ThemeRenderer {
            theme_dir: None,
            tera,
            config,
        })
    }

    fn builtin_templates() -> Result<Tera> {
        let mut tera = Tera::default();
        tera.add_raw_templates(default_theme::LAYOUTS)?;
        Ok(tera)
    }

    /// 注册模板过滤器
    fn register_filters(tera: &mut Tera, config: &Config) {
        let default_locale = config.language.clone();
        tera.register_filter(
            "date_format",
            move |value: &tera::Value, args: &HashMap<String, tera::Value>| {
                let locale = args
                    .get("locale")
                    .and_then(|l| l.as_str())
                    .unwrap_or(default_locale.as_str());
                match value.as_str().map(|s| format_date_in(s, locale)) {
                    Some(Ok(formatted)) => Ok(tera::Value::String(formatted)),
                    _ => Ok(value.clone()),
                }
            },
        );
    }

    fn base_context(&self) -> TeraContext {
        let mut context = TeraContext::new();
        context.insert(
            "site",
            &SiteContext {
                title: self.config.title.clone(),
                description: self.config.description.clone(),
                url: self.config.url.clone(),
                lang: self.config.language.replace('_', "-"),
            },
        );
        context
    }

    /// 渲染首页
    pub fn render_index(&self, pagination: &PostPagination, load_more: Option<&LoadMore>) -> Result<String> {
        let mut context = self.base_context();
        context.insert("posts", &pagination.results);
        context.insert("next_page", &pagination.next_page);
        context.insert("load_more", &load_more);
        self.render_template("index.html", &context)
    }

    /// 渲染文章页
    pub fn render_post(&self, post: &Post) -> Result<String> {
        let mut context = self.base_context();
        context.insert("post", post);
        self.render_template("post.html", &context)
    }

    /// 渲染错误页
    pub fn render_error(&self, status: u16, message: &str) -> Result<String> {
        let mut context = self.base_context();
        context.insert("status", &status);
        context.insert("message", message);
        self.render_template("error.html", &context)
    }

    /// 检查布局是否存在
    pub fn has_layout(&self, layout: &str) -> bool {
        self.tera.get_template_names().any(|name| name == layout)
    }

    /// 获取主题资源目录
    pub fn source_dir(&self) -> Option<PathBuf> {
        self.theme_dir
            .as_ref()
            .map(|dir| dir.join("source"))
            .filter(|dir| dir.exists())
    }

    pub fn render_template(&self, template_name: &str, context: &TeraContext) -> Result<String> {
        match self.tera.render(template_name, context) {
            Ok(result) => Ok(result),
            Err(e) => {
                error!("模板渲染失败: {} ({:?})", template_name, e);
                Err(anyhow!("模板渲染失败 {}: {}", template_name, e))
            }
        }
    }
}
