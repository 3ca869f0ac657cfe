use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};
use anyhow::{Context, Result};
use rss::{ChannelBuilder, Guid, Item};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::{
    core::blog::Blog,
    models::types::{LoadMore, LoadMorePage, Post, PostPagination},
    theme::{default_theme, ThemeRenderer},
    utils::{date::parse_timestamp, ensure_trailing_slash},
};

/// 生成结果统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateReport {
    pub index_pages: usize,
    pub posts: usize,
}

/// 静态站点生成器
pub struct HtmlGenerator {
    /// 输出目录
    pub output_dir: PathBuf,
    blog: Blog,
    renderer: ThemeRenderer,
}

impl HtmlGenerator {
    /// 创建新的 HTML 生成器
    pub fn new(output_dir: PathBuf, blog: Blog, renderer: ThemeRenderer) -> Self {
        Self {
            output_dir,
            blog,
            renderer,
        }
    }

    /// 生成所有内容
    pub async fn generate(&self) -> Result<GenerateReport> {
        info!("开始生成静态网站...");

        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("创建输出目录失败: {}", self.output_dir.display()))?;

        self.copy_theme_assets()?;

        let index_pages = self.generate_paginated_index().await?;

        let posts = self.blog.all_posts().await.context("获取文章失败")?;
        self.generate_posts(&posts)?;
        self.generate_rss_feed(&posts)?;

        let report = GenerateReport {
            index_pages,
            posts: posts.len(),
        };
        info!(
            "Generated {} index pages and {} posts into {}",
            report.index_pages,
            report.posts,
            self.output_dir.display()
        );
        Ok(report)
    }

    /// 删除输出目录
    pub fn clean(&self) -> Result<()> {
        if self.output_dir.exists() {
            fs::remove_dir_all(&self.output_dir)
                .with_context(|| format!("删除输出目录失败: {}", self.output_dir.display()))?;
            info!("Removed {}", self.output_dir.display());
        }
        Ok(())
    }

    /// 复制主题资源文件，没有主题目录时写出内置资源
    fn copy_theme_assets(&self) -> Result<()> {
        let assets_dir = self.output_dir.join("assets");

        match self.renderer.source_dir() {
            Some(theme_source) => {
                info!("Copying theme assets from {:?}", theme_source);
                for entry in WalkDir::new(&theme_source)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                {
                    let source_path = entry.path();
                    let relative_path = source_path.strip_prefix(&theme_source)?;
                    let target_path = assets_dir.join(relative_path);
                    if let Some(parent) = target_path.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::copy(source_path, target_path)?;
                }
            }
            None => {
                debug!("Writing built-in theme assets");
                for (path, content, _) in default_theme::ASSETS {
                    write_file(&assets_dir.join(path), content)?;
                }
            }
        }

        Ok(())
    }

    /// 首页以及沿游标得到的后续分页
    async fn generate_paginated_index(&self) -> Result<usize> {
        info!("Generating paginated index pages...");

        let mut pagination = self.blog.home().await.context("获取首页失败")?;
        let mut seen = HashSet::new();
        let mut page_num = 1;

        loop {
            let next_cursor = pagination.next_page.clone();
            let load_more = next_cursor.as_ref().map(|_| static_load_more(page_num + 1));
            self.write_index_page(page_num, &pagination, load_more)?;

            match next_cursor {
                Some(cursor) if seen.insert(cursor.clone()) => {
                    pagination = self.blog.load_more(&cursor).await.context("获取下一页失败")?;
                    page_num += 1;
                }
                Some(cursor) => {
                    warn!("Pagination cursor repeated, stopping: {}", cursor);
                    break;
                }
                None => break,
            }
        }

        Ok(page_num)
    }

    fn write_index_page(
        &self,
        page_num: usize,
        pagination: &PostPagination,
        load_more: Option<LoadMore>,
    ) -> Result<()> {
        let html = self.renderer.render_index(pagination, load_more.as_ref())?;

        if page_num == 1 {
            return write_file(&self.output_dir.join("index.html"), &html);
        }

        let page_dir = self.output_dir.join("page").join(page_num.to_string());
        write_file(&page_dir.join("index.html"), &html)?;

        let payload = LoadMorePage {
            results: pagination.results.clone(),
            next_page: pagination.next_page.clone(),
            load_more,
        };
        write_file(&page_dir.join("posts.json"), &serde_json::to_string(&payload)?)
    }

    /// 生成所有文章页面
    fn generate_posts(&self, posts: &[Post]) -> Result<()> {
        info!("Generating post pages...");
        for post in posts {
            let html = self.renderer.render_post(post)?;
            let output_file = self.output_dir.join("post").join(&post.uid).join("index.html");
            write_file(&output_file, &html)?;
            debug!("Generated {}", post.path());
        }
        Ok(())
    }

    /// 生成 RSS feed
    fn generate_rss_feed(&self, posts: &[Post]) -> Result<()> {
        let config = self.blog.config();
        let url_base = config.url.clone().unwrap_or_default();

        let mut posts: Vec<&Post> = posts.iter().collect();
        posts.sort_by_key(|post| std::cmp::Reverse(post.published_at.as_deref().and_then(parse_timestamp)));

        let items: Vec<Item> = posts
            .iter()
            .take(20)
            .map(|post| {
                let link = format!("{}{}", url_base.trim_end_matches('/'), post.path());
                let mut item = Item::default();
                item.set_title(post.title.clone());
                item.set_link(link.clone());
                item.set_guid(Guid {
                    value: link,
                    permalink: true,
                });
                item.set_description(post.subtitle.clone());
                if !post.author.is_empty() {
                    item.set_author(post.author.clone());
                }
                if let Some(date) = post.published_at.as_deref().and_then(parse_timestamp) {
                    item.set_pub_date(date.to_rfc2822());
                }
                item
            })
            .collect();

        let channel = ChannelBuilder::default()
            .title(config.title.clone())
            .link(ensure_trailing_slash(&url_base))
            .description(config.description.clone().unwrap_or_default())
            .language(Some(config.language.replace('_', "-")))
            .items(items)
            .build();

        write_file(&self.output_dir.join("rss.xml"), &channel.to_string())
    }
}

/// 静态模式下第 n 页的“加载更多”链接
pub fn static_load_more(page_num: usize) -> LoadMore {
    LoadMore {
        json: format!("/page/{}/posts.json", page_num),
        href: format!("/page/{}/", page_num),
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("写入文件失败: {}", path.display()))
}
