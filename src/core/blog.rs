use tracing::{debug, info, warn};

use crate::cms::{richtext, CmsClient, CmsError, QueryOptions};
use crate::models::config::Config;
use crate::models::document::{Document, PostData};
use crate::models::types::{post_path, Banner, ContentBlock, Post, PostPagination, PostSummary};
use crate::utils::{self, format_date_in, reading_time};

/// 首页列表只需要的字段
const SUMMARY_FIELDS: [&str; 4] = ["uid", "title", "subtitle", "author"];

/// 页面数据加载：从 CMS 取文档并转换为页面结构
#[derive(Debug, Clone)]
pub struct Blog {
    cms: CmsClient,
    config: Config,
}

impl Blog {
    pub fn new(config: Config) -> Result<Self, CmsError> {
        let cms = CmsClient::new(&config.cms)?;
        Ok(Self { cms, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cms(&self) -> &CmsClient {
        &self.cms
    }

    fn doc_type(&self) -> &str {
        &self.config.cms.document_type
    }

    /// 首页第一页
    pub async fn home(&self) -> Result<PostPagination, CmsError> {
        let doc_type = self.doc_type();
        let options = QueryOptions {
            page_size: Some(self.config.cms.page_size.max(1)),
            fetch: SUMMARY_FIELDS
                .iter()
                .map(|field| format!("{}.{}", doc_type, field))
                .collect(),
            ..Default::default()
        };

        let response = self.cms.get_by_type::<PostData>(doc_type, &options).await?;
        let pagination = PostPagination {
            next_page: response.next_page,
            results: response
                .results
                .into_iter()
                .map(|doc| summarize(doc, &self.config.language))
                .collect(),
        };
        info!(
            "Loaded home page: {} posts, more: {}",
            pagination.results.len(),
            pagination.has_more()
        );
        Ok(pagination)
    }

    /// 加载更多：读取游标指向的下一页，结果由调用方追加到当前列表
    pub async fn load_more(&self, cursor: &str) -> Result<PostPagination, CmsError> {
        let response = self.cms.get_page::<PostData>(cursor).await?;
        debug!("Loaded page {} of {}", response.page, response.total_pages);
        Ok(PostPagination {
            next_page: response.next_page,
            results: response
                .results
                .into_iter()
                .map(|doc| summarize(doc, &self.config.language))
                .collect(),
        })
    }

    /// 文章详情
    pub async fn post(&self, uid: &str) -> Result<Post, CmsError> {
        let doc = self.cms.get_by_uid::<PostData>(self.doc_type(), uid).await?;
        Ok(to_post(doc, &self.config.language))
    }

    /// 全部文章，用于静态生成
    pub async fn all_posts(&self) -> Result<Vec<Post>, CmsError> {
        let documents = self
            .cms
            .get_all_by_type::<PostData>(self.doc_type(), &QueryOptions::default())
            .await?;
        Ok(documents
            .into_iter()
            .map(|doc| to_post(doc, &self.config.language))
            .collect())
    }

    /// 所有文章的路径
    pub async fn post_paths(&self) -> Result<Vec<String>, CmsError> {
        let doc_type = self.doc_type();
        let options = QueryOptions {
            fetch: vec![format!("{}.uid", doc_type)],
            ..Default::default()
        };
        let documents = self.cms.get_all_by_type::<PostData>(doc_type, &options).await?;
        Ok(documents
            .iter()
            .filter_map(|doc| doc.uid.as_deref())
            .map(post_path)
            .collect())
    }
}

/// 将 CMS 文档转换为列表摘要
pub fn summarize(doc: Document<PostData>, locale: &str) -> PostSummary {
    PostSummary {
        first_publication_date: display_date(doc.first_publication_date.as_deref(), locale),
        uid: doc.uid.unwrap_or(doc.id),
        title: doc.data.title,
        subtitle: doc.data.subtitle,
        author: doc.data.author,
    }
}

/// 将 CMS 文档转换为文章详情
pub fn to_post(doc: Document<PostData>, locale: &str) -> Post {
    let minutes = reading_time(&doc.data.content);
    let content = doc
        .data
        .content
        .into_iter()
        .map(|group| ContentBlock {
            anchor: utils::slugify(&group.heading),
            body_html: richtext::as_html(&group.body),
            heading: group.heading,
            body: group.body,
        })
        .collect();

    Post {
        first_publication_date: display_date(doc.first_publication_date.as_deref(), locale),
        published_at: doc.first_publication_date,
        uid: doc.uid.unwrap_or(doc.id),
        title: doc.data.title,
        subtitle: doc.data.subtitle,
        author: doc.data.author,
        banner: Banner {
            url: doc.data.banner.url,
            alt: doc.data.banner.alt,
        },
        content,
        reading_time: minutes,
    }
}

fn display_date(raw: Option<&str>, locale: &str) -> Option<String> {
    let raw = raw?;
    match format_date_in(raw, locale) {
        Ok(formatted) => Some(formatted),
        Err(e) => {
            warn!("Ignoring publication date: {}", e);
            None
        }
    }
}
