use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::cms::error::CmsError;
use crate::models::config::CmsConfig;
use crate::models::document::{ApiInfo, Document, SearchResponse};

/// 查询参数
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub page_size: Option<u32>,
    pub page: Option<u32>,
    /// 只返回这些字段，例如 posts.title
    pub fetch: Vec<String>,
    /// 排序，例如 [document.first_publication_date desc]
    pub orderings: Option<String>,
}

/// 无头 CMS 的 REST 客户端
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    endpoint: Url,
    access_token: Option<String>,
}

impl CmsClient {
    /// 根据配置创建客户端
    pub fn new(config: &CmsConfig) -> Result<Self, CmsError> {
        let endpoint = Url::parse(config.endpoint.trim_end_matches('/'))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            access_token: config.access_token.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// 获取当前发布版本的 ref，每次查询都需要带上
    pub async fn master_ref(&self) -> Result<String, CmsError> {
        let mut request = self.http.get(self.endpoint.clone());
        if let Some(token) = &self.access_token {
            request = request.query(&[("access_token", token)]);
        }
        let info: ApiInfo = self.send(request).await?;

        info.refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or(CmsError::MissingMasterRef)
    }

    /// 按文档类型查询一页
    pub async fn get_by_type<T: DeserializeOwned>(
        &self,
        doc_type: &str,
        options: &QueryOptions,
    ) -> Result<SearchResponse<T>, CmsError> {
        let master_ref = self.master_ref().await?;
        self.search_type(&master_ref, doc_type, options).await
    }

    /// 沿 next_page 取回某类型的全部文档
    pub async fn get_all_by_type<T: DeserializeOwned>(
        &self,
        doc_type: &str,
        options: &QueryOptions,
    ) -> Result<Vec<Document<T>>, CmsError> {
        let master_ref = self.master_ref().await?;
        let mut options = options.clone();
        if options.page_size.is_none() {
            options.page_size = Some(100);
        }

        let mut page = self.search_type::<T>(&master_ref, doc_type, &options).await?;
        let mut documents = Vec::new();
        loop {
            documents.append(&mut page.results);
            match page.next_page.take() {
                Some(next) => page = self.get_page(&next).await?,
                None => break,
            }
        }

        debug!("Fetched {} documents of type {}", documents.len(), doc_type);
        Ok(documents)
    }

    /// 按 uid 查询单个文档
    pub async fn get_by_uid<T: DeserializeOwned>(
        &self,
        doc_type: &str,
        uid: &str,
    ) -> Result<Document<T>, CmsError> {
        let master_ref = self.master_ref().await?;
        let predicate = format!(
            "[[at(my.{}.uid,\"{}\")]]",
            doc_type,
            uid.replace('\\', "\\\\").replace('"', "\\\"")
        );
        let params = vec![
            ("ref".to_string(), master_ref),
            ("q".to_string(), predicate),
            ("pageSize".to_string(), "1".to_string()),
        ];

        let response: SearchResponse<T> = self.search(params).await?;
        response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| CmsError::NotFound(format!("{}/{}", doc_type, uid)))
    }

    /// 读取 CMS 给出的下一页游标
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        cursor: &str,
    ) -> Result<SearchResponse<T>, CmsError> {
        let url = self.check_cursor(cursor)?;
        debug!("Fetching next page: {}", url);
        self.send(self.http.get(url)).await
    }

    /// 游标必须指向已配置的 CMS，避免服务端请求任意地址
    pub fn check_cursor(&self, cursor: &str) -> Result<Url, CmsError> {
        let url = Url::parse(cursor).map_err(|_| CmsError::ForeignCursor(cursor.to_string()))?;
        let base = self.endpoint.path().trim_end_matches('/');
        let inside = url.path() == base
            || url
                .path()
                .strip_prefix(base)
                .is_some_and(|rest| rest.starts_with('/'));
        if url.origin() != self.endpoint.origin() || !inside {
            warn!("Rejected pagination cursor outside the CMS: {}", cursor);
            return Err(CmsError::ForeignCursor(cursor.to_string()));
        }
        Ok(url)
    }

    async fn search_type<T: DeserializeOwned>(
        &self,
        master_ref: &str,
        doc_type: &str,
        options: &QueryOptions,
    ) -> Result<SearchResponse<T>, CmsError> {
        let mut params = vec![
            ("ref".to_string(), master_ref.to_string()),
            ("q".to_string(), format!("[[at(document.type,\"{}\")]]", doc_type)),
        ];
        if let Some(size) = options.page_size {
            params.push(("pageSize".to_string(), size.to_string()));
        }
        if let Some(page) = options.page {
            params.push(("page".to_string(), page.to_string()));
        }
        if !options.fetch.is_empty() {
            params.push(("fetch".to_string(), options.fetch.join(",")));
        }
        if let Some(orderings) = &options.orderings {
            params.push(("orderings".to_string(), orderings.clone()));
        }
        self.search(params).await
    }

    async fn search<T: DeserializeOwned>(
        &self,
        mut params: Vec<(String, String)>,
    ) -> Result<SearchResponse<T>, CmsError> {
        if let Some(token) = &self.access_token {
            params.push(("access_token".to_string(), token.clone()));
        }
        let url = Url::parse(&format!("{}/documents/search", self.endpoint.as_str().trim_end_matches('/')))?;
        debug!("CMS query {} {:?}", url, params.iter().filter(|(k, _)| k != "access_token").collect::<Vec<_>>());

        self.send(self.http.get(url).query(&params)).await
    }

    async fn send<R: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<R, CmsError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().to_string();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(CmsError::Unauthorized);
        }
        let body = response.text().await?;
        if !status.is_success() {
            warn!("CMS responded {} for {}", status, url);
            return Err(CmsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: &str) -> CmsClient {
        CmsClient::new(&CmsConfig {
            endpoint: endpoint.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn accepts_cursor_on_same_cms() {
        let cms = client("https://spacetraveling.cdn.prismic.io/api/v2/");
        let cursor = "https://spacetraveling.cdn.prismic.io/api/v2/documents/search?ref=X&page=2&pageSize=1";
        assert!(cms.check_cursor(cursor).is_ok());
    }

    #[test]
    fn rejects_foreign_cursor() {
        let cms = client("https://spacetraveling.cdn.prismic.io/api/v2");
        for cursor in [
            "https://evil.example.com/api/v2/documents/search?page=2",
            "http://spacetraveling.cdn.prismic.io/api/v2/documents/search",
            "https://spacetraveling.cdn.prismic.io/admin",
            "https://spacetraveling.cdn.prismic.io/api/v2-other/documents/search",
            "not a url",
        ] {
            assert!(
                matches!(cms.check_cursor(cursor), Err(CmsError::ForeignCursor(_))),
                "{}",
                cursor
            );
        }
    }

    #[test]
    fn invalid_endpoint_is_an_error() {
        let result = CmsClient::new(&CmsConfig {
            endpoint: "::nope".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(CmsError::InvalidUrl(_))));
    }
}
