use thiserror::Error;

/// CMS 访问错误
#[derive(Error, Debug)]
pub enum CmsError {
    #[error("CMS 请求失败: {0}")]
    Request(#[from] reqwest::Error),

    #[error("CMS 响应解析失败: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("CMS 地址无效: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("CMS 拒绝访问，请检查访问令牌")]
    Unauthorized,

    #[error("未找到文档: {0}")]
    NotFound(String),

    #[error("CMS 返回错误状态 {status}: {body}")]
    Status { status: u16, body: String },

    #[error("CMS 未提供主版本 (master ref)")]
    MissingMasterRef,

    #[error("分页游标不属于当前 CMS: {0}")]
    ForeignCursor(String),
}

impl CmsError {
    /// 是否为文档不存在（查询成功但没有结果）
    pub fn is_not_found(&self) -> bool {
        matches!(self, CmsError::NotFound(_))
    }
}
