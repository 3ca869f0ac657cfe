pub mod config;
pub mod document;
pub mod types;

pub use config::{CmsConfig, Config, ServerConfig};
pub use document::{Document, PostData, RichText, RichTextBlock, SearchResponse, Span};
pub use types::{Banner, ContentBlock, LoadMore, LoadMorePage, Post, PostPagination, PostSummary};
