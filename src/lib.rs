pub mod cli;
pub mod cms;
pub mod core;
pub mod models;
pub mod theme;
pub mod utils;

// Re-export commonly used types
pub use crate::cms::{CmsClient, CmsError};
pub use crate::core::{Blog, HtmlGenerator, Server};
pub use crate::models::{Config, Post, PostPagination, PostSummary};
pub use crate::theme::renderer::ThemeRenderer;
