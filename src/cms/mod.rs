pub mod client;
pub mod error;
pub mod richtext;

pub use client::{CmsClient, QueryOptions};
pub use error::CmsError;
