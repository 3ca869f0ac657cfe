pub mod blog;
pub mod generator;
pub mod server;

pub use blog::Blog;
pub use generator::HtmlGenerator;
pub use server::{AppState, Server};
