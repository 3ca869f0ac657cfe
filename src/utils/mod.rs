pub mod date;
pub mod reading;

pub use date::{format_date, format_date_in, DateError};
pub use reading::{reading_time, word_count};

/// 从标题生成 URL 友好的锚点
pub fn slugify(text: &str) -> String {
    slug::slugify(text)
}

/// 确保路径以斜杠结尾
pub fn ensure_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}
