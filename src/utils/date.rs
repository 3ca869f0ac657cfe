use chrono::{DateTime, FixedOffset, Locale, NaiveDate};
use thiserror::Error;

/// 默认区域
pub const DEFAULT_LOCALE: &str = "pt_BR";

/// 列表和文章页上的日期格式：日 月份缩写 年
const DISPLAY_FORMAT: &str = "%d %b %Y";

#[derive(Error, Debug, PartialEq)]
pub enum DateError {
    #[error("无法解析日期: {0}")]
    Invalid(String),

    #[error("未知区域: {0}")]
    UnknownLocale(String),
}

/// 以默认区域格式化 CMS 返回的 ISO 日期，例如 "15 Mar 2021"
pub fn format_date(iso: &str) -> Result<String, DateError> {
    format_date_in(iso, DEFAULT_LOCALE)
}

/// 以指定区域格式化日期，每个单词首字母大写
pub fn format_date_in(iso: &str, locale: &str) -> Result<String, DateError> {
    let locale = parse_locale(locale)?;
    let formatted = match parse_timestamp(iso) {
        Some(date) => date.format_localized(DISPLAY_FORMAT, locale).to_string(),
        None => {
            let date = NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d")
                .map_err(|_| DateError::Invalid(iso.to_string()))?;
            date.format_localized(DISPLAY_FORMAT, locale).to_string()
        }
    };
    Ok(capitalize_words(&formatted))
}

/// 解析区域名称，接受 pt_BR 和 pt-BR 两种写法
pub fn parse_locale(name: &str) -> Result<Locale, DateError> {
    let normalized = name.trim().replace('-', "_");
    Locale::try_from(normalized.as_str()).map_err(|_| DateError::UnknownLocale(name.to_string()))
}

/// 支持 RFC 3339 以及 CMS 使用的 "+0000" 时区写法
pub fn parse_timestamp(iso: &str) -> Option<DateTime<FixedOffset>> {
    let iso = iso.trim();
    DateTime::parse_from_rfc3339(iso)
        .or_else(|_| DateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
}

fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
