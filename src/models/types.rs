use serde::{Deserialize, Serialize};

use crate::models::document::RichText;

/// 文章详情页使用的结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// 文章唯一标识（URL 别名）
    pub uid: String,
    /// 已格式化的首次发布日期
    pub first_publication_date: Option<String>,
    /// CMS 返回的原始发布时间
    pub published_at: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub banner: Banner,
    pub content: Vec<ContentBlock>,
    /// 阅读时间（分钟）
    pub reading_time: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Banner {
    pub url: String,
    pub alt: Option<String>,
}

/// 文章正文的一个段落
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    pub heading: String,
    /// 标题锚点
    pub anchor: String,
    pub body: RichText,
    /// 渲染后的 HTML
    pub body_html: String,
}

/// 首页列表中的文章摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub uid: String,
    pub first_publication_date: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

/// 一页文章以及下一页游标
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostPagination {
    pub next_page: Option<String>,
    pub results: Vec<PostSummary>,
}

/// “加载更多”按钮指向的下一页
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadMore {
    /// 脚本读取的 JSON 地址
    pub json: String,
    /// 不启用脚本时跳转的页面
    pub href: String,
}

/// 加载更多接口返回的数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadMorePage {
    pub results: Vec<PostSummary>,
    pub next_page: Option<String>,
    pub load_more: Option<LoadMore>,
}

impl PostPagination {
    /// 将下一页追加到当前列表，并采用新的游标
    pub fn extend(&mut self, next: PostPagination) {
        self.results.extend(next.results);
        self.next_page = next.next_page;
    }

    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }
}

impl Post {
    /// 文章路径
    pub fn path(&self) -> String {
        post_path(&self.uid)
    }
}

impl PostSummary {
    pub fn path(&self) -> String {
        post_path(&self.uid)
    }
}

pub fn post_path(uid: &str) -> String {
    format!("/post/{}", uid)
}
