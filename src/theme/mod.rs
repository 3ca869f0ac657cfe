pub mod renderer;

pub use renderer::ThemeRenderer;

/// 内置默认主题，站点目录下没有主题时使用
pub mod default_theme {
    pub const LAYOUT_HTML: &str = include_str!("../../themes/default/layout/layout.html");
    pub const INDEX_HTML: &str = include_str!("../../themes/default/layout/index.html");
    pub const POST_HTML: &str = include_str!("../../themes/default/layout/post.html");
    pub const ERROR_HTML: &str = include_str!("../../themes/default/layout/error.html");

    pub const STYLE_CSS: &str = include_str!("../../themes/default/source/css/style.css");
    pub const LOAD_MORE_JS: &str = include_str!("../../themes/default/source/js/load-more.js");

    /// 布局模板：(模板名, 内容)
    pub const LAYOUTS: [(&str, &str); 4] = [
        ("layout.html", LAYOUT_HTML),
        ("index.html", INDEX_HTML),
        ("post.html", POST_HTML),
        ("error.html", ERROR_HTML),
    ];

    /// 静态资源：(相对路径, 内容, MIME 类型)
    pub const ASSETS: [(&str, &str, &str); 2] = [
        ("css/style.css", STYLE_CSS, "text/css; charset=utf-8"),
        ("js/load-more.js", LOAD_MORE_JS, "application/javascript; charset=utf-8"),
    ];

    /// 查找内置资源
    pub fn asset(path: &str) -> Option<(&'static str, &'static str)> {
        ASSETS
            .iter()
            .find(|(name, _, _)| *name == path)
            .map(|(_, content, mime)| (*content, *mime))
    }
}
