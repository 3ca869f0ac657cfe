use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::cms::CmsError;
use crate::core::blog::Blog;
use crate::models::types::{LoadMore, LoadMorePage, PostPagination};
use crate::theme::{default_theme, ThemeRenderer};

/// 请求处理错误
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Cms(#[from] CmsError),

    #[error("页面渲染失败: {0}")]
    Render(#[from] anyhow::Error),

    #[error("请求无效: {0}")]
    BadRequest(String),

    #[error("页面不存在: {0}")]
    NotFound(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Cms(CmsError::NotFound(_)) => StatusCode::NOT_FOUND,
            ServerError::Cms(CmsError::ForeignCursor(_)) => StatusCode::BAD_REQUEST,
            ServerError::Cms(_) => StatusCode::BAD_GATEWAY,
            ServerError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// 展示给访客的信息，不暴露上游细节
    pub fn public_message(&self) -> &'static str {
        match self.status() {
            StatusCode::NOT_FOUND => "Página não encontrada",
            StatusCode::BAD_REQUEST => "Requisição inválida",
            StatusCode::BAD_GATEWAY => "Não foi possível carregar o conteúdo",
            _ => "Erro interno",
        }
    }

    fn log(&self) {
        if self.status().is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status();
        (status, Json(json!({ "error": self.public_message(), "status": status.as_u16() }))).into_response()
    }
}

/// 所有请求共享的只读状态
pub struct AppState {
    pub blog: Blog,
    pub renderer: ThemeRenderer,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(blog: Blog, renderer: ThemeRenderer) -> SharedState {
        Arc::new(Self { blog, renderer })
    }

    /// 将页面结果转换为响应，出错时渲染错误页
    fn page(&self, result: Result<String, ServerError>) -> Response {
        match result {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                e.log();
                let status = e.status();
                match self.renderer.render_error(status.as_u16(), e.public_message()) {
                    Ok(html) => (status, Html(html)).into_response(),
                    Err(_) => (status, e.public_message()).into_response(),
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CursorQuery {
    pub cursor: Option<String>,
}

/// 为下一页游标生成“加载更多”的链接
pub fn load_more_link(cursor: &str) -> LoadMore {
    let encoded: String = url::form_urlencoded::byte_serialize(cursor.as_bytes()).collect();
    LoadMore {
        json: format!("/api/posts?cursor={}", encoded),
        href: format!("/?cursor={}", encoded),
    }
}

fn load_more_page(pagination: PostPagination) -> LoadMorePage {
    LoadMorePage {
        load_more: pagination.next_page.as_deref().map(load_more_link),
        next_page: pagination.next_page,
        results: pagination.results,
    }
}

async fn index(State(state): State<SharedState>, Query(query): Query<CursorQuery>) -> Response {
    let result = async {
        let pagination = match query.cursor.as_deref() {
            Some(cursor) => state.blog.load_more(cursor).await?,
            None => state.blog.home().await?,
        };
        let load_more = pagination.next_page.as_deref().map(load_more_link);
        Ok::<_, ServerError>(state.renderer.render_index(&pagination, load_more.as_ref())?)
    }
    .await;
    state.page(result)
}

async fn post(State(state): State<SharedState>, Path(slug): Path<String>) -> Response {
    let result = async {
        let post = state.blog.post(&slug).await?;
        Ok::<_, ServerError>(state.renderer.render_post(&post)?)
    }
    .await;
    state.page(result)
}

async fn more_posts(
    State(state): State<SharedState>,
    Query(query): Query<CursorQuery>,
) -> Result<Json<LoadMorePage>, ServerError> {
    let cursor = query
        .cursor
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ServerError::BadRequest("missing cursor".to_string()))?;
    let pagination = state.blog.load_more(&cursor).await?;
    Ok(Json(load_more_page(pagination)))
}

async fn builtin_asset(Path(path): Path<String>) -> Response {
    match default_theme::asset(&path) {
        Some((content, mime)) => ([(header::CONTENT_TYPE, mime)], content).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn not_found(State(state): State<SharedState>) -> Response {
    state.page(Err(ServerError::NotFound("route".to_string())))
}

/// 构建路由
pub fn router(state: SharedState) -> Router {
    let assets = match state.renderer.source_dir() {
        Some(dir) => Router::new().nest_service("/assets", ServeDir::new(dir)),
        None => Router::new().route("/assets/*path", get(builtin_asset)),
    };

    Router::new()
        .route("/", get(index))
        .route("/post/:slug", get(post))
        .route("/api/posts", get(more_posts))
        .fallback(not_found)
        .with_state(state)
        .merge(assets)
        .layer(TraceLayer::new_for_http())
}

/// HTTP 服务器
pub struct Server {
    state: SharedState,
    host: String,
    port: u16,
}

impl Server {
    /// 创建新的服务器
    pub fn new(state: SharedState, host: String, port: u16) -> Self {
        Self { state, host, port }
    }

    /// 启动服务器，Ctrl+C 时退出
    pub async fn start(self) -> Result<()> {
        let app = router(self.state);

        let addr: SocketAddr = format!("{}:{}", self.host, self.port).parse()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Server started at http://localhost:{}", self.port);

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for shutdown signal: {}", e);
                }
                info!("Shutting down server");
            })
            .await?;

        Ok(())
    }
}
