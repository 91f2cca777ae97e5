use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use inkpost_core::{ContentIndex, DirSource, Document};
use maud::Markup;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod views;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub content_dir: PathBuf,
    pub site_title: String,
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<ContentIndex>,
    pub site_title: Arc<str>,
}

/// Listing entry for `/api/posts`; the full body is only served per post.
#[derive(Serialize)]
pub struct PostSummary<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub published_at: Option<String>,
    pub summary: &'a str,
}

impl<'a> From<&'a Document> for PostSummary<'a> {
    fn from(doc: &'a Document) -> Self {
        Self {
            slug: &doc.slug,
            title: &doc.title,
            published_at: doc.published_at.map(|d| d.to_string()),
            summary: &doc.summary,
        }
    }
}

pub enum AppError {
    PageNotFound { site_title: Arc<str> },
    ApiNotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::PageNotFound { site_title } => {
                (StatusCode::NOT_FOUND, views::not_found_page(&site_title)).into_response()
            }
            AppError::ApiNotFound => {
                (StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" }))).into_response()
            }
        }
    }
}

/// Load the content directory and build the router.
///
/// Fails if the directory cannot be listed; individual bad posts are only
/// logged.
pub fn build_app(config: ServerConfig) -> Result<Router> {
    let source = DirSource::new(&config.content_dir);
    let index = ContentIndex::build(&source)
        .with_context(|| format!("loading posts from {}", config.content_dir.display()))?;
    Ok(router(Arc::new(index), &config.site_title))
}

pub fn router(index: Arc<ContentIndex>, site_title: &str) -> Router {
    let app_state = AppState { index, site_title: Arc::from(site_title) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/post/:slug", get(post_handler))
        .route("/api/posts", get(api_list_handler))
        .route("/api/posts/:slug", get(api_post_handler))
        .route("/health", get(|| async { "ok" }))
        .fallback(fallback_handler)
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn index_handler(State(state): State<AppState>) -> Markup {
    views::index_page(&state.site_title, state.index.list())
}

pub async fn post_handler(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Markup, AppError> {
    match state.index.find_by_slug(&slug) {
        Some(post) => Ok(views::post_page(&state.site_title, post)),
        None => {
            tracing::debug!(%slug, "no post for slug");
            Err(AppError::PageNotFound { site_title: state.site_title.clone() })
        }
    }
}

pub async fn api_list_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let posts: Vec<PostSummary<'_>> = state.index.list().iter().map(PostSummary::from).collect();
    Json(serde_json::json!(posts))
}

pub async fn api_post_handler(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<Document>, AppError> {
    state.index.find_by_slug(&slug).cloned().map(Json).ok_or(AppError::ApiNotFound)
}

async fn fallback_handler(State(state): State<AppState>) -> AppError {
    AppError::PageNotFound { site_title: state.site_title.clone() }
}
