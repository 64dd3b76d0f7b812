//! HTTP server exposing the loaded posts

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::SiteConfig;
use crate::content::loader::ContentLoader;
use crate::content::{PostCollection, PostSummary};
use crate::Site;

/// Site identity served at `/api/site`
#[derive(Debug, Clone, Serialize)]
pub struct SiteInfo {
    pub title: String,
    pub author: String,
    pub url: String,
}

impl From<&SiteConfig> for SiteInfo {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            author: config.author.clone(),
            url: config.url.clone(),
        }
    }
}

/// Server state, shared read-only by every request
pub struct ServerState {
    site: SiteInfo,
    posts: Arc<PostCollection>,
    stylesheet: String,
}

impl ServerState {
    pub fn new(site: SiteInfo, posts: Arc<PostCollection>, stylesheet: String) -> Self {
        Self {
            site,
            posts,
            stylesheet,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    tag: Option<String>,
}

/// Load the posts, then serve them until the process is stopped
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let loader = ContentLoader::new(site);
    let posts = match loader.load_posts() {
        Ok(posts) => posts,
        Err(e) => {
            tracing::warn!("Failed to load blog posts: {}", e);
            PostCollection::empty()
        }
    };
    let stylesheet = loader
        .renderer()
        .highlighter()
        .stylesheet()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build highlight stylesheet: {}", e);
            String::new()
        });

    let state = Arc::new(ServerState::new(
        SiteInfo::from(&site.config),
        Arc::new(posts),
        stylesheet,
    ));
    let app = router(state, site);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    tracing::info!("Serving {} on http://{}:{}", site.config.title, ip, port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router
pub fn router(state: Arc<ServerState>, site: &Site) -> Router {
    Router::new()
        .route("/api/site", get(site_info))
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:slug", get(get_post))
        .route("/highlight.css", get(stylesheet))
        .nest_service("/static", ServeDir::new(&site.static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Site title, author and URL, with post and tag counts
async fn site_info(State(state): State<Arc<ServerState>>) -> Response {
    let tags: serde_json::Map<String, serde_json::Value> = state
        .posts
        .tag_counts()
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), serde_json::Value::from(count)))
        .collect();
    Json(serde_json::json!({
        "title": state.site.title,
        "author": state.site.author,
        "url": state.site.url,
        "post_count": state.posts.len(),
        "tags": tags,
    }))
    .into_response()
}

/// Post summaries, newest first. `?tag=` keeps only posts with that tag.
async fn list_posts(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<ListQuery>,
) -> Response {
    let summaries: Vec<_> = match query.tag.as_deref() {
        Some(tag) => state
            .posts
            .with_tag(tag)
            .map(|p| PostSummary::from(p.as_ref()))
            .collect(),
        None => state
            .posts
            .all()
            .iter()
            .map(|p| PostSummary::from(p.as_ref()))
            .collect(),
    };
    Json(summaries).into_response()
}

/// A single post with its rendered HTML
async fn get_post(State(state): State<Arc<ServerState>>, Path(slug): Path<String>) -> Response {
    match state.posts.get(&slug) {
        Some(post) => Json(post.as_ref()).into_response(),
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

async fn stylesheet(State(state): State<Arc<ServerState>>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        state.stylesheet.clone(),
    )
        .into_response()
}
