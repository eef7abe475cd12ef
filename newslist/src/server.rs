use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use rocket::{get, routes, Build, Rocket, State};
use serde::Serialize;
use tokio::sync::watch;

use common::ServerConfig;

use crate::component::{ListState, LoadStatus};
use crate::news::NewsItem;
use crate::render::render_html;

/// Application state stored inside Rocket managed state.
pub struct AppState {
    pub started_at: DateTime<Utc>,
    pub title: String,
    /// Live view of the news list component.
    pub news: watch::Receiver<ListState>,
}

impl AppState {
    pub fn new(title: impl Into<String>, news: watch::Receiver<ListState>) -> Self {
        Self {
            started_at: Utc::now(),
            title: title.into(),
            news,
        }
    }
}

/// Response structure for `/api/status`.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    error_kind: Option<&'static str>,
    error: Option<String>,
    count: usize,
    uptime_seconds: i64,
}

/// The single page: toolbar plus one card per news item.
#[get("/")]
async fn index(state: &State<AppState>) -> RawHtml<String> {
    let snapshot = state.news.borrow().clone();
    RawHtml(render_html(&state.title, &snapshot))
}

#[get("/health")]
async fn health() -> &'static str {
    "OK"
}

/// The current display list, exactly as last delivered by the backend.
#[get("/api/news")]
async fn list_news(state: &State<AppState>) -> Json<Vec<NewsItem>> {
    Json(state.news.borrow().news.clone())
}

#[get("/api/status")]
async fn status(state: &State<AppState>) -> Json<StatusResponse> {
    let snapshot = state.news.borrow();
    let (error_kind, error) = match &snapshot.status {
        LoadStatus::Failed(e) => (Some(e.kind()), Some(e.to_string())),
        _ => (None, None),
    };

    Json(StatusResponse {
        status: snapshot.status.label(),
        error_kind,
        error,
        count: snapshot.news.len(),
        uptime_seconds: (Utc::now() - state.started_at).num_seconds(),
    })
}

/// Assemble the Rocket instance without binding a socket (tests use this directly).
pub fn build_rocket(state: AppState, server: Option<&ServerConfig>) -> Rocket<Build> {
    let mut fig = rocket::Config::figment();
    if let Some(server) = server {
        if let Some(bind) = &server.bind {
            fig = fig.merge(("address", bind.clone()));
        }
        if let Some(port) = server.port {
            fig = fig.merge(("port", port));
        }
    }

    rocket::custom(fig)
        .manage(state)
        .mount("/", routes![index, health, list_news, status])
}

/// Serve the page until Rocket shuts down (SIGINT/SIGTERM etc.).
pub async fn launch_rocket(state: AppState, server: Option<&ServerConfig>) -> Result<()> {
    tracing::info!("Starting Rocket HTTP server");
    build_rocket(state, server)
        .launch()
        .await
        .map_err(|e| anyhow!("Rocket failed: {}", e))?;

    tracing::info!("Rocket HTTP server has shut down");
    Ok(())
}
