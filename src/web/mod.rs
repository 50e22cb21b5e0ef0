pub mod dashboard;
pub mod views;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use chrono_tz::Tz;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::board::ActivityBoardController;
use crate::client::ActivitiesClient;
use crate::models::Config;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) board: Arc<ActivityBoardController>,
    pub(crate) title: Arc<str>,
    pub(crate) timezone: Tz,
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard::index_handler))
        .route("/signup", post(dashboard::signup_handler))
        .route("/click", post(dashboard::click_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: Config, addr: &str) -> Result<()> {
    let timezone: Tz = config
        .server
        .timezone
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid timezone {:?}: {}", config.server.timezone, e))?;
    let api = ActivitiesClient::new(&config.backend.base_url)?;
    let board = ActivityBoardController::new(
        Arc::new(api),
        Duration::from_secs(config.notification.hide_after_secs),
    );
    let state = AppState {
        board: Arc::new(board),
        title: Arc::from(config.server.title.as_str()),
        timezone,
    };

    let app = router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(
        "Activity board listening on http://{} (backend {})",
        addr, config.backend.base_url
    );
    axum::serve(listener, app).await?;
    Ok(())
}
