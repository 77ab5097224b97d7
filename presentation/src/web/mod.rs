//! Browser UI for the research session
//!
//! A single server-rendered page: the sidebar holds the API keys and the
//! help text, the main area follows the session phase
//! (input, review, edit, completed).

mod handlers;
pub mod progress;
pub mod state;
pub mod view;

pub use progress::ActivityFeed;
pub use state::{AgentFactory, ApiKeys, AppState, BuildError};

use axum::{
    Router,
    routing::{get, post},
};
use std::future::Future;
use std::io;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/keys", post(handlers::save_keys))
        .route("/research", post(handlers::research))
        .route("/approve", post(handlers::approve))
        .route("/edit", post(handlers::begin_edit))
        .route("/back", post(handlers::back_to_review))
        .route("/submit", post(handlers::submit_edit))
        .route("/report", post(handlers::open_report))
        .route("/restart", post(handlers::restart))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the UI on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Research UI listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
