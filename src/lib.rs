//! Essay Review
//!
//! Offset-based annotation engine for essay correction, plus the small HTTP
//! server that exposes it.
//!
//! # Modules
//!
//! - `text`: base text, segment rendering and selection resolution
//! - `annotations`: the annotation store, click routing, persistence trait
//! - `html`: highlighted HTML output and the DOM selection adapter
//! - `review`: a review session tying the pieces together
//! - `db`: SQLite persistence
//! - `dashboard`: role to widget table

pub mod annotations;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod html;
pub mod review;
pub mod routes;
pub mod state;
pub mod text;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Full application router with middleware and state
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api/v1", routes::api_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
