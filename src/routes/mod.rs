//! Route modules for the Essay Review server

pub mod dashboard;
pub mod essays;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Every API route, mounted under `/api/v1`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/health", health::router())
        .nest("/essays", essays::router())
        .nest("/dashboard", dashboard::router())
}
