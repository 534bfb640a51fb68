//! HTTP route handlers.

pub mod facet;
pub mod health;
pub mod helpers;
pub mod similar;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router with every route and the tracing layer.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(similar::router())
        .merge(facet::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
