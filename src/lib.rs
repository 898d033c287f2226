pub mod config;
pub mod error;
pub mod graph;
pub mod models;
pub mod routes;
pub mod state;
pub mod submission;
pub mod views;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::graph::GraphError;
use crate::state::{AppState, SharedState};

pub fn build_app(config: Config) -> Result<Router, GraphError> {
    let max_body_size = config.max_body_size;
    let static_dir = config.static_dir.clone();

    let state: SharedState = Arc::new(AppState::new(config)?);

    let body_limits = ServiceBuilder::new()
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(RequestBodyLimitLayer::new(max_body_size));

    // Security headers
    let app = Router::new()
        .merge(routes::form_routes(&static_dir))
        .nest_service("/static", ServeDir::new(&static_dir))
        .route("/health", axum::routing::get(health))
        .layer(body_limits)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state);

    Ok(app)
}

async fn health() -> &'static str {
    "ok"
}
