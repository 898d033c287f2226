pub mod registro;

use std::path::Path;

use axum::routing::{get_service, post};
use axum::Router;
use tower_http::services::ServeFile;

use crate::state::SharedState;

/// The registration page and the two addresses it may post to.
pub fn form_routes(static_dir: &str) -> Router<SharedState> {
    let index = ServeFile::new(Path::new(static_dir).join("index.html"));

    Router::new()
        .route("/", get_service(index).post(registro::registrado))
        .route("/registrado", post(registro::registrado))
}
