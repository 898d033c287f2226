use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::{parser, pipeline};
use crate::views;

pub async fn registrado(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let form = if content_type.is_some_and(|ct| ct.contains("multipart/form-data")) {
        parser::parse_multipart(&headers, body)
            .await
            .map_err(AppError::Form)?
    } else {
        parser::parse_body(content_type, &body).map_err(AppError::Form)?
    };

    tracing::debug!(
        "Registration received ({} fields, {} file parts)",
        form.fields.len(),
        form.attachments.len()
    );

    let result = pipeline::run(&state, form).await?;

    if wants_json(&headers) {
        return Ok(Json(json!({
            "ok": true,
            "submission_id": result.submission_id,
            "folder": result.folder,
            "files": result.files,
        }))
        .into_response());
    }

    Ok(Html(views::registro::render_completed(&result)).into_response())
}

/// JSON when the client asks for it ahead of HTML.
fn wants_json(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let json_pos = accept.find("application/json");
    let html_pos = accept.find("text/html");
    match (json_pos, html_pos) {
        (Some(j), Some(h)) => j < h,
        (Some(_), None) => true,
        _ => false,
    }
}
