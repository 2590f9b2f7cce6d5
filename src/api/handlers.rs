use crate::api::request::{parse_request, BatchInputError};
use crate::api::AppState;
use crate::batch::BatchResult;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

/// `POST /scrape-emails`
///
/// The body is read raw so that a missing or malformed payload maps to this
/// API's own error messages instead of the extractor's rejection.
pub async fn scrape_emails(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<BatchResult>, BatchInputError> {
    tracing::info!("Batch request received ({} bytes)", body.len());

    let value: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|e| BatchInputError::InvalidJson(e.to_string()))?
    };

    let (records, options) = parse_request(&value, &state.defaults).map_err(|e| {
        tracing::warn!("Rejected batch request: {}", e);
        e
    })?;

    let result = state.runner.run_batch(records, &options).await;
    Ok(Json(result))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "email-scraper" }))
}
