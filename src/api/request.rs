//! Request payload validation

use crate::batch::{BatchOptions, SiteRecord};
use crate::config::MAX_WORKERS;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

/// Malformed request payloads, reported before any work starts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchInputError {
    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    #[error("Missing websites data")]
    MissingWebsites,

    #[error("Websites must be a list")]
    WebsitesNotList,

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },
}

impl IntoResponse for BatchInputError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

/// Validates a batch request body
///
/// Expected shape:
///
/// ```json
/// {
///     "websites": [{"Name": "...", "Website": "...", "Email": null, "Description": "..."}],
///     "concurrent": true,
///     "max_workers": 10,
///     "max_count": 5
/// }
/// ```
///
/// Only `websites` is required; options that are absent or `null` fall back
/// to `defaults`.
pub fn parse_request(
    body: &Value,
    defaults: &BatchOptions,
) -> Result<(Vec<SiteRecord>, BatchOptions), BatchInputError> {
    let websites = body
        .get("websites")
        .filter(|websites| !websites.is_null())
        .ok_or(BatchInputError::MissingWebsites)?;

    let entries = websites
        .as_array()
        .ok_or(BatchInputError::WebsitesNotList)?;

    let records = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            serde_json::from_value::<SiteRecord>(entry.clone()).map_err(|e| {
                BatchInputError::InvalidField {
                    field: format!("websites[{}]", i),
                    reason: e.to_string(),
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut options = *defaults;

    if let Some(concurrent) = option_field(body, "concurrent") {
        options.concurrent = concurrent
            .as_bool()
            .ok_or_else(|| invalid("concurrent", "expected a boolean"))?;
    }

    if let Some(max_workers) = option_field(body, "max_workers") {
        let max_workers = positive_integer("max_workers", max_workers)?;
        if max_workers > MAX_WORKERS {
            return Err(invalid(
                "max_workers",
                &format!("must be at most {}", MAX_WORKERS),
            ));
        }
        options.max_workers = max_workers;
    }

    if let Some(max_count) = option_field(body, "max_count") {
        options.max_pages = Some(positive_integer("max_count", max_count)?);
    }

    Ok((records, options))
}

fn option_field<'a>(body: &'a Value, name: &str) -> Option<&'a Value> {
    body.get(name).filter(|value| !value.is_null())
}

fn positive_integer(field: &str, value: &Value) -> Result<usize, BatchInputError> {
    value
        .as_u64()
        .filter(|n| *n >= 1)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| invalid(field, "expected a positive integer"))
}

fn invalid(field: &str, reason: &str) -> BatchInputError {
    BatchInputError::InvalidField {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
