//! Success envelope shared by every endpoint.
//!
//! ```json
//! { "success": true, "message": "...", "data": ..., "pagination": {...}, "filters": {...} }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hrms_shared::types::{PageResponse, Pagination};
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Body of a successful response.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Always true.
    pub success: bool,
    /// Human summary.
    pub message: String,
    /// Payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Page metadata on list endpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// Echo of the filters that were applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Value>,
}

fn envelope<T: Serialize>(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Response {
    let body = Envelope {
        success: true,
        message: message.into(),
        data,
        pagination: None,
        filters: None,
    };
    (status, Json(body)).into_response()
}

/// 200 with data.
pub fn ok<T: Serialize>(message: impl Into<String>, data: T) -> Response {
    envelope(StatusCode::OK, message, Some(data))
}

/// 201 with the created resource.
pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> Response {
    envelope(StatusCode::CREATED, message, Some(data))
}

/// 202 for work handed to a background worker.
pub fn accepted<T: Serialize>(message: impl Into<String>, data: T) -> Response {
    envelope(StatusCode::ACCEPTED, message, Some(data))
}

/// 200 without data.
pub fn message(message: impl Into<String>) -> Response {
    envelope::<()>(StatusCode::OK, message, None)
}

/// 200 with a page and the filters that produced it.
pub fn paginated<T: Serialize>(
    message: impl Into<String>,
    page: PageResponse<T>,
    applied: AppliedFilters,
) -> Response {
    let body = Envelope {
        success: true,
        message: message.into(),
        data: Some(page.data),
        pagination: Some(page.pagination),
        filters: Some(json!({ "applied_filters": applied.0 })),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Query filters echoed back to list clients. Absent filters are omitted.
#[derive(Debug, Default)]
pub struct AppliedFilters(Map<String, Value>);

impl AppliedFilters {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name` when `value` is set.
    #[must_use]
    pub fn with<T: Serialize>(mut self, name: &str, value: Option<T>) -> Self {
        if let Some(value) = value
            && let Ok(value) = serde_json::to_value(value)
        {
            self.0.insert(name.to_string(), value);
        }
        self
    }
}
