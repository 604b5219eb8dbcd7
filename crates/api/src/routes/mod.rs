//! API route definitions.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, middleware};
use hrms_core::cache::StatsKey;
use hrms_core::deletion::{BatchDeleteSummary, BatchStatus};
use hrms_core::events::{DomainEvent, EventAction};
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod departments;
pub mod employee_details;
pub mod employees;
pub mod health;
pub mod imports;
pub mod leave_balances;
pub mod leave_types;
pub mod lookups;
pub mod notifications;
pub mod positions;
pub mod recycle_bin;

#[cfg(test)]
pub(crate) mod test_support;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(employees::routes())
        .merge(employee_details::routes())
        .merge(imports::routes())
        .merge(departments::routes())
        .merge(positions::routes())
        .merge(leave_types::routes())
        .merge(leave_balances::routes())
        .merge(lookups::routes())
        .merge(recycle_bin::routes())
        .merge(notifications::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Optional reason for a safe delete, from the body or the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteReason {
    /// Free-text reason stored on the manifest.
    pub reason: Option<String>,
}

impl DeleteReason {
    /// Body reason wins over query reason; blanks count as absent.
    #[must_use]
    pub fn pick(query: Self, body: Option<Self>) -> Option<String> {
        body.and_then(|b| b.reason)
            .or(query.reason)
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
    }
}

/// Ids for a batch delete.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchDeleteRequest {
    /// Ids to delete, processed in order.
    #[serde(default)]
    pub ids: Vec<i32>,
    /// Reason stored on every manifest.
    pub reason: Option<String>,
}

/// Invalidates the affected statistics and queues a notification.
pub(crate) fn announce(
    state: &AppState,
    stats: &[StatsKey],
    action: EventAction,
    entity: &str,
    entity_id: Option<i32>,
    label: impl Into<String>,
    actor: Option<i32>,
) {
    for key in stats {
        state.cache.invalidate(*key);
    }
    state
        .events
        .publish(DomainEvent::new(action, entity, entity_id, label, actor));
}

/// 200 when every id went, 207 when some did, 422 when none did.
pub(crate) fn batch_response(entity: &str, summary: &BatchDeleteSummary) -> Response {
    let (status, message) = match summary.status() {
        BatchStatus::AllSucceeded => (
            StatusCode::OK,
            format!("{} {entity} record(s) moved to the recycle bin", summary.succeeded),
        ),
        BatchStatus::Partial => (
            StatusCode::MULTI_STATUS,
            format!(
                "{} {entity} record(s) deleted, {} failed",
                summary.succeeded, summary.failed
            ),
        ),
        BatchStatus::AllFailed => (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("No {entity} records were deleted"),
        ),
    };

    (
        status,
        Json(json!({
            "success": summary.status() != BatchStatus::AllFailed,
            "message": message,
            "data": summary,
        })),
    )
        .into_response()
}
