//! Notification feed built from domain events.

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::{get, post},
};
use hrms_db::repositories::NotificationRepository;
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{ListQuery, QueryParams};
use crate::response::{self, AppliedFilters};

/// Creates the notification router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/{id}/read", post(mark_read))
}

/// Filters accepted by `GET /notifications`.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    /// Hide notifications already read.
    #[serde(default)]
    pub unread_only: bool,
}

/// GET /notifications - Newest first.
async fn list_notifications(
    State(state): State<AppState>,
    QueryParams(list): QueryParams<ListQuery>,
    QueryParams(query): QueryParams<NotificationQuery>,
) -> ApiResult<Response> {
    let page = NotificationRepository::new(state.conn())
        .list(query.unread_only, list.page())
        .await?;
    let applied = AppliedFilters::new().with("unread_only", query.unread_only.then_some(true));
    Ok(response::paginated("Notifications retrieved successfully", page, applied))
}

/// POST /notifications/{id}/read
async fn mark_read(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Response> {
    let notification = NotificationRepository::new(state.conn()).mark_read(id).await?;
    Ok(response::ok("Notification marked as read", notification))
}
