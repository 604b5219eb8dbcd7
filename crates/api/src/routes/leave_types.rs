//! Leave type routes.

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::get,
};
use hrms_core::cache::StatsKey;
use hrms_core::deletion::EntityKind;
use hrms_core::events::EventAction;
use hrms_core::leave::LeaveTypeInput;
use hrms_core::validation::Validated;
use hrms_db::repositories::{LeaveTypeRepository, ManifestSummary, RecycleBinRepository};

use super::{DeleteReason, announce};
use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{JsonBody, QueryParams};
use crate::middleware::AuthUser;
use crate::response;

const ENTITY: &str = "leave_type";

/// Creates the leave type router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/leave-types", get(list_leave_types).post(create_leave_type))
        .route(
            "/leave-types/{id}",
            get(get_leave_type)
                .put(update_leave_type)
                .delete(delete_leave_type),
        )
}

/// GET /leave-types - All types, by name.
async fn list_leave_types(State(state): State<AppState>) -> ApiResult<Response> {
    let types = LeaveTypeRepository::new(state.conn()).list().await?;
    Ok(response::ok("Leave types retrieved successfully", types))
}

/// GET /leave-types/{id}
async fn get_leave_type(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Response> {
    let leave_type = LeaveTypeRepository::new(state.conn()).get(id).await?;
    Ok(response::ok("Leave type retrieved successfully", leave_type))
}

/// POST /leave-types
async fn create_leave_type(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(mut input): JsonBody<LeaveTypeInput>,
) -> ApiResult<Response> {
    input.normalize();
    input.validate_input()?;
    let leave_type = LeaveTypeRepository::new(state.conn())
        .create(input, auth.actor())
        .await?;

    announce(
        &state,
        &[],
        EventAction::Created,
        ENTITY,
        Some(leave_type.id),
        leave_type.name.clone(),
        auth.actor(),
    );
    Ok(response::created("Leave type created successfully", leave_type))
}

/// PUT /leave-types/{id}
async fn update_leave_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    JsonBody(mut input): JsonBody<LeaveTypeInput>,
) -> ApiResult<Response> {
    input.normalize();
    input.validate_input()?;
    let leave_type = LeaveTypeRepository::new(state.conn())
        .update(id, input, auth.actor())
        .await?;

    // Statistics carry the type name.
    announce(
        &state,
        &[StatsKey::LeaveStatistics],
        EventAction::Updated,
        ENTITY,
        Some(leave_type.id),
        leave_type.name.clone(),
        auth.actor(),
    );
    Ok(response::ok("Leave type updated successfully", leave_type))
}

/// DELETE /leave-types/{id} - Refused while any balance has used days.
async fn delete_leave_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    QueryParams(query): QueryParams<DeleteReason>,
    body: Option<JsonBody<DeleteReason>>,
) -> ApiResult<Response> {
    let reason = DeleteReason::pick(query, body.map(|b| b.0));
    let manifest = RecycleBinRepository::new(state.conn())
        .safe_delete(EntityKind::LeaveType, id, reason, auth.actor())
        .await?;

    announce(
        &state,
        &[StatsKey::LeaveStatistics],
        EventAction::Deleted,
        ENTITY,
        Some(id),
        manifest.entity_label.clone(),
        auth.actor(),
    );
    Ok(response::ok("Leave type moved to the recycle bin", ManifestSummary::from(manifest)))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::TestApp;

    #[tokio::test]
    async fn test_leave_type_crud() {
        let app = TestApp::new().await;
        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/leave-types",
                Some(json!({ "name": "Annual Leave", "default_duration": 26 })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = app
            .call(Method::POST, "/api/v1/leave-types", Some(json!({ "name": "Annual Leave" })))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"]["name"].is_array());

        let (status, body) = app
            .call(
                Method::PUT,
                &format!("/api/v1/leave-types/{id}"),
                Some(json!({ "name": "Annual Leave", "requires_attachment": true })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["requires_attachment"], true);

        let (_, body) = app.call(Method::GET, "/api/v1/leave-types", None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_negative_duration_rejected() {
        let app = TestApp::new().await;
        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/leave-types",
                Some(json!({ "name": "Sick Leave", "default_duration": -1 })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"]["default_duration"].is_array());
    }
}
