//! Recycle bin routes: browse, restore and purge safe-deleted entities.

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::{get, post},
};
use hrms_core::auth::UserRole;
use hrms_core::cache::StatsKey;
use hrms_core::deletion::EntityKind;
use hrms_core::events::EventAction;
use hrms_db::repositories::{ManifestSummary, RecycleBinRepository};
use hrms_shared::{AppError, FieldErrors};
use serde::Deserialize;

use super::announce;
use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{ListQuery, QueryParams};
use crate::middleware::AuthUser;
use crate::response::{self, AppliedFilters};

const ALL_STATS: [StatsKey; 2] = [StatsKey::EmployeeStatistics, StatsKey::LeaveStatistics];

/// Creates the recycle bin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recycle-bin", get(list_entries))
        .route(
            "/recycle-bin/{deletion_key}",
            get(get_entry).delete(purge_entry),
        )
        .route("/recycle-bin/{deletion_key}/restore", post(restore_entry))
}

/// Filters accepted by `GET /recycle-bin`.
#[derive(Debug, Default, Deserialize)]
pub struct RecycleBinQuery {
    /// `employee`, `department`, `position` or `leave_type`.
    pub entity_type: Option<String>,
}

fn require_manager(auth: &AuthUser) -> ApiResult<()> {
    let allowed = UserRole::parse(auth.role()).is_some_and(|r| r.can_manage_recycle_bin());
    if allowed {
        Ok(())
    } else {
        Err(ApiError(AppError::Forbidden(
            "Only administrators and HR managers may restore or purge deleted records".into(),
        )))
    }
}

/// GET /recycle-bin - Newest deletions first.
async fn list_entries(
    State(state): State<AppState>,
    QueryParams(list): QueryParams<ListQuery>,
    QueryParams(query): QueryParams<RecycleBinQuery>,
) -> ApiResult<Response> {
    let kind = match query.entity_type.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(EntityKind::parse(raw).ok_or_else(|| {
            FieldErrors::single(
                "entity_type",
                "The selected entity type is invalid. Allowed values: employee, department, position, leave_type.",
            )
        })?),
    };
    let page = RecycleBinRepository::new(state.conn())
        .list(kind, list.page())
        .await?;

    let applied = AppliedFilters::new().with("entity_type", kind.map(EntityKind::as_str));
    Ok(response::paginated("Recycle bin retrieved successfully", page, applied))
}

/// GET /recycle-bin/{key} - The manifest with its full snapshot.
async fn get_entry(
    State(state): State<AppState>,
    Path(deletion_key): Path<String>,
) -> ApiResult<Response> {
    let manifest = RecycleBinRepository::new(state.conn())
        .find(&deletion_key)
        .await?;
    Ok(response::ok("Recycle bin entry retrieved successfully", manifest))
}

/// POST /recycle-bin/{key}/restore
async fn restore_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(deletion_key): Path<String>,
) -> ApiResult<Response> {
    require_manager(&auth)?;
    let restored = RecycleBinRepository::new(state.conn())
        .restore(&deletion_key)
        .await?;

    announce(
        &state,
        &ALL_STATS,
        EventAction::Restored,
        &restored.entity_type,
        Some(restored.entity_id),
        restored.entity_label.clone(),
        auth.actor(),
    );
    Ok(response::ok(
        format!("{} restored successfully", restored.entity_label),
        restored,
    ))
}

/// DELETE /recycle-bin/{key} - Discards the snapshot for good.
async fn purge_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(deletion_key): Path<String>,
) -> ApiResult<Response> {
    require_manager(&auth)?;
    let manifest = RecycleBinRepository::new(state.conn())
        .purge(&deletion_key)
        .await?;

    announce(
        &state,
        &[],
        EventAction::Purged,
        &manifest.entity_type,
        Some(manifest.entity_id),
        manifest.entity_label.clone(),
        auth.actor(),
    );
    Ok(response::ok(
        "Recycle bin entry permanently deleted",
        ManifestSummary::from(manifest),
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::{TestApp, employee_body};

    async fn employee_with_language(app: &TestApp) -> i64 {
        let (_, body) = app
            .call(Method::POST, "/api/v1/employees", Some(employee_body("EMP-100")))
            .await;
        let id = body["data"]["id"].as_i64().unwrap();
        let (status, _) = app
            .call(
                Method::POST,
                &format!("/api/v1/employees/{id}/languages"),
                Some(json!({ "language": "Karen", "proficiency": "Native" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        id
    }

    #[tokio::test]
    async fn test_delete_and_restore_round_trip() {
        let app = TestApp::new().await;
        let id = employee_with_language(&app).await;

        let (status, body) = app
            .call(
                Method::DELETE,
                &format!("/api/v1/employees/{id}"),
                Some(json!({ "reason": "Left the organisation" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["snapshot_count"], 2);
        assert_eq!(body["data"]["reason"], "Left the organisation");
        let key = body["data"]["deletion_key"].as_str().unwrap().to_string();

        let (status, _) = app
            .call(Method::GET, &format!("/api/v1/employees/{id}"), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = app
            .call(Method::GET, "/api/v1/recycle-bin?entity_type=employee", None)
            .await;
        assert_eq!(body["pagination"]["total"], 1);
        assert_eq!(body["data"][0]["deletion_key"], key.as_str());

        let (status, body) = app
            .call(Method::POST, &format!("/api/v1/recycle-bin/{key}/restore"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["restored_rows"], 2);

        let (status, body) = app
            .call(Method::GET, &format!("/api/v1/employees/{id}/languages"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        // The manifest is consumed by the restore
        let (status, _) = app
            .call(Method::GET, &format!("/api/v1/recycle-bin/{key}"), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_restore_conflicts_with_recreated_staff_id() {
        let app = TestApp::new().await;
        let id = employee_with_language(&app).await;
        let (_, body) = app
            .call(Method::DELETE, &format!("/api/v1/employees/{id}"), None)
            .await;
        let key = body["data"]["deletion_key"].as_str().unwrap().to_string();

        // Same staff id in the same organization takes the slot
        let (status, _) = app
            .call(Method::POST, "/api/v1/employees", Some(employee_body("EMP-100")))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = app
            .call(Method::POST, &format!("/api/v1/recycle-bin/{key}/restore"), None)
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"]["deletion_key"].is_array());

        let (_, body) = app.call(Method::GET, "/api/v1/recycle-bin", None).await;
        assert_eq!(body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn test_purge_and_role_gate() {
        let app = TestApp::new().await;
        let id = employee_with_language(&app).await;
        let (_, body) = app
            .call(Method::DELETE, &format!("/api/v1/employees/{id}"), None)
            .await;
        let key = body["data"]["deletion_key"].as_str().unwrap().to_string();

        let viewer = app
            .state
            .jwt_service
            .generate_access_token(999, "viewer@hrms.test", "viewer")
            .unwrap();
        let (status, _) = app
            .send(Method::DELETE, &format!("/api/v1/recycle-bin/{key}"), Some(&viewer), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = app
            .send(Method::POST, &format!("/api/v1/recycle-bin/{key}/restore"), Some(&viewer), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Outside the recycle bin the role does not restrict writes.
        let (status, _) = app
            .send(
                Method::POST,
                "/api/v1/departments",
                Some(&viewer),
                Some(json!({ "name": "Outreach" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = app
            .call(Method::DELETE, &format!("/api/v1/recycle-bin/{key}"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app
            .call(Method::POST, &format!("/api/v1/recycle-bin/{key}/restore"), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_entity_type_filter_rejected() {
        let app = TestApp::new().await;
        let (status, body) = app
            .call(Method::GET, "/api/v1/recycle-bin?entity_type=invoice", None)
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"]["entity_type"].is_array());
    }
}
