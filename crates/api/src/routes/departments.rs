//! Department routes.

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::{delete, get},
};
use hrms_core::cache::StatsKey;
use hrms_core::deletion::EntityKind;
use hrms_core::events::EventAction;
use hrms_core::organization::DepartmentInput;
use hrms_core::validation::Validated;
use hrms_db::repositories::{DepartmentFilter, DepartmentRepository, ManifestSummary, RecycleBinRepository};
use hrms_shared::FieldErrors;
use serde::Deserialize;

use super::{BatchDeleteRequest, DeleteReason, announce, batch_response};
use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{JsonBody, ListQuery, QueryParams};
use crate::middleware::AuthUser;
use crate::response::{self, AppliedFilters};

const ENTITY: &str = "department";

/// Creates the department router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/departments", get(list_departments).post(create_department))
        .route("/departments/batch", delete(batch_delete))
        .route(
            "/departments/{id}",
            get(get_department)
                .put(update_department)
                .delete(delete_department),
        )
}

/// Filters accepted by `GET /departments`.
#[derive(Debug, Default, Deserialize)]
pub struct DepartmentQuery {
    /// Active flag.
    pub is_active: Option<bool>,
    /// Name or description substring.
    pub search: Option<String>,
}

/// GET /departments
async fn list_departments(
    State(state): State<AppState>,
    QueryParams(list): QueryParams<ListQuery>,
    QueryParams(query): QueryParams<DepartmentQuery>,
) -> ApiResult<Response> {
    let params = list.params()?;
    let filter = DepartmentFilter {
        is_active: query.is_active,
        search: query.search.filter(|s| !s.trim().is_empty()),
    };
    let page = DepartmentRepository::new(state.conn())
        .list(&filter, &params)
        .await?;

    let applied = AppliedFilters::new()
        .with("is_active", filter.is_active)
        .with("search", filter.search)
        .with("sort_by", params.sort_by)
        .with("sort_order", list.sort_order);
    Ok(response::paginated("Departments retrieved successfully", page, applied))
}

/// GET /departments/{id}
async fn get_department(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Response> {
    let department = DepartmentRepository::new(state.conn()).get(id).await?;
    Ok(response::ok("Department retrieved successfully", department))
}

/// POST /departments
async fn create_department(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(mut input): JsonBody<DepartmentInput>,
) -> ApiResult<Response> {
    input.normalize();
    input.validate_input()?;
    let department = DepartmentRepository::new(state.conn())
        .create(input, auth.actor())
        .await?;

    announce(
        &state,
        &[],
        EventAction::Created,
        ENTITY,
        Some(department.id),
        department.name.clone(),
        auth.actor(),
    );
    Ok(response::created("Department created successfully", department))
}

/// PUT /departments/{id}
async fn update_department(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    JsonBody(mut input): JsonBody<DepartmentInput>,
) -> ApiResult<Response> {
    input.normalize();
    input.validate_input()?;
    let department = DepartmentRepository::new(state.conn())
        .update(id, input, auth.actor())
        .await?;

    announce(
        &state,
        &[],
        EventAction::Updated,
        ENTITY,
        Some(department.id),
        department.name.clone(),
        auth.actor(),
    );
    Ok(response::ok("Department updated successfully", department))
}

/// DELETE /departments/{id} - Refused while active positions or employments remain.
async fn delete_department(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    QueryParams(query): QueryParams<DeleteReason>,
    body: Option<JsonBody<DeleteReason>>,
) -> ApiResult<Response> {
    let reason = DeleteReason::pick(query, body.map(|b| b.0));
    let manifest = RecycleBinRepository::new(state.conn())
        .safe_delete(EntityKind::Department, id, reason, auth.actor())
        .await?;

    announce(
        &state,
        &[StatsKey::EmployeeStatistics],
        EventAction::Deleted,
        ENTITY,
        Some(id),
        manifest.entity_label.clone(),
        auth.actor(),
    );
    Ok(response::ok("Department moved to the recycle bin", ManifestSummary::from(manifest)))
}

/// DELETE /departments/batch
async fn batch_delete(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(request): JsonBody<BatchDeleteRequest>,
) -> ApiResult<Response> {
    if request.ids.is_empty() {
        return Err(FieldErrors::single("ids", "The ids field is required.").into());
    }
    let summary = RecycleBinRepository::new(state.conn())
        .batch_delete(
            EntityKind::Department,
            &request.ids,
            request.reason.as_deref(),
            auth.actor(),
        )
        .await;

    if summary.succeeded > 0 {
        announce(
            &state,
            &[StatsKey::EmployeeStatistics],
            EventAction::Deleted,
            ENTITY,
            None,
            format!("{} departments", summary.succeeded),
            auth.actor(),
        );
    }
    Ok(batch_response(ENTITY, &summary))
}
