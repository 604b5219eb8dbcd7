//! Position routes. Positions form a per-department reporting hierarchy.

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::get,
};
use hrms_core::cache::StatsKey;
use hrms_core::deletion::EntityKind;
use hrms_core::events::EventAction;
use hrms_core::organization::PositionInput;
use hrms_core::validation::Validated;
use hrms_db::repositories::{PositionFilter, PositionRepository, ManifestSummary, RecycleBinRepository};
use serde::Deserialize;

use super::{DeleteReason, announce};
use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{JsonBody, ListQuery, QueryParams};
use crate::middleware::AuthUser;
use crate::response::{self, AppliedFilters};

const ENTITY: &str = "position";

/// Creates the position router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/positions", get(list_positions).post(create_position))
        .route(
            "/positions/{id}",
            get(get_position).put(update_position).delete(delete_position),
        )
}

/// Filters accepted by `GET /positions`.
#[derive(Debug, Default, Deserialize)]
pub struct PositionQuery {
    /// Owning department.
    pub department_id: Option<i32>,
    /// Manager flag.
    pub is_manager: Option<bool>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// GET /positions
async fn list_positions(
    State(state): State<AppState>,
    QueryParams(list): QueryParams<ListQuery>,
    QueryParams(query): QueryParams<PositionQuery>,
) -> ApiResult<Response> {
    let params = list.params()?;
    let filter = PositionFilter {
        department_id: query.department_id,
        is_manager: query.is_manager,
        is_active: query.is_active,
    };
    let page = PositionRepository::new(state.conn())
        .list(&filter, &params)
        .await?;

    let applied = AppliedFilters::new()
        .with("department_id", filter.department_id)
        .with("is_manager", filter.is_manager)
        .with("is_active", filter.is_active)
        .with("sort_by", params.sort_by)
        .with("sort_order", list.sort_order);
    Ok(response::paginated("Positions retrieved successfully", page, applied))
}

/// GET /positions/{id} - With department, manager and direct reports.
async fn get_position(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Response> {
    let details = PositionRepository::new(state.conn()).find_details(id).await?;
    Ok(response::ok("Position retrieved successfully", details))
}

/// POST /positions
async fn create_position(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(mut input): JsonBody<PositionInput>,
) -> ApiResult<Response> {
    input.normalize();
    input.validate_input()?;
    let position = PositionRepository::new(state.conn())
        .create(input, auth.actor())
        .await?;

    announce(
        &state,
        &[],
        EventAction::Created,
        ENTITY,
        Some(position.id),
        position.title.clone(),
        auth.actor(),
    );
    Ok(response::created("Position created successfully", position))
}

/// PUT /positions/{id}
async fn update_position(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    JsonBody(mut input): JsonBody<PositionInput>,
) -> ApiResult<Response> {
    input.normalize();
    input.validate_input()?;
    let position = PositionRepository::new(state.conn())
        .update(id, input, auth.actor())
        .await?;

    announce(
        &state,
        &[],
        EventAction::Updated,
        ENTITY,
        Some(position.id),
        position.title.clone(),
        auth.actor(),
    );
    Ok(response::ok("Position updated successfully", position))
}

/// DELETE /positions/{id} - Refused while subordinates or active employments remain.
async fn delete_position(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    QueryParams(query): QueryParams<DeleteReason>,
    body: Option<JsonBody<DeleteReason>>,
) -> ApiResult<Response> {
    let reason = DeleteReason::pick(query, body.map(|b| b.0));
    let manifest = RecycleBinRepository::new(state.conn())
        .safe_delete(EntityKind::Position, id, reason, auth.actor())
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
    Ok(response::ok("Position moved to the recycle bin", ManifestSummary::from(manifest)))
}
