//! Employee routes: listing, lookup, full and segmented updates, safe delete
//! and statistics.

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::{delete, get, put},
};
use chrono::Utc;
use hrms_core::cache::StatsKey;
use hrms_core::deletion::EntityKind;
use hrms_core::employee::{
    BankInformation, BasicInformation, EmployeeInput, FamilyInformation, PersonalInformation,
};
use hrms_core::events::EventAction;
use hrms_core::validation::Validated;
use hrms_db::entities::employees;
use hrms_db::repositories::{EmployeeFilter, EmployeeRepository, ManifestSummary, RecycleBinRepository};
use hrms_shared::{AppError, FieldErrors};
use serde::Deserialize;
use tracing::info;

use super::{BatchDeleteRequest, DeleteReason, announce, batch_response};
use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{JsonBody, ListQuery, QueryParams};
use crate::middleware::AuthUser;
use crate::response::{self, AppliedFilters};

const ENTITY: &str = "employee";

/// Creates the employee router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/statistics", get(statistics))
        .route("/employees/batch", delete(batch_delete))
        .route("/employees/staff-id/{staff_id}", get(find_by_staff_id))
        .route(
            "/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route("/employees/{id}/basic-information", put(update_basic))
        .route("/employees/{id}/personal-information", put(update_personal))
        .route("/employees/{id}/family-information", put(update_family))
        .route("/employees/{id}/bank-information", put(update_bank))
}

/// Filters accepted by `GET /employees`.
#[derive(Debug, Default, Deserialize)]
pub struct EmployeeQuery {
    /// Exact organization.
    pub organization: Option<String>,
    /// Exact status.
    pub status: Option<String>,
    /// Exact gender.
    pub gender: Option<String>,
    /// Staff id or name substring.
    pub search: Option<String>,
    /// Department of the current employment.
    pub department_id: Option<i32>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// GET /employees - Paginated, filterable, sortable list.
async fn list_employees(
    State(state): State<AppState>,
    QueryParams(list): QueryParams<ListQuery>,
    QueryParams(query): QueryParams<EmployeeQuery>,
) -> ApiResult<Response> {
    let params = list.params()?;
    let filter = EmployeeFilter {
        organization: non_empty(query.organization),
        status: non_empty(query.status),
        gender: non_empty(query.gender),
        search: non_empty(query.search),
        department_id: query.department_id,
    };

    let page = EmployeeRepository::new(state.conn())
        .list(&filter, &params)
        .await?;

    let applied = AppliedFilters::new()
        .with("organization", filter.organization)
        .with("status", filter.status)
        .with("gender", filter.gender)
        .with("search", filter.search)
        .with("department_id", filter.department_id)
        .with("sort_by", params.sort_by)
        .with("sort_order", list.sort_order);

    Ok(response::paginated("Employees retrieved successfully", page, applied))
}

/// GET /employees/{id} - Employee with everything they own.
async fn get_employee(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Response> {
    let details = EmployeeRepository::new(state.conn()).find_details(id).await?;
    Ok(response::ok("Employee retrieved successfully", details))
}

/// Optional organization narrowing a staff-id lookup.
#[derive(Debug, Default, Deserialize)]
pub struct StaffIdQuery {
    /// Organization to search in.
    pub organization: Option<String>,
}

/// GET /employees/staff-id/{staff_id} - Every employee holding the staff id.
async fn find_by_staff_id(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
    QueryParams(query): QueryParams<StaffIdQuery>,
) -> ApiResult<Response> {
    let organization = non_empty(query.organization);
    let matches = EmployeeRepository::new(state.conn())
        .find_by_staff_id(&staff_id, organization.as_deref())
        .await?;

    if matches.is_empty() {
        return Err(ApiError::not_found("Employee"));
    }
    Ok(response::ok(
        format!("Found {} employee(s) with staff id {staff_id}", matches.len()),
        matches,
    ))
}

/// POST /employees - Full create.
async fn create_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(mut input): JsonBody<EmployeeInput>,
) -> ApiResult<Response> {
    input.normalize();
    input.validate_input()?;

    let employee = EmployeeRepository::new(state.conn())
        .create(input, auth.actor())
        .await?;

    info!(employee_id = employee.id, staff_id = %employee.staff_id, "Employee created");
    announce_change(&state, &auth, EventAction::Created, &employee);
    Ok(response::created("Employee created successfully", employee))
}

/// PUT /employees/{id} - Full update.
async fn update_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    JsonBody(mut input): JsonBody<EmployeeInput>,
) -> ApiResult<Response> {
    input.normalize();
    input.validate_input()?;

    let employee = EmployeeRepository::new(state.conn())
        .update(id, input, auth.actor())
        .await?;

    announce_change(&state, &auth, EventAction::Updated, &employee);
    Ok(response::ok("Employee updated successfully", employee))
}

/// PUT /employees/{id}/basic-information
async fn update_basic(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    JsonBody(mut input): JsonBody<BasicInformation>,
) -> ApiResult<Response> {
    input.normalize();
    input.validate_input()?;
    let employee = EmployeeRepository::new(state.conn())
        .update_basic(id, input, auth.actor())
        .await?;
    announce_change(&state, &auth, EventAction::Updated, &employee);
    Ok(response::ok("Basic information updated successfully", employee))
}

/// PUT /employees/{id}/personal-information
async fn update_personal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    JsonBody(mut input): JsonBody<PersonalInformation>,
) -> ApiResult<Response> {
    input.normalize();
    input.validate_input()?;
    let employee = EmployeeRepository::new(state.conn())
        .update_personal(id, input, auth.actor())
        .await?;
    announce_change(&state, &auth, EventAction::Updated, &employee);
    Ok(response::ok("Personal information updated successfully", employee))
}

/// PUT /employees/{id}/family-information
async fn update_family(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    JsonBody(mut input): JsonBody<FamilyInformation>,
) -> ApiResult<Response> {
    input.normalize();
    input.validate_input()?;
    let employee = EmployeeRepository::new(state.conn())
        .update_family(id, input, auth.actor())
        .await?;
    announce_change(&state, &auth, EventAction::Updated, &employee);
    Ok(response::ok("Family information updated successfully", employee))
}

/// PUT /employees/{id}/bank-information
async fn update_bank(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    JsonBody(mut input): JsonBody<BankInformation>,
) -> ApiResult<Response> {
    input.normalize();
    input.validate_input()?;
    let employee = EmployeeRepository::new(state.conn())
        .update_bank(id, input, auth.actor())
        .await?;
    announce_change(&state, &auth, EventAction::Updated, &employee);
    Ok(response::ok("Bank information updated successfully", employee))
}

fn announce_change(state: &AppState, auth: &AuthUser, action: EventAction, employee: &employees::Model) {
    announce(
        state,
        &[StatsKey::EmployeeStatistics],
        action,
        ENTITY,
        Some(employee.id),
        employee.label(),
        auth.actor(),
    );
}

/// DELETE /employees/{id} - Move the employee and their records to the recycle bin.
async fn delete_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    QueryParams(query): QueryParams<DeleteReason>,
    body: Option<JsonBody<DeleteReason>>,
) -> ApiResult<Response> {
    let reason = DeleteReason::pick(query, body.map(|b| b.0));
    let manifest = RecycleBinRepository::new(state.conn())
        .safe_delete(EntityKind::Employee, id, reason, auth.actor())
        .await?;

    announce(
        &state,
        &[StatsKey::EmployeeStatistics, StatsKey::LeaveStatistics],
        EventAction::Deleted,
        ENTITY,
        Some(id),
        manifest.entity_label.clone(),
        auth.actor(),
    );
    Ok(response::ok("Employee moved to the recycle bin", ManifestSummary::from(manifest)))
}

/// DELETE /employees/batch - Safe delete of many employees with per-id outcomes.
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
            EntityKind::Employee,
            &request.ids,
            request.reason.as_deref(),
            auth.actor(),
        )
        .await;

    if summary.succeeded > 0 {
        announce(
            &state,
            &[StatsKey::EmployeeStatistics, StatsKey::LeaveStatistics],
            EventAction::Deleted,
            ENTITY,
            None,
            format!("{} employees", summary.succeeded),
            auth.actor(),
        );
    }
    Ok(batch_response(ENTITY, &summary))
}

/// GET /employees/statistics - Cached head counts.
async fn statistics(State(state): State<AppState>) -> ApiResult<Response> {
    if let Some(cached) = state.cache.get(StatsKey::EmployeeStatistics, "") {
        return Ok(response::ok("Employee statistics retrieved successfully", &*cached));
    }

    let stats = EmployeeRepository::new(state.conn())
        .statistics(Utc::now().date_naive())
        .await?;
    let value =
        serde_json::to_value(stats).map_err(|e| ApiError(AppError::Internal(e.to_string())))?;
    let cached = state.cache.insert(StatsKey::EmployeeStatistics, "", value);
    Ok(response::ok("Employee statistics retrieved successfully", &*cached))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::{TestApp, employee_body};

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let app = TestApp::new().await;
        let (status, body) = app
            .call(Method::POST, "/api/v1/employees", Some(employee_body("0042")))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        let id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = app.call(Method::GET, &format!("/api/v1/employees/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["staff_id"], "0042");
        assert_eq!(body["data"]["first_name_en"], "Aye");
        assert_eq!(body["data"]["languages"], json!([]));
    }

    #[tokio::test]
    async fn test_create_validation_errors() {
        let app = TestApp::new().await;
        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/employees",
                Some(json!({ "organization": "ACME", "gender": "Female" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        for field in ["organization", "staff_id", "first_name_en", "date_of_birth", "status"] {
            assert!(body["errors"][field].is_array(), "expected error for {field}");
        }
    }

    #[tokio::test]
    async fn test_duplicate_staff_id_is_rejected() {
        let app = TestApp::new().await;
        app.call(Method::POST, "/api/v1/employees", Some(employee_body("0042")))
            .await;
        let (status, body) = app
            .call(Method::POST, "/api/v1/employees", Some(employee_body("0042")))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"]["staff_id"].is_array());
    }

    #[tokio::test]
    async fn test_pagination_total_independent_of_page_size() {
        let app = TestApp::new().await;
        for n in 0..5 {
            app.call(
                Method::POST,
                "/api/v1/employees",
                Some(employee_body(&format!("S{n:03}"))),
            )
            .await;
        }

        let (_, small) = app
            .call(Method::GET, "/api/v1/employees?per_page=2&page=2", None)
            .await;
        let (_, large) = app
            .call(Method::GET, "/api/v1/employees?per_page=50", None)
            .await;
        assert_eq!(small["pagination"]["total"], 5);
        assert_eq!(large["pagination"]["total"], 5);
        assert_eq!(small["data"].as_array().unwrap().len(), 2);
        assert_eq!(small["pagination"]["last_page"], 3);
        assert_eq!(small["pagination"]["has_more_pages"], true);
    }

    #[tokio::test]
    async fn test_list_filters_and_sort_allow_list() {
        let app = TestApp::new().await;
        app.call(Method::POST, "/api/v1/employees", Some(employee_body("A1")))
            .await;
        let mut bhf = employee_body("B1");
        bhf["organization"] = json!("BHF");
        app.call(Method::POST, "/api/v1/employees", Some(bhf)).await;

        let (status, body) = app
            .call(
                Method::GET,
                "/api/v1/employees?organization=BHF&sort_by=staff_id&sort_order=asc",
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["total"], 1);
        assert_eq!(body["data"][0]["staff_id"], "B1");
        assert_eq!(body["filters"]["applied_filters"]["organization"], "BHF");

        let (status, body) = app
            .call(Method::GET, "/api/v1/employees?sort_by=password", None)
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"]["sort_by"].is_array());
    }

    #[tokio::test]
    async fn test_staff_id_lookup() {
        let app = TestApp::new().await;
        app.call(Method::POST, "/api/v1/employees", Some(employee_body("0042")))
            .await;

        let (status, body) = app
            .call(Method::GET, "/api/v1/employees/staff-id/0042", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, _) = app
            .call(Method::GET, "/api/v1/employees/staff-id/0042?organization=BHF", None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_segmented_update() {
        let app = TestApp::new().await;
        let (_, body) = app
            .call(Method::POST, "/api/v1/employees", Some(employee_body("0042")))
            .await;
        let id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = app
            .call(
                Method::PUT,
                &format!("/api/v1/employees/{id}/bank-information"),
                Some(json!({ "bank_account_number": "123-456" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"]["bank_name"].is_array());

        let (status, body) = app
            .call(
                Method::PUT,
                &format!("/api/v1/employees/{id}/bank-information"),
                Some(json!({ "bank_name": "KBank", "bank_account_number": "123-456" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["bank_name"], "KBank");
        assert_eq!(body["data"]["first_name_en"], "Aye");
    }

    #[tokio::test]
    async fn test_missing_employee_is_404() {
        let app = TestApp::new().await;
        let (status, body) = app.call(Method::GET, "/api/v1/employees/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Employee not found");
    }

    #[tokio::test]
    async fn test_statistics_are_invalidated_by_create() {
        let app = TestApp::new().await;
        let (_, before) = app
            .call(Method::GET, "/api/v1/employees/statistics", None)
            .await;
        assert_eq!(before["data"]["total"], 0);

        app.call(Method::POST, "/api/v1/employees", Some(employee_body("0042")))
            .await;
        let (_, after) = app
            .call(Method::GET, "/api/v1/employees/statistics", None)
            .await;
        assert_eq!(after["data"]["total"], 1);
        assert_eq!(after["data"]["by_organization"]["SMRU"], 1);
    }

    #[tokio::test]
    async fn test_batch_delete_statuses() {
        let app = TestApp::new().await;
        let (_, body) = app
            .call(Method::POST, "/api/v1/employees", Some(employee_body("0042")))
            .await;
        let id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = app
            .call(
                Method::DELETE,
                "/api/v1/employees/batch",
                Some(json!({ "ids": [id, 9999] })),
            )
            .await;
        assert_eq!(status, StatusCode::MULTI_STATUS);
        assert_eq!(body["data"]["succeeded"], 1);
        assert_eq!(body["data"]["failed"], 1);

        let (status, _) = app
            .call(Method::DELETE, "/api/v1/employees/batch", Some(json!({ "ids": [9999] })))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = app
            .call(Method::DELETE, "/api/v1/employees/batch", Some(json!({ "ids": [] })))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"]["ids"].is_array());
    }
}
