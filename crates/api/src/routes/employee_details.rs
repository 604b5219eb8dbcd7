//! Records owned by an employee: employment, languages, educations,
//! children, beneficiaries and funding allocations.

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::{delete, get, put},
};
use hrms_core::cache::StatsKey;
use hrms_core::employee::{
    BeneficiaryInput, ChildInput, EducationInput, EmploymentInput, FundingAllocationInput,
    LanguageInput,
};
use hrms_core::events::EventAction;
use hrms_core::validation::Validated;
use hrms_db::repositories::{DetailKind, EmployeeDetailRepository};
use tracing::info;

use super::announce;
use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::JsonBody;
use crate::middleware::AuthUser;
use crate::response;

/// Creates the employee sub-resource router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/employees/{id}/employment", get(get_employment).put(put_employment))
        .route("/employees/{id}/languages", get(list_languages).post(add_language))
        .route("/employees/{id}/educations", get(list_educations).post(add_education))
        .route("/employees/{id}/children", get(list_children).post(add_child))
        .route(
            "/employees/{id}/beneficiaries",
            get(list_beneficiaries).post(add_beneficiary),
        )
        .route("/employees/{id}/{kind}/{detail_id}", delete(delete_detail))
        .route(
            "/employees/{id}/funding-allocations",
            get(list_funding).post(create_funding),
        )
        .route(
            "/funding-allocations/{id}",
            put(update_funding).delete(delete_funding),
        )
}

fn repo(state: &AppState) -> EmployeeDetailRepository {
    EmployeeDetailRepository::new(state.conn())
}

fn detail_changed(state: &AppState, auth: &AuthUser, entity: &str, employee_id: i32, action: EventAction) {
    announce(
        state,
        &[],
        action,
        entity,
        Some(employee_id),
        format!("employee #{employee_id}"),
        auth.actor(),
    );
}

/// GET /employees/{id}/employment
async fn get_employment(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Response> {
    let employment = repo(&state).employment(id).await?;
    Ok(response::ok("Employment retrieved successfully", employment))
}

/// PUT /employees/{id}/employment - Create or replace the employment record.
async fn put_employment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    JsonBody(input): JsonBody<EmploymentInput>,
) -> ApiResult<Response> {
    input.validate_input()?;
    let employment = repo(&state).upsert_employment(id, input, auth.actor()).await?;

    info!(employee_id = id, employment_id = employment.id, "Employment saved");
    announce(
        &state,
        &[StatsKey::EmployeeStatistics],
        EventAction::Updated,
        "employment",
        Some(id),
        format!("employee #{id}"),
        auth.actor(),
    );
    Ok(response::ok("Employment saved successfully", employment))
}

/// GET /employees/{id}/languages
async fn list_languages(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Response> {
    Ok(response::ok("Languages retrieved successfully", repo(&state).languages(id).await?))
}

/// POST /employees/{id}/languages
async fn add_language(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    JsonBody(input): JsonBody<LanguageInput>,
) -> ApiResult<Response> {
    input.validate_input()?;
    let language = repo(&state).add_language(id, input).await?;
    detail_changed(&state, &auth, "employee_language", id, EventAction::Created);
    Ok(response::created("Language added successfully", language))
}

/// GET /employees/{id}/educations
async fn list_educations(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Response> {
    Ok(response::ok("Educations retrieved successfully", repo(&state).educations(id).await?))
}

/// POST /employees/{id}/educations
async fn add_education(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    JsonBody(input): JsonBody<EducationInput>,
) -> ApiResult<Response> {
    input.validate_input()?;
    let education = repo(&state).add_education(id, input).await?;
    detail_changed(&state, &auth, "employee_education", id, EventAction::Created);
    Ok(response::created("Education added successfully", education))
}

/// GET /employees/{id}/children
async fn list_children(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Response> {
    Ok(response::ok("Children retrieved successfully", repo(&state).children(id).await?))
}

/// POST /employees/{id}/children
async fn add_child(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    JsonBody(input): JsonBody<ChildInput>,
) -> ApiResult<Response> {
    input.validate_input()?;
    let child = repo(&state).add_child(id, input).await?;
    detail_changed(&state, &auth, "employee_child", id, EventAction::Created);
    Ok(response::created("Child added successfully", child))
}

/// GET /employees/{id}/beneficiaries
async fn list_beneficiaries(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Response> {
    Ok(response::ok(
        "Beneficiaries retrieved successfully",
        repo(&state).beneficiaries(id).await?,
    ))
}

/// POST /employees/{id}/beneficiaries
async fn add_beneficiary(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    JsonBody(input): JsonBody<BeneficiaryInput>,
) -> ApiResult<Response> {
    input.validate_input()?;
    let beneficiary = repo(&state).add_beneficiary(id, input).await?;
    detail_changed(&state, &auth, "employee_beneficiary", id, EventAction::Created);
    Ok(response::created("Beneficiary added successfully", beneficiary))
}

/// DELETE /employees/{id}/{kind}/{detail_id}
async fn delete_detail(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, kind, detail_id)): Path<(i32, String, i32)>,
) -> ApiResult<Response> {
    let kind = DetailKind::parse(&kind).ok_or_else(|| ApiError::not_found("Resource"))?;
    repo(&state).delete_detail(kind, id, detail_id).await?;

    info!(employee_id = id, detail_id, kind = kind.label(), "Employee detail deleted");
    detail_changed(&state, &auth, kind.label(), id, EventAction::Deleted);
    Ok(response::message(format!("{} deleted successfully", kind.label())))
}

/// GET /employees/{id}/funding-allocations
async fn list_funding(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Response> {
    Ok(response::ok(
        "Funding allocations retrieved successfully",
        repo(&state).funding_allocations(id).await?,
    ))
}

/// POST /employees/{id}/funding-allocations
async fn create_funding(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    JsonBody(input): JsonBody<FundingAllocationInput>,
) -> ApiResult<Response> {
    input.validate_input()?;
    let allocation = repo(&state).create_funding_allocation(id, input, auth.actor()).await?;

    info!(employee_id = id, allocation_id = allocation.id, "Funding allocation created");
    announce(
        &state,
        &[],
        EventAction::Created,
        "funding_allocation",
        Some(allocation.id),
        allocation.grant_code.clone(),
        auth.actor(),
    );
    Ok(response::created("Funding allocation created successfully", allocation))
}

/// PUT /funding-allocations/{id}
async fn update_funding(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    JsonBody(input): JsonBody<FundingAllocationInput>,
) -> ApiResult<Response> {
    input.validate_input()?;
    let allocation = repo(&state).update_funding_allocation(id, input, auth.actor()).await?;
    announce(
        &state,
        &[],
        EventAction::Updated,
        "funding_allocation",
        Some(allocation.id),
        allocation.grant_code.clone(),
        auth.actor(),
    );
    Ok(response::ok("Funding allocation updated successfully", allocation))
}

/// DELETE /funding-allocations/{id}
async fn delete_funding(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<Response> {
    repo(&state).delete_funding_allocation(id).await?;
    announce(
        &state,
        &[],
        EventAction::Deleted,
        "funding_allocation",
        Some(id),
        "",
        auth.actor(),
    );
    Ok(response::message("Funding allocation deleted successfully"))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{Value, json};

    use crate::routes::test_support::{TestApp, employee_body};

    async fn employee(app: &TestApp) -> i64 {
        let (_, body) = app
            .call(Method::POST, "/api/v1/employees", Some(employee_body("0042")))
            .await;
        body["data"]["id"].as_i64().unwrap()
    }

    fn funding(effort: u32) -> Value {
        json!({
            "grant_code": "GR-1",
            "budget_line_code": "BL-1",
            "level_of_effort": effort,
            "start_date": "2025-01-01",
        })
    }

    #[tokio::test]
    async fn test_language_add_list_delete() {
        let app = TestApp::new().await;
        let id = employee(&app).await;
        let uri = format!("/api/v1/employees/{id}/languages");

        let (status, body) = app
            .call(
                Method::POST,
                &uri,
                Some(json!({ "language": "Karen", "proficiency": "Native" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let language_id = body["data"]["id"].as_i64().unwrap();

        let (_, body) = app.call(Method::GET, &uri, None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, _) = app
            .call(Method::DELETE, &format!("{uri}/{language_id}"), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app
            .call(Method::DELETE, &format!("{uri}/{language_id}"), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Language not found");
    }

    #[tokio::test]
    async fn test_unknown_detail_kind_is_404() {
        let app = TestApp::new().await;
        let id = employee(&app).await;
        let (status, _) = app
            .call(Method::DELETE, &format!("/api/v1/employees/{id}/pets/1"), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_funding_effort_capped_at_hundred() {
        let app = TestApp::new().await;
        let id = employee(&app).await;
        let uri = format!("/api/v1/employees/{id}/funding-allocations");

        let (status, _) = app.call(Method::POST, &uri, Some(funding(70))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = app.call(Method::POST, &uri, Some(funding(40))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"]["level_of_effort"][0]
            .as_str()
            .unwrap()
            .contains("110"));

        let (status, _) = app.call(Method::POST, &uri, Some(funding(30))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_employment_requires_matching_position() {
        let app = TestApp::new().await;
        let id = employee(&app).await;

        let (_, dept) = app
            .call(Method::POST, "/api/v1/departments", Some(json!({ "name": "Clinic" })))
            .await;
        let (_, other) = app
            .call(Method::POST, "/api/v1/departments", Some(json!({ "name": "Finance" })))
            .await;
        let (_, position) = app
            .call(
                Method::POST,
                "/api/v1/positions",
                Some(json!({ "title": "Accountant", "department_id": other["data"]["id"], "level": 2 })),
            )
            .await;

        let (status, body) = app
            .call(
                Method::PUT,
                &format!("/api/v1/employees/{id}/employment"),
                Some(json!({
                    "department_id": dept["data"]["id"],
                    "position_id": position["data"]["id"],
                    "employment_type": "Full-Time",
                    "start_date": "2024-01-01",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"]["position_id"].is_array());

        let (status, body) = app
            .call(
                Method::PUT,
                &format!("/api/v1/employees/{id}/employment"),
                Some(json!({
                    "department_id": other["data"]["id"],
                    "position_id": position["data"]["id"],
                    "employment_type": "Full-Time",
                    "start_date": "2024-01-01",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["employment_type"], "Full-Time");
    }
}
