//! Leave balance routes and per-year leave statistics.

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::get,
};
use chrono::{Datelike, Utc};
use hrms_core::cache::StatsKey;
use hrms_core::events::EventAction;
use hrms_core::leave::{LeaveBalanceInput, UpdateLeaveBalanceInput};
use hrms_core::validation::Validated;
use hrms_db::repositories::{LeaveBalanceFilter, LeaveBalanceRepository};
use hrms_shared::AppError;
use serde::Deserialize;

use super::announce;
use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{JsonBody, ListQuery, QueryParams};
use crate::middleware::AuthUser;
use crate::response::{self, AppliedFilters};

const ENTITY: &str = "leave_balance";

/// Creates the leave balance router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/leave-balances",
            get(list_balances).post(create_balance),
        )
        .route("/leave-balances/statistics", get(statistics))
        .route(
            "/leave-balances/{id}",
            get(get_balance).put(update_balance).delete(delete_balance),
        )
}

/// Filters accepted by `GET /leave-balances`.
#[derive(Debug, Default, Deserialize)]
pub struct LeaveBalanceQuery {
    /// Owning employee.
    pub employee_id: Option<i32>,
    /// Leave type.
    pub leave_type_id: Option<i32>,
    /// Calendar year.
    pub year: Option<i32>,
}

/// `GET /leave-balances/statistics` query.
#[derive(Debug, Default, Deserialize)]
pub struct StatisticsQuery {
    /// Defaults to the current year.
    pub year: Option<i32>,
}

fn label(balance: &hrms_db::entities::leave_balances::Model) -> String {
    format!(
        "Employee {} leave type {} ({})",
        balance.employee_id, balance.leave_type_id, balance.year
    )
}

/// GET /leave-balances
async fn list_balances(
    State(state): State<AppState>,
    QueryParams(list): QueryParams<ListQuery>,
    QueryParams(query): QueryParams<LeaveBalanceQuery>,
) -> ApiResult<Response> {
    let params = list.params()?;
    let filter = LeaveBalanceFilter {
        employee_id: query.employee_id,
        leave_type_id: query.leave_type_id,
        year: query.year,
    };
    let page = LeaveBalanceRepository::new(state.conn())
        .list(&filter, &params)
        .await?;

    let applied = AppliedFilters::new()
        .with("employee_id", filter.employee_id)
        .with("leave_type_id", filter.leave_type_id)
        .with("year", filter.year)
        .with("sort_by", params.sort_by)
        .with("sort_order", list.sort_order);
    Ok(response::paginated("Leave balances retrieved successfully", page, applied))
}

/// GET /leave-balances/{id}
async fn get_balance(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Response> {
    let balance = LeaveBalanceRepository::new(state.conn()).get(id).await?;
    Ok(response::ok("Leave balance retrieved successfully", balance))
}

/// POST /leave-balances - Remaining days are derived, never accepted.
async fn create_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<LeaveBalanceInput>,
) -> ApiResult<Response> {
    input.validate_input()?;
    let balance = LeaveBalanceRepository::new(state.conn())
        .create(input, auth.actor())
        .await?;

    announce(
        &state,
        &[StatsKey::LeaveStatistics],
        EventAction::Created,
        ENTITY,
        Some(balance.id),
        label(&balance),
        auth.actor(),
    );
    Ok(response::created("Leave balance created successfully", balance))
}

/// PUT /leave-balances/{id}
async fn update_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    JsonBody(input): JsonBody<UpdateLeaveBalanceInput>,
) -> ApiResult<Response> {
    input.validate_input()?;
    let balance = LeaveBalanceRepository::new(state.conn())
        .update(id, &input, auth.actor())
        .await?;

    announce(
        &state,
        &[StatsKey::LeaveStatistics],
        EventAction::Updated,
        ENTITY,
        Some(balance.id),
        label(&balance),
        auth.actor(),
    );
    Ok(response::ok("Leave balance updated successfully", balance))
}

/// DELETE /leave-balances/{id} - Hard delete; balances are not recycled.
async fn delete_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<Response> {
    let balance = LeaveBalanceRepository::new(state.conn()).delete(id).await?;

    announce(
        &state,
        &[StatsKey::LeaveStatistics],
        EventAction::Deleted,
        ENTITY,
        Some(id),
        label(&balance),
        auth.actor(),
    );
    Ok(response::message("Leave balance deleted successfully"))
}

/// GET /leave-balances/statistics - Cached per year.
async fn statistics(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<StatisticsQuery>,
) -> ApiResult<Response> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let scope = year.to_string();
    if let Some(cached) = state.cache.get(StatsKey::LeaveStatistics, &scope) {
        return Ok(response::ok("Leave statistics retrieved successfully", &*cached));
    }

    let stats = LeaveBalanceRepository::new(state.conn())
        .statistics(year)
        .await?;
    let value =
        serde_json::to_value(stats).map_err(|e| ApiError(AppError::Internal(e.to_string())))?;
    let cached = state.cache.insert(StatsKey::LeaveStatistics, &scope, value);
    Ok(response::ok("Leave statistics retrieved successfully", &*cached))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use chrono::{Datelike, Utc};
    use serde_json::{Value, json};

    use crate::routes::test_support::{TestApp, employee_body};

    async fn fixtures(app: &TestApp) -> (i64, i64) {
        let (_, employee) = app
            .call(Method::POST, "/api/v1/employees", Some(employee_body("EMP-001")))
            .await;
        let (_, leave_type) = app
            .call(
                Method::POST,
                "/api/v1/leave-types",
                Some(json!({ "name": "Annual Leave", "default_duration": 10 })),
            )
            .await;
        (
            employee["data"]["id"].as_i64().unwrap(),
            leave_type["data"]["id"].as_i64().unwrap(),
        )
    }

    fn balance_body(employee_id: i64, leave_type_id: i64) -> Value {
        json!({
            "employee_id": employee_id,
            "leave_type_id": leave_type_id,
            "year": Utc::now().year(),
            "total_days": 10,
        })
    }

    #[tokio::test]
    async fn test_remaining_days_follow_used_days() {
        let app = TestApp::new().await;
        let (employee_id, leave_type_id) = fixtures(&app).await;

        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/leave-balances",
                Some(balance_body(employee_id, leave_type_id)),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["used_days"], 0.0);
        assert_eq!(body["data"]["remaining_days"], 10.0);
        let id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = app
            .call(
                Method::PUT,
                &format!("/api/v1/leave-balances/{id}"),
                Some(json!({ "used_days": 4 })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total_days"], 10.0);
        assert_eq!(body["data"]["remaining_days"], 6.0);
    }

    #[tokio::test]
    async fn test_duplicate_balance_rejected() {
        let app = TestApp::new().await;
        let (employee_id, leave_type_id) = fixtures(&app).await;
        let body = balance_body(employee_id, leave_type_id);

        let (status, _) = app
            .call(Method::POST, "/api/v1/leave-balances", Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = app
            .call(Method::POST, "/api/v1/leave-balances", Some(body))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"]["employee_id"].is_array());
    }

    #[tokio::test]
    async fn test_statistics_refresh_after_update() {
        let app = TestApp::new().await;
        let (employee_id, leave_type_id) = fixtures(&app).await;
        let (_, created) = app
            .call(
                Method::POST,
                "/api/v1/leave-balances",
                Some(balance_body(employee_id, leave_type_id)),
            )
            .await;
        let id = created["data"]["id"].as_i64().unwrap();
        let year = Utc::now().year();
        let uri = format!("/api/v1/leave-balances/statistics?year={year}");

        let (status, body) = app.call(Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["leave_types"][0]["used_days"], 0.0);

        app.call(
            Method::PUT,
            &format!("/api/v1/leave-balances/{id}"),
            Some(json!({ "used_days": 3 })),
        )
        .await;
        let (_, body) = app.call(Method::GET, &uri, None).await;
        assert_eq!(body["data"]["leave_types"][0]["used_days"], 3.0);
        assert_eq!(body["data"]["leave_types"][0]["remaining_days"], 7.0);
    }

    #[tokio::test]
    async fn test_missing_total_days_rejected() {
        let app = TestApp::new().await;
        let (employee_id, leave_type_id) = fixtures(&app).await;
        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/leave-balances",
                Some(json!({
                    "employee_id": employee_id,
                    "leave_type_id": leave_type_id,
                    "year": Utc::now().year(),
                })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"]["total_days"].is_array());
    }
}
