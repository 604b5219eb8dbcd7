//! Lookup routes. Lookups back the dropdowns of every employee form.

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::get,
};
use hrms_core::events::EventAction;
use hrms_core::lookup::LookupInput;
use hrms_core::validation::Validated;
use hrms_db::repositories::{LookupFilter, LookupRepository};
use serde::Deserialize;

use super::announce;
use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{JsonBody, ListQuery, QueryParams};
use crate::middleware::AuthUser;
use crate::response::{self, AppliedFilters};

const ENTITY: &str = "lookup";

/// Creates the lookup router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/lookups", get(list_lookups).post(create_lookup))
        .route("/lookups/types", get(list_types))
        .route("/lookups/type/{lookup_type}", get(by_type))
        .route(
            "/lookups/{id}",
            get(get_lookup).put(update_lookup).delete(delete_lookup),
        )
}

/// Filters accepted by `GET /lookups`.
#[derive(Debug, Default, Deserialize)]
pub struct LookupQuery {
    /// Exact type.
    #[serde(rename = "type")]
    pub lookup_type: Option<String>,
    /// Value substring.
    pub search: Option<String>,
}

fn label(lookup: &hrms_db::entities::lookups::Model) -> String {
    format!("{}: {}", lookup.lookup_type, lookup.value)
}

/// GET /lookups - Ordered by type then value.
async fn list_lookups(
    State(state): State<AppState>,
    QueryParams(list): QueryParams<ListQuery>,
    QueryParams(query): QueryParams<LookupQuery>,
) -> ApiResult<Response> {
    let filter = LookupFilter {
        lookup_type: query.lookup_type.filter(|t| !t.trim().is_empty()),
        search: query.search.filter(|s| !s.trim().is_empty()),
    };
    let page = LookupRepository::new(state.conn())
        .list(&filter, list.page())
        .await?;

    let applied = AppliedFilters::new()
        .with("type", filter.lookup_type)
        .with("search", filter.search);
    Ok(response::paginated("Lookups retrieved successfully", page, applied))
}

/// GET /lookups/types - Distinct types in use.
async fn list_types(State(state): State<AppState>) -> ApiResult<Response> {
    let types = LookupRepository::new(state.conn()).types().await?;
    Ok(response::ok("Lookup types retrieved successfully", types))
}

/// GET /lookups/type/{type} - Every value of one type. Unknown types yield an empty list.
async fn by_type(
    State(state): State<AppState>,
    Path(lookup_type): Path<String>,
) -> ApiResult<Response> {
    let lookups = LookupRepository::new(state.conn())
        .by_type(&lookup_type)
        .await?;
    Ok(response::ok("Lookups retrieved successfully", lookups))
}

/// GET /lookups/{id}
async fn get_lookup(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Response> {
    let lookup = LookupRepository::new(state.conn()).get(id).await?;
    Ok(response::ok("Lookup retrieved successfully", lookup))
}

/// POST /lookups
async fn create_lookup(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(mut input): JsonBody<LookupInput>,
) -> ApiResult<Response> {
    input.normalize();
    input.validate_input()?;
    let lookup = LookupRepository::new(state.conn())
        .create(input, auth.actor())
        .await?;

    announce(
        &state,
        &[],
        EventAction::Created,
        ENTITY,
        Some(lookup.id),
        label(&lookup),
        auth.actor(),
    );
    Ok(response::created("Lookup created successfully", lookup))
}

/// PUT /lookups/{id}
async fn update_lookup(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    JsonBody(mut input): JsonBody<LookupInput>,
) -> ApiResult<Response> {
    input.normalize();
    input.validate_input()?;
    let lookup = LookupRepository::new(state.conn())
        .update(id, input, auth.actor())
        .await?;

    announce(
        &state,
        &[],
        EventAction::Updated,
        ENTITY,
        Some(lookup.id),
        label(&lookup),
        auth.actor(),
    );
    Ok(response::ok("Lookup updated successfully", lookup))
}

/// DELETE /lookups/{id} - Employees keep the stored text value.
async fn delete_lookup(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<Response> {
    let lookup = LookupRepository::new(state.conn()).delete(id).await?;

    announce(
        &state,
        &[],
        EventAction::Deleted,
        ENTITY,
        Some(id),
        label(&lookup),
        auth.actor(),
    );
    Ok(response::message("Lookup deleted successfully"))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::TestApp;

    #[tokio::test]
    async fn test_lookup_lifecycle() {
        let app = TestApp::new().await;
        for value in ["Thai", "Burmese"] {
            let (status, _) = app
                .call(
                    Method::POST,
                    "/api/v1/lookups",
                    Some(json!({ "type": "nationality", "value": value })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);
        }
        app.call(
            Method::POST,
            "/api/v1/lookups",
            Some(json!({ "type": "religion", "value": "Buddhist" })),
        )
        .await;

        let (_, body) = app.call(Method::GET, "/api/v1/lookups/types", None).await;
        assert_eq!(body["data"], json!(["nationality", "religion"]));

        let (_, body) = app
            .call(Method::GET, "/api/v1/lookups/type/nationality", None)
            .await;
        let values: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["value"].as_str().unwrap())
            .collect();
        assert_eq!(values, vec!["Burmese", "Thai"]);

        let (_, body) = app
            .call(Method::GET, "/api/v1/lookups?type=nationality&per_page=1", None)
            .await;
        assert_eq!(body["pagination"]["total"], 2);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["filters"]["applied_filters"]["type"], "nationality");

        let id = body["data"][0]["id"].as_i64().unwrap();
        let (status, _) = app
            .call(Method::DELETE, &format!("/api/v1/lookups/{id}"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app
            .call(Method::GET, &format!("/api/v1/lookups/{id}"), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_value_within_type_rejected() {
        let app = TestApp::new().await;
        let body = json!({ "type": "nationality", "value": "Thai" });
        app.call(Method::POST, "/api/v1/lookups", Some(body.clone())).await;
        let (status, response) = app.call(Method::POST, "/api/v1/lookups", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response["errors"]["value"].is_array());

        // Same value under another type is fine
        let (status, _) = app
            .call(
                Method::POST,
                "/api/v1/lookups",
                Some(json!({ "type": "bank_name", "value": "Thai" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_invalid_type_rejected() {
        let app = TestApp::new().await;
        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/lookups",
                Some(json!({ "type": "Not A Type", "value": "x" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"]["type"].is_array());
    }
}
