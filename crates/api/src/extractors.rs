//! Request extractors that reject with the failure envelope.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, OptionalFromRequest, Query, Request};
use axum::http::request::Parts;
use hrms_db::ListParams;
use hrms_shared::FieldErrors;
use hrms_shared::types::{PageRequest, SortOrder};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON body whose parse failures become 422 field errors on `body`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match <Json<T> as FromRequest<S>>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(&rejection)),
        }
    }
}

/// A missing body (no JSON content type) yields `None`; a malformed one still rejects.
impl<S, T> OptionalFromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        match <Json<T> as OptionalFromRequest<S>>::from_request(req, state).await {
            Ok(value) => Ok(value.map(|Json(value)| Self(value))),
            Err(rejection) => Err(json_rejection(&rejection)),
        }
    }
}

fn json_rejection(rejection: &JsonRejection) -> ApiError {
    FieldErrors::single("body", rejection.body_text()).into()
}

/// Query string whose parse failures become 422 field errors on `query`.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(query_rejection(&rejection)),
        }
    }
}

fn query_rejection(rejection: &QueryRejection) -> ApiError {
    FieldErrors::single("query", rejection.body_text()).into()
}

/// Paging and sort parameters shared by list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// One-based page.
    pub page: Option<u64>,
    /// Page size, capped at 100.
    pub per_page: Option<u64>,
    /// Sort column, checked by the repository.
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    pub sort_order: Option<String>,
}

impl ListQuery {
    /// Paging alone.
    #[must_use]
    pub fn page(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }

    /// Resolves into repository list options.
    ///
    /// # Errors
    ///
    /// Returns a `sort_order` field error for anything but `asc`/`desc`.
    pub fn params(&self) -> Result<ListParams, FieldErrors> {
        let sort_order = match self.sort_order.as_deref() {
            None | Some("") => SortOrder::default(),
            Some(raw) => SortOrder::parse(raw).ok_or_else(|| {
                FieldErrors::single("sort_order", "The selected sort order is invalid. Allowed values: asc, desc.")
            })?,
        };
        Ok(ListParams {
            page: self.page(),
            sort_by: self.sort_by.clone().filter(|s| !s.is_empty()),
            sort_order,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(None, SortOrder::Desc)]
    #[case(Some("asc"), SortOrder::Asc)]
    #[case(Some("DESC"), SortOrder::Desc)]
    fn test_sort_order(#[case] raw: Option<&str>, #[case] expected: SortOrder) {
        let query = ListQuery {
            sort_order: raw.map(str::to_string),
            ..ListQuery::default()
        };
        assert_eq!(query.params().unwrap().sort_order, expected);
    }

    #[test]
    fn test_invalid_sort_order() {
        let query = ListQuery {
            sort_order: Some("sideways".into()),
            ..ListQuery::default()
        };
        assert!(query.params().unwrap_err().contains("sort_order"));
    }

    #[test]
    fn test_page_is_clamped() {
        let query = ListQuery {
            page: Some(0),
            per_page: Some(500),
            ..ListQuery::default()
        };
        let page = query.page();
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 100);
    }
}
