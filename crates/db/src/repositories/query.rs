//! Paging and sorting helpers shared by list queries.

use hrms_shared::FieldErrors;
use hrms_shared::types::{PageRequest, SortOrder};
use sea_orm::Order;

/// Paging and sort options common to every list endpoint.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    /// Page to return.
    pub page: PageRequest,
    /// Requested sort key, checked against an allow-list.
    pub sort_by: Option<String>,
    /// Sort direction.
    pub sort_order: SortOrder,
}

impl ListParams {
    /// Resolves `sort_by` against `allowed`, falling back to `default`.
    ///
    /// # Errors
    ///
    /// Returns a `sort_by` field error for keys outside the allow-list.
    pub fn sort_key<'a>(&self, allowed: &[&'a str], default: &'a str) -> Result<&'a str, FieldErrors> {
        match self.sort_by.as_deref() {
            None | Some("") => Ok(default),
            Some(requested) => allowed
                .iter()
                .find(|key| **key == requested)
                .copied()
                .ok_or_else(|| {
                    FieldErrors::single(
                        "sort_by",
                        format!(
                            "The selected sort by is invalid. Allowed values: {}.",
                            allowed.join(", ")
                        ),
                    )
                }),
        }
    }

    /// Direction as a SeaORM order.
    #[must_use]
    pub const fn order(&self) -> Order {
        match self.sort_order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

/// `%term%` for LIKE filters.
pub(crate) fn like(term: &str) -> String {
    format!("%{}%", term.trim())
}
