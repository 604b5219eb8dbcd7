//! Mapping spreadsheet rows onto employee payloads.

use std::collections::HashMap;

use hrms_shared::FieldErrors;
use serde_json::{Map, Value};

use super::columns::{AGE_FIELD, ColumnKind, EMPLOYEE_COLUMNS, normalize_header};
use super::ImportError;
use crate::employee::EmployeeInput;
use crate::validation::{label, parse_date};

/// Column positions resolved from a header row.
#[derive(Debug, Clone)]
pub struct HeaderMap {
    positions: HashMap<&'static str, usize>,
}

impl HeaderMap {
    /// Resolves header cells against [`EMPLOYEE_COLUMNS`].
    ///
    /// Unknown headers are ignored so extra columns do not break uploads.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::MissingColumns`] when a required column is absent.
    pub fn resolve(header: &[String]) -> Result<Self, ImportError> {
        let mut positions = HashMap::new();
        for (idx, cell) in header.iter().enumerate() {
            let normalized = normalize_header(cell);
            if let Some(column) = EMPLOYEE_COLUMNS.iter().find(|c| c.field == normalized) {
                positions.entry(column.field).or_insert(idx);
            }
        }

        let missing: Vec<&str> = EMPLOYEE_COLUMNS
            .iter()
            .filter(|c| c.required && !positions.contains_key(c.field))
            .map(|c| c.header)
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns(missing.join(", ")));
        }

        Ok(Self { positions })
    }

    /// Trimmed, non-empty cell for `field`.
    #[must_use]
    pub fn cell<'a>(&self, row: &'a [String], field: &str) -> Option<&'a str> {
        self.positions
            .get(field)
            .and_then(|&idx| row.get(idx))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}

/// A row mapped onto the employee payload.
#[derive(Debug, Clone)]
pub struct MappedRow {
    /// Payload built from the cells.
    pub input: EmployeeInput,
    /// Age typed into the computed column, when readable.
    pub provided_age: Option<i32>,
    /// Cells that could not be interpreted.
    pub errors: FieldErrors,
}

/// Builds an [`EmployeeInput`] from one data row.
#[must_use]
pub fn map_row(headers: &HeaderMap, row: &[String]) -> MappedRow {
    let mut fields = Map::new();
    let mut errors = FieldErrors::new();
    let mut provided_age = None;

    for column in EMPLOYEE_COLUMNS {
        let Some(raw) = headers.cell(row, column.field) else {
            continue;
        };
        match column.kind {
            ColumnKind::Text => {
                fields.insert(column.field.to_string(), Value::String(raw.to_string()));
            }
            ColumnKind::Date => match parse_date(raw) {
                Some(date) => {
                    fields.insert(column.field.to_string(), Value::String(date.to_string()));
                }
                None => errors.add(
                    column.field,
                    format!("The {} is not a valid date.", label(column.field)),
                ),
            },
            ColumnKind::Computed if column.field == AGE_FIELD => {
                provided_age = raw.split('.').next().and_then(|s| s.parse().ok());
            }
            ColumnKind::Computed => {}
        }
    }

    let mut input: EmployeeInput = serde_json::from_value(Value::Object(fields)).unwrap_or_default();
    input.normalize();

    MappedRow {
        input,
        provided_age,
        errors,
    }
}

/// True when every cell is blank.
#[must_use]
pub fn is_blank(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}
