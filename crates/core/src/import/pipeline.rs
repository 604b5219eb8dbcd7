//! Row-by-row preparation of an uploaded employee sheet.
//!
//! Rows are validated with the same rules as the create endpoint. Failing
//! rows are reported and skipped; they never abort the batch. Persistence
//! happens afterwards, so this stage is free of I/O.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::columns::EMPLOYEE_COLUMNS;
use super::report::ImportReport;
use super::row::{HeaderMap, is_blank, map_row};
use super::ImportError;
use crate::employee::{EmployeeInput, age_on, types::MINIMUM_WORKING_AGE};
use crate::validation::Validated;

/// Row number of the header in a template-shaped sheet.
pub const HEADER_ROW: usize = 1;

/// A row that passed validation and awaits persistence.
#[derive(Debug, Clone)]
pub struct PreparedRow {
    /// One-based spreadsheet row number.
    pub row: usize,
    /// Validated payload.
    pub input: EmployeeInput,
}

impl PreparedRow {
    /// Staff id of the row.
    #[must_use]
    pub fn staff_id(&self) -> Option<String> {
        self.input.basic.staff_id.clone()
    }
}

/// Result of the preparation stage.
#[derive(Debug, Clone, Default)]
pub struct PreparedImport {
    /// Rows ready to insert.
    pub rows: Vec<PreparedRow>,
    /// Report with per-row errors and warnings so far.
    pub report: ImportReport,
}

/// True when `row` is the template's hint row.
fn is_hint_row(row: &[String]) -> bool {
    row.iter()
        .zip(EMPLOYEE_COLUMNS)
        .filter(|(cell, _)| !cell.trim().is_empty())
        .any(|(cell, column)| cell.trim() == column.hint)
}

/// Number of data rows in a sheet, excluding header, hint and blank rows.
#[must_use]
pub fn count_data_rows(rows: &[Vec<String>]) -> usize {
    rows.iter()
        .skip(HEADER_ROW)
        .filter(|r| !is_blank(r) && !is_hint_row(r))
        .count()
}

/// Validates every data row of a sheet.
///
/// `rows` is the whole sheet including the header. `today` anchors age
/// calculations.
///
/// # Errors
///
/// Returns [`ImportError`] only for sheet-level problems: an empty sheet or
/// missing required columns. Row-level problems end up in the report.
pub fn prepare(rows: &[Vec<String>], today: NaiveDate) -> Result<PreparedImport, ImportError> {
    let header = rows.first().ok_or(ImportError::EmptyFile)?;
    let headers = HeaderMap::resolve(header)?;

    let mut prepared = PreparedImport::default();
    // (organization, staff_id) -> first row seen
    let mut seen: HashMap<(String, String), usize> = HashMap::new();

    for (offset, cells) in rows.iter().enumerate().skip(HEADER_ROW) {
        let row = offset + 1;
        if is_blank(cells) || is_hint_row(cells) {
            continue;
        }
        prepared.report.processed_count += 1;

        let mapped = map_row(&headers, cells);
        let staff_id = mapped.input.basic.staff_id.clone();

        let mut errors = mapped.errors;
        if let Err(rule_errors) = mapped.input.validate_input() {
            errors.merge(rule_errors);
        }

        if let (Some(org), Some(id)) = (&mapped.input.basic.organization, &staff_id) {
            let key = (org.clone(), id.clone());
            if let Some(first) = seen.get(&key) {
                errors.add(
                    "staff_id",
                    format!("The staff id {id} appears more than once in this file (first on row {first})."),
                );
            } else {
                seen.insert(key, row);
            }
        }

        if !errors.is_empty() {
            prepared.report.reject(row, staff_id, errors.messages());
            continue;
        }

        if let Some(dob) = mapped.input.basic.date_of_birth {
            let age = age_on(dob, today);
            if let Some(provided) = mapped.provided_age
                && provided != age
            {
                prepared.report.warn(
                    row,
                    staff_id.clone(),
                    format!("Age {provided} does not match date of birth (calculated {age})."),
                );
            }
            if age < MINIMUM_WORKING_AGE {
                prepared.report.warn(
                    row,
                    staff_id.clone(),
                    format!("Employee is {age} years old, under the minimum working age of {MINIMUM_WORKING_AGE}."),
                );
            }
        }

        prepared.rows.push(PreparedRow {
            row,
            input: mapped.input,
        });
    }

    Ok(prepared)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn header() -> Vec<String> {
        EMPLOYEE_COLUMNS.iter().map(|c| c.header.to_string()).collect()
    }

    fn hints() -> Vec<String> {
        EMPLOYEE_COLUMNS.iter().map(|c| c.hint.to_string()).collect()
    }

    fn data(values: &[(&str, &str)]) -> Vec<String> {
        EMPLOYEE_COLUMNS
            .iter()
            .map(|c| {
                values
                    .iter()
                    .find(|(field, _)| *field == c.field)
                    .map(|(_, v)| (*v).to_string())
                    .unwrap_or_default()
            })
            .collect()
    }

    fn employee(staff_id: &str, dob: &str) -> Vec<String> {
        data(&[
            ("organization", "SMRU"),
            ("staff_id", staff_id),
            ("first_name_en", "Aye"),
            ("gender", "Female"),
            ("date_of_birth", dob),
            ("status", "Local ID Staff"),
        ])
    }

    #[test]
    fn test_valid_and_invalid_rows() {
        let rows = vec![
            header(),
            hints(),
            employee("0001", "1990-05-01"),
            employee("0002", "not a date"),
            vec![String::new(); 3],
            employee("0003", "12/08/1985"),
            data(&[("organization", "XYZ"), ("staff_id", "0004")]),
        ];

        let prepared = prepare(&rows, today()).unwrap();
        assert_eq!(prepared.report.processed_count, 4);
        assert_eq!(prepared.rows.len(), 2);
        assert_eq!(prepared.report.errors.len(), 2);

        let first = &prepared.report.errors[0];
        assert_eq!(first.row, 4);
        assert_eq!(first.staff_id.as_deref(), Some("0002"));
        assert!(first.messages.iter().any(|m| m.contains("not a valid date")));

        let second = &prepared.report.errors[1];
        assert_eq!(second.row, 7);
        assert!(second.messages.iter().any(|m| m.contains("organization")));

        assert_eq!(prepared.rows[1].row, 6);
        assert_eq!(
            prepared.rows[1].input.basic.date_of_birth,
            NaiveDate::from_ymd_opt(1985, 8, 12)
        );
    }

    #[test]
    fn test_in_file_duplicates_rejected() {
        let rows = vec![
            header(),
            employee("0001", "1990-05-01"),
            employee("0001", "1991-05-01"),
        ];
        let prepared = prepare(&rows, today()).unwrap();
        assert_eq!(prepared.rows.len(), 1);
        assert_eq!(prepared.report.errors[0].row, 3);
        assert!(prepared.report.errors[0].messages[0].contains("first on row 2"));
    }

    #[test]
    fn test_age_warnings() {
        let mut wrong_age = employee("0001", "1990-05-01");
        wrong_age[crate::import::columns::column_index("age").unwrap()] = "30".into();
        let rows = vec![header(), wrong_age, employee("0002", "2010-01-01")];

        let prepared = prepare(&rows, today()).unwrap();
        assert_eq!(prepared.rows.len(), 2);
        assert_eq!(prepared.report.warnings.len(), 2);
        assert!(prepared.report.warnings[0].message.contains("calculated 35"));
        assert!(prepared.report.warnings[1].message.contains("under the minimum"));
    }

    #[test]
    fn test_missing_required_columns() {
        let rows = vec![vec!["Organization".to_string(), "Staff ID".to_string()]];
        let err = prepare(&rows, today()).unwrap_err();
        assert!(matches!(err, ImportError::MissingColumns(ref cols) if cols.contains("First Name EN")));
    }

    #[test]
    fn test_empty_sheet() {
        assert!(matches!(prepare(&[], today()), Err(ImportError::EmptyFile)));
    }

    #[test]
    fn test_count_data_rows() {
        let rows = vec![header(), hints(), employee("1", "1990-01-01"), vec![]];
        assert_eq!(count_data_rows(&rows), 1);
    }
}
