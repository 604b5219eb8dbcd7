//! Bulk employee import and the shared spreadsheet layout.
//!
//! # Modules
//!
//! - `columns` - Column order, headers, hints, dropdowns and the age formula
//! - `row` - Header resolution and row-to-payload mapping
//! - `pipeline` - Validation of a whole sheet into a [`PreparedImport`]
//! - `report` - Counts, row errors and warnings
//! - `job` - Status of queued imports

pub mod columns;
pub mod job;
pub mod pipeline;
pub mod report;
pub mod row;

use thiserror::Error;

pub use columns::{AGE_FIELD, ColumnKind, ColumnSpec, EMPLOYEE_COLUMNS, age_formula, export_cells};
pub use job::ImportJobStatus;
pub use pipeline::{PreparedImport, PreparedRow, count_data_rows, prepare};
pub use report::{ImportReport, RowError, RowWarning};

/// File extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv"];

/// Sheet-level import failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The sheet has no rows at all.
    #[error("The uploaded file is empty.")]
    EmptyFile,

    /// Required columns are missing from the header.
    #[error("The uploaded file is missing required columns: {0}.")]
    MissingColumns(String),

    /// The extension is not on the allow-list.
    #[error("The file must be a file of type: xlsx, xls, csv.")]
    UnsupportedFormat(String),

    /// The spreadsheet could not be parsed.
    #[error("The uploaded file could not be read: {0}")]
    Unreadable(String),
}

/// Lowercased extension of `file_name` if it is on the allow-list.
///
/// # Errors
///
/// Returns [`ImportError::UnsupportedFormat`] otherwise.
pub fn check_extension(file_name: &str) -> Result<String, ImportError> {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(ImportError::UnsupportedFormat(file_name.to_string()))
    }
}
