//! Import outcome reporting.

use serde::{Deserialize, Serialize};

/// A data row that was not imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// One-based spreadsheet row number.
    pub row: usize,
    /// Staff id read from the row, if any.
    pub staff_id: Option<String>,
    /// Everything wrong with the row.
    pub messages: Vec<String>,
}

/// A data row that was imported but looked suspicious.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowWarning {
    /// One-based spreadsheet row number.
    pub row: usize,
    /// Staff id read from the row, if any.
    pub staff_id: Option<String>,
    /// Warning text.
    pub message: String,
}

/// Summary returned to the uploader or stored on the import job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Non-blank data rows read.
    pub processed_count: usize,
    /// Rows persisted.
    pub imported_count: usize,
    /// Rejected rows.
    pub errors: Vec<RowError>,
    /// Imported rows with warnings.
    pub warnings: Vec<RowWarning>,
}

impl ImportReport {
    /// Records a rejected row.
    pub fn reject(&mut self, row: usize, staff_id: Option<String>, messages: Vec<String>) {
        self.errors.push(RowError {
            row,
            staff_id,
            messages,
        });
    }

    /// Records a warning.
    pub fn warn(&mut self, row: usize, staff_id: Option<String>, message: impl Into<String>) {
        self.warnings.push(RowWarning {
            row,
            staff_id,
            message: message.into(),
        });
    }

    /// Drops warnings for rows that ended up rejected.
    pub fn prune_warnings(&mut self) {
        let rejected: Vec<usize> = self.errors.iter().map(|e| e.row).collect();
        self.warnings.retain(|w| !rejected.contains(&w.row));
    }

    /// Human summary line.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Imported {} of {} rows ({} failed, {} warnings).",
            self.imported_count,
            self.processed_count,
            self.errors.len(),
            self.warnings.len()
        )
    }
}
