//! Reading uploaded sheets and rendering the employee template and export.
//!
//! Every sheet uses the [`EMPLOYEE_COLUMNS`] layout: a header row, a hint
//! row, then one employee per row. The age column always carries a formula
//! on the date of birth so spreadsheet users see the computed value.

use std::io::Cursor;

use calamine::{Data, DataType, Reader, open_workbook_auto_from_rs};
use hrms_core::import::columns::normalize_header;
use hrms_core::import::{AGE_FIELD, ColumnKind, EMPLOYEE_COLUMNS, age_formula, export_cells};
use rust_xlsxwriter::{DataValidation, Format, Formula, Workbook, Worksheet, XlsxError};
use serde_json::Value;
use thiserror::Error;

/// MIME type of generated workbooks.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// First data row, zero-based (row 0 is the header, row 1 the hints).
const FIRST_DATA_ROW: u32 = 2;

/// Rows of the template that come with dropdowns and the age formula.
const TEMPLATE_ROWS: u32 = 500;

const SHEET_NAME: &str = "Employees";

/// Spreadsheet failures.
#[derive(Debug, Error)]
pub enum SpreadsheetError {
    /// The upload could not be parsed.
    #[error("{0}")]
    Unreadable(String),

    /// Writing the workbook failed.
    #[error("Failed to render workbook: {0}")]
    Render(String),
}

impl From<XlsxError> for SpreadsheetError {
    fn from(err: XlsxError) -> Self {
        Self::Render(err.to_string())
    }
}

/// Reads every row of the first sheet as trimmed cell text.
///
/// `extension` is the lowercased file extension (`xlsx`, `xls` or `csv`).
///
/// # Errors
///
/// Returns [`SpreadsheetError::Unreadable`] when the bytes do not parse.
pub fn read_rows(extension: &str, bytes: &[u8]) -> Result<Vec<Vec<String>>, SpreadsheetError> {
    let mut rows = if extension == "csv" {
        read_csv(bytes)?
    } else {
        read_workbook(bytes)?
    };
    clear_computed_only_rows(&mut rows);
    Ok(rows)
}

fn read_csv(bytes: &[u8]) -> Result<Vec<Vec<String>>, SpreadsheetError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| SpreadsheetError::Unreadable(e.to_string()))?;
        rows.push(record.iter().map(|cell| cell.trim().to_string()).collect());
    }
    Ok(rows)
}

fn read_workbook(bytes: &[u8]) -> Result<Vec<Vec<String>>, SpreadsheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| SpreadsheetError::Unreadable(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SpreadsheetError::Unreadable("The workbook has no sheets.".into()))?
        .map_err(|e| SpreadsheetError::Unreadable(e.to_string()))?;

    // Ranges start at the first used cell; pad back to A1 so row numbers match the sheet.
    let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
    let padding = vec![String::new(); col_offset as usize];

    let mut rows: Vec<Vec<String>> = vec![Vec::new(); row_offset as usize];
    for row in range.rows() {
        let mut cells = padding.clone();
        cells.extend(row.iter().map(cell_text));
        rows.push(cells);
    }
    Ok(rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}

/// Blanks rows whose only content is the pre-filled age formula.
fn clear_computed_only_rows(rows: &mut [Vec<String>]) {
    let Some(age_index) = rows
        .first()
        .and_then(|header| header.iter().position(|h| normalize_header(h) == AGE_FIELD))
    else {
        return;
    };

    for row in rows.iter_mut().skip(1) {
        let only_age = row
            .iter()
            .enumerate()
            .all(|(idx, cell)| idx == age_index || cell.trim().is_empty());
        if only_age {
            row.iter_mut().for_each(String::clear);
        }
    }
}

fn write_layout(worksheet: &mut Worksheet, last_row: u32) -> Result<(), SpreadsheetError> {
    let header_format = Format::new().set_bold();
    let hint_format = Format::new().set_italic();

    worksheet.set_name(SHEET_NAME)?;
    for (idx, column) in EMPLOYEE_COLUMNS.iter().enumerate() {
        let col = u16::try_from(idx).map_err(|e| SpreadsheetError::Render(e.to_string()))?;
        let header = if column.required {
            format!("{} *", column.header)
        } else {
            column.header.to_string()
        };
        worksheet.write_string_with_format(0, col, header, &header_format)?;
        worksheet.write_string_with_format(1, col, column.hint, &hint_format)?;
        worksheet.set_column_width(col, 22_u16)?;

        if !column.options.is_empty() && last_row >= FIRST_DATA_ROW {
            let validation = DataValidation::new().allow_list_strings(column.options)?;
            worksheet.add_data_validation(FIRST_DATA_ROW, col, last_row, col, &validation)?;
        }
    }
    worksheet.set_freeze_panes(FIRST_DATA_ROW, 0)?;
    Ok(())
}

fn write_age_formula(worksheet: &mut Worksheet, row: u32) -> Result<(), SpreadsheetError> {
    let Some(col) = EMPLOYEE_COLUMNS
        .iter()
        .position(|c| c.kind == ColumnKind::Computed)
        .and_then(|idx| u16::try_from(idx).ok())
    else {
        return Ok(());
    };
    worksheet.write_formula(row, col, Formula::new(age_formula(row + 1)).set_result(""))?;
    Ok(())
}

/// Renders the empty import template.
///
/// # Errors
///
/// Returns [`SpreadsheetError::Render`] when the workbook cannot be written.
pub fn employee_template() -> Result<Vec<u8>, SpreadsheetError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let last_row = FIRST_DATA_ROW + TEMPLATE_ROWS - 1;

    write_layout(worksheet, last_row)?;
    for row in FIRST_DATA_ROW..=last_row {
        write_age_formula(worksheet, row)?;
    }
    Ok(workbook.save_to_buffer()?)
}

/// Renders one row per employee record (serialized employee JSON).
///
/// # Errors
///
/// Returns [`SpreadsheetError::Render`] when the workbook cannot be written.
pub fn employee_export(records: &[Value]) -> Result<Vec<u8>, SpreadsheetError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let count = u32::try_from(records.len()).map_err(|e| SpreadsheetError::Render(e.to_string()))?;
    let last_row = FIRST_DATA_ROW + count.max(1) - 1;

    write_layout(worksheet, last_row)?;
    for (row, record) in (FIRST_DATA_ROW..).zip(records) {
        for (idx, cell) in export_cells(record).into_iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let col = u16::try_from(idx).map_err(|e| SpreadsheetError::Render(e.to_string()))?;
            worksheet.write_string(row, col, cell)?;
        }
        write_age_formula(worksheet, row)?;
    }
    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use hrms_core::import::columns::column_index;
    use hrms_core::import::count_data_rows;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_template_round_trip_has_no_data_rows() {
        let bytes = employee_template().unwrap();
        let rows = read_rows("xlsx", &bytes).unwrap();

        assert_eq!(rows[0][0], "Organization *");
        assert_eq!(rows[1][0], EMPLOYEE_COLUMNS[0].hint);
        assert_eq!(count_data_rows(&rows), 0);
    }

    #[test]
    fn test_export_round_trip() {
        let records = vec![json!({
            "organization": "SMRU",
            "staff_id": "0042",
            "first_name_en": "Aye",
            "gender": "Female",
            "date_of_birth": "1990-05-01",
            "status": "Local ID Staff",
        })];
        let bytes = employee_export(&records).unwrap();
        let rows = read_rows("xlsx", &bytes).unwrap();

        assert_eq!(count_data_rows(&rows), 1);
        let dob = column_index("date_of_birth").unwrap();
        assert_eq!(rows[2][1], "0042");
        assert_eq!(rows[2][dob], "1990-05-01");
    }

    #[test]
    fn test_read_csv_strips_bom_and_trims() {
        let csv = "\u{feff}Organization,Staff ID\n SMRU ,0042\n";
        let rows = read_rows("csv", csv.as_bytes()).unwrap();
        assert_eq!(rows, vec![vec!["Organization", "Staff ID"], vec!["SMRU", "0042"]]);
    }

    #[test]
    fn test_computed_only_rows_are_cleared() {
        let mut rows = vec![
            vec!["Staff ID".to_string(), "Age".to_string()],
            vec![String::new(), "0".to_string()],
            vec!["0042".to_string(), "35".to_string()],
        ];
        clear_computed_only_rows(&mut rows);
        assert!(rows[1].iter().all(String::is_empty));
        assert_eq!(rows[2][1], "35");
    }

    #[test]
    fn test_garbage_is_unreadable() {
        assert!(matches!(
            read_rows("xlsx", b"not a workbook"),
            Err(SpreadsheetError::Unreadable(_))
        ));
    }
}
