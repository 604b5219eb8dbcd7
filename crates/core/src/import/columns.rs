//! Spreadsheet column layout shared by import, template and export.

use serde_json::Value;

use crate::employee::{
    GENDERS, IDENTIFICATION_TYPES, MARITAL_STATUSES, ORGANIZATIONS, STATUSES,
};

/// How a column's cells are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Free text.
    Text,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// Filled by a formula; read back only to cross-check.
    Computed,
}

/// One spreadsheet column.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    /// Header text. Normalizes to `field`.
    pub header: &'static str,
    /// Employee field the column maps to.
    pub field: &'static str,
    /// Prose shown in the hint row.
    pub hint: &'static str,
    /// Dropdown values, empty for free input.
    pub options: &'static [&'static str],
    /// Whether the column must be present and filled.
    pub required: bool,
    /// Cell interpretation.
    pub kind: ColumnKind,
}

const fn text(header: &'static str, field: &'static str, hint: &'static str) -> ColumnSpec {
    ColumnSpec {
        header,
        field,
        hint,
        options: &[],
        required: false,
        kind: ColumnKind::Text,
    }
}

const fn required(mut column: ColumnSpec) -> ColumnSpec {
    column.required = true;
    column
}

const fn choice(mut column: ColumnSpec, options: &'static [&'static str]) -> ColumnSpec {
    column.options = options;
    column
}

const fn date(header: &'static str, field: &'static str, hint: &'static str) -> ColumnSpec {
    ColumnSpec {
        kind: ColumnKind::Date,
        ..text(header, field, hint)
    }
}

/// Header of the computed age column.
pub const AGE_FIELD: &str = "age";

/// Ordered employee columns.
pub const EMPLOYEE_COLUMNS: &[ColumnSpec] = &[
    required(choice(
        text("Organization", "organization", "Required. SMRU or BHF"),
        ORGANIZATIONS,
    )),
    required(text("Staff ID", "staff_id", "Required. Unique per organization, max 50 characters")),
    text("Initial EN", "initial_en", "Optional. e.g. Mr., Ms., max 10 characters"),
    text("Initial TH", "initial_th", "Optional. Thai initial, max 20 characters"),
    required(text("First Name EN", "first_name_en", "Required. Max 255 characters")),
    text("Last Name EN", "last_name_en", "Optional. Max 255 characters"),
    text("First Name TH", "first_name_th", "Optional. Max 255 characters"),
    text("Last Name TH", "last_name_th", "Optional. Max 255 characters"),
    required(choice(text("Gender", "gender", "Required. Male or Female"), GENDERS)),
    required(date(
        "Date of Birth",
        "date_of_birth",
        "Required. Date YYYY-MM-DD, not in the future",
    )),
    ColumnSpec {
        header: "Age",
        field: AGE_FIELD,
        hint: "Calculated from date of birth, do not edit",
        options: &[],
        required: false,
        kind: ColumnKind::Computed,
    },
    required(choice(
        text("Status", "status", "Required. Expats (Local), Local ID Staff or Local non ID Staff"),
        STATUSES,
    )),
    text("Nationality", "nationality", "Optional. Max 100 characters"),
    text("Religion", "religion", "Optional. Max 100 characters"),
    choice(
        text("Identification Type", "identification_type", "Optional. Choose from the list"),
        IDENTIFICATION_TYPES,
    ),
    text(
        "Identification Number",
        "identification_number",
        "Required when identification type is set",
    ),
    text("Social Security Number", "social_security_number", "Optional. Max 50 characters"),
    text("Tax Number", "tax_number", "Optional. Max 50 characters"),
    text("Mobile Phone", "mobile_phone", "Optional. Max 20 characters"),
    text("Permanent Address", "permanent_address", "Optional"),
    text("Current Address", "current_address", "Optional"),
    text("Military Status", "military_status", "Optional"),
    choice(
        text("Marital Status", "marital_status", "Optional. Choose from the list"),
        MARITAL_STATUSES,
    ),
    text("Driver License Number", "driver_license_number", "Optional"),
    text("Spouse Name", "spouse_name", "Optional"),
    text("Spouse Phone Number", "spouse_phone_number", "Optional. Max 20 characters"),
    text("Emergency Contact Person Name", "emergency_contact_person_name", "Optional"),
    text(
        "Emergency Contact Person Relationship",
        "emergency_contact_person_relationship",
        "Optional",
    ),
    text(
        "Emergency Contact Person Phone",
        "emergency_contact_person_phone",
        "Required when emergency contact name is set",
    ),
    text("Father Name", "father_name", "Optional"),
    text("Father Occupation", "father_occupation", "Optional"),
    text("Father Phone Number", "father_phone_number", "Optional"),
    text("Mother Name", "mother_name", "Optional"),
    text("Mother Occupation", "mother_occupation", "Optional"),
    text("Mother Phone Number", "mother_phone_number", "Optional"),
    text("Bank Name", "bank_name", "Required when bank account number is set"),
    text("Bank Branch", "bank_branch", "Optional"),
    text("Bank Account Name", "bank_account_name", "Optional"),
    text("Bank Account Number", "bank_account_number", "Optional"),
    text("Remark", "remark", "Optional. Max 255 characters"),
];

/// Normalizes a header cell for matching against column fields.
#[must_use]
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .trim_end_matches('*')
        .trim()
        .to_lowercase()
        .replace([' ', '-'], "_")
}

/// Index of the column mapped to `field`.
#[must_use]
pub fn column_index(field: &str) -> Option<usize> {
    EMPLOYEE_COLUMNS.iter().position(|c| c.field == field)
}

/// Spreadsheet letter for a zero-based column index (`0` -> `A`, `26` -> `AA`).
#[must_use]
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + u8::try_from(rem).unwrap_or(0));
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Age formula for a one-based spreadsheet row.
#[must_use]
pub fn age_formula(row: u32) -> String {
    let dob = column_index("date_of_birth").map(column_letter).unwrap_or_default();
    format!("=IF({dob}{row}=\"\",\"\",DATEDIF({dob}{row},TODAY(),\"Y\"))")
}

/// Cell texts for one exported record, in column order.
///
/// `record` is the employee serialized to JSON. The computed column is left
/// empty; writers fill it with [`age_formula`].
#[must_use]
pub fn export_cells(record: &Value) -> Vec<String> {
    EMPLOYEE_COLUMNS
        .iter()
        .map(|column| match (column.kind, record.get(column.field)) {
            (ColumnKind::Computed, _) | (_, None | Some(Value::Null)) => String::new(),
            (_, Some(Value::String(s))) => s.clone(),
            (_, Some(other)) => other.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_headers_normalize_to_fields() {
        for column in EMPLOYEE_COLUMNS {
            assert_eq!(normalize_header(column.header), column.field, "{}", column.header);
        }
    }

    #[test]
    fn test_fields_unique() {
        let fields: HashSet<_> = EMPLOYEE_COLUMNS.iter().map(|c| c.field).collect();
        assert_eq!(fields.len(), EMPLOYEE_COLUMNS.len());
    }

    #[rstest]
    #[case(0, "A")]
    #[case(9, "J")]
    #[case(25, "Z")]
    #[case(26, "AA")]
    #[case(39, "AN")]
    #[case(701, "ZZ")]
    fn test_column_letter(#[case] index: usize, #[case] expected: &str) {
        assert_eq!(column_letter(index), expected);
    }

    #[test]
    fn test_age_formula_points_at_date_of_birth() {
        assert_eq!(
            age_formula(3),
            "=IF(J3=\"\",\"\",DATEDIF(J3,TODAY(),\"Y\"))"
        );
    }

    #[test]
    fn test_export_cells() {
        let record = json!({
            "organization": "SMRU",
            "staff_id": "0042",
            "first_name_en": "Aye",
            "date_of_birth": "1990-05-01",
            "last_name_en": null,
        });
        let cells = export_cells(&record);
        assert_eq!(cells.len(), EMPLOYEE_COLUMNS.len());
        assert_eq!(cells[0], "SMRU");
        assert_eq!(cells[1], "0042");
        assert_eq!(cells[column_index("date_of_birth").unwrap()], "1990-05-01");
        assert_eq!(cells[column_index(AGE_FIELD).unwrap()], "");
        assert_eq!(cells[column_index("last_name_en").unwrap()], "");
    }

    #[test]
    fn test_normalize_header_variants() {
        assert_eq!(normalize_header(" Staff ID *"), "staff_id");
        assert_eq!(normalize_header("date-of-birth"), "date_of_birth");
    }
}
