//! Employee enumerations and derived values.

use chrono::{Datelike, NaiveDate};

/// Employing organizations.
pub const ORGANIZATIONS: &[&str] = &["SMRU", "BHF"];

/// Employee status values.
pub const STATUSES: &[&str] = &["Expats (Local)", "Local ID Staff", "Local non ID Staff"];

/// Gender values.
pub const GENDERS: &[&str] = &["Male", "Female"];

/// Accepted identification document types.
pub const IDENTIFICATION_TYPES: &[&str] = &[
    "10 years ID",
    "Burmese ID",
    "CI",
    "Borderpass",
    "Thai ID",
    "Passport",
    "Other",
];

/// Marital status values.
pub const MARITAL_STATUSES: &[&str] = &["Single", "Married", "Divorced", "Widowed"];

/// Age below which an imported or created employee is flagged.
pub const MINIMUM_WORKING_AGE: i32 = 18;

/// Whole years between `date_of_birth` and `on`.
///
/// Returns 0 when `on` precedes the birth date.
#[must_use]
pub fn age_on(date_of_birth: NaiveDate, on: NaiveDate) -> i32 {
    let mut age = on.year() - date_of_birth.year();
    if (on.month(), on.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age.max(0)
}

/// "First Last" in English, falling back to the first name alone.
#[must_use]
pub fn display_name(first_name: &str, last_name: Option<&str>) -> String {
    match last_name.map(str::trim).filter(|s| !s.is_empty()) {
        Some(last) => format!("{} {last}", first_name.trim()),
        None => first_name.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(date(1990, 5, 1), date(2025, 5, 1), 35)]
    #[case(date(1990, 5, 1), date(2025, 4, 30), 34)]
    #[case(date(2000, 2, 29), date(2025, 2, 28), 24)]
    #[case(date(2000, 2, 29), date(2025, 3, 1), 25)]
    #[case(date(2030, 1, 1), date(2025, 1, 1), 0)]
    fn test_age_on(#[case] dob: NaiveDate, #[case] on: NaiveDate, #[case] expected: i32) {
        assert_eq!(age_on(dob, on), expected);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("Aye", Some("Mya")), "Aye Mya");
        assert_eq!(display_name("Aye", Some("  ")), "Aye");
        assert_eq!(display_name(" Aye ", None), "Aye");
    }
}
