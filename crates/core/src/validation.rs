//! Request validation helpers.
//!
//! Input structs derive `validator::Validate` for per-field constraints and
//! add cross-field checks by hand. Everything ends up in a
//! [`FieldErrors`] map with Laravel-style messages so API clients see one
//! consistent shape regardless of where a rule lives.

use std::borrow::Cow;

use chrono::NaiveDate;
use hrms_shared::FieldErrors;
use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Implemented by every request input that can be checked before persistence.
pub trait Validated {
    /// Runs all field and cross-field rules.
    ///
    /// # Errors
    ///
    /// Returns every violated rule keyed by field name.
    fn validate_input(&self) -> Result<(), FieldErrors>;
}

/// Human label for a snake_case field name.
#[must_use]
pub fn label(field: &str) -> String {
    field.replace('_', " ")
}

/// Converts `validator` output into [`FieldErrors`].
#[must_use]
pub fn collect(result: Result<(), ValidationErrors>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if let Err(validation) = result {
        flatten_into(&mut errors, &validation);
    }
    errors
}

fn flatten_into(errors: &mut FieldErrors, validation: &ValidationErrors) {
    for (field, kind) in validation.errors() {
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    errors.add(field.to_string(), render(field, error));
                }
            }
            ValidationErrorsKind::Struct(nested) => flatten_into(errors, nested),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    flatten_into(errors, nested);
                }
            }
        }
    }
}

fn render(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let name = label(field);
    match &*error.code {
        "required" => format!("The {name} field is required."),
        "length" => match (error.params.get("min"), error.params.get("max")) {
            (_, Some(max)) => format!("The {name} may not be greater than {max} characters."),
            (Some(min), None) => format!("The {name} must be at least {min} characters."),
            _ => format!("The {name} has an invalid length."),
        },
        "email" => format!("The {name} must be a valid email address."),
        "range" => format!("The {name} is out of range."),
        _ => format!("The selected {name} is invalid."),
    }
}

/// Builds a `ValidationError` carrying a ready-made message.
#[must_use]
pub fn error(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Owned(message))
}

/// Rejects values outside an enumerated list.
///
/// # Errors
///
/// Returns an `in` error naming the allowed values.
pub fn one_of(value: &str, allowed: &[&str], field: &str) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(error(
            "in",
            format!(
                "The selected {} is invalid. Allowed values: {}.",
                label(field),
                allowed.join(", ")
            ),
        ))
    }
}

/// Trims a string option and turns blank strings into `None`.
pub fn blank_to_none(value: &mut Option<String>) {
    if let Some(inner) = value.as_mut() {
        let trimmed = inner.trim();
        if trimmed.is_empty() {
            *value = None;
        } else if trimmed.len() != inner.len() {
            *inner = trimmed.to_string();
        }
    }
}

/// Records an error when a required value is missing.
pub fn require<T>(errors: &mut FieldErrors, field: &str, value: Option<&T>) {
    if value.is_none() {
        errors.add(field, format!("The {} field is required.", label(field)));
    }
}

/// Records an error when `date` lies after `today`.
pub fn not_after(errors: &mut FieldErrors, field: &str, date: Option<NaiveDate>, today: NaiveDate) {
    if let Some(date) = date
        && date > today
    {
        errors.add(
            field,
            format!("The {} must be a date before or equal to today.", label(field)),
        );
    }
}

/// Records an error when `end` precedes `start`.
pub fn ordered(
    errors: &mut FieldErrors,
    end_field: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    start_field: &str,
) {
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        errors.add(
            end_field,
            format!(
                "The {} must be a date after or equal to {}.",
                label(end_field),
                label(start_field)
            ),
        );
    }
}

/// Records an error when a decimal lies outside `min..=max`.
pub fn decimal_between(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<Decimal>,
    min: Decimal,
    max: Option<Decimal>,
) {
    let Some(value) = value else {
        return;
    };
    if value < min {
        errors.add(field, format!("The {} must be at least {min}.", label(field)));
    }
    if let Some(max) = max
        && value > max
    {
        errors.add(
            field,
            format!("The {} may not be greater than {max}.", label(field)),
        );
    }
}

/// Parses a `YYYY-MM-DD` date, also accepting `DD/MM/YYYY` as typed in spreadsheets.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .ok()
        .or_else(|| {
            // Spreadsheet datetimes such as `1990-05-01 00:00:00`
            value
                .split_whitespace()
                .next()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        })
}
