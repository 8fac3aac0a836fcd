/// Per-entity request validation and response shaping
///
/// Create/update bodies arrive as raw `serde_json::Value` and are run through
/// an explicit schema step per entity. The step collects every field problem
/// (missing, wrong type, over-long, outside a choice set) into a list of
/// [`ValidationErrorDetail`] instead of stopping at the first one, which is
/// what lets a 400 response name all offending fields at once.
///
/// Fields outside an entity's allow-list are ignored on input. Server-assigned
/// fields (`id`, `created_at`, `date_joined`) are never writable. Response
/// body structs emit exactly the allow-listed fields, with foreign keys as
/// bare identifier values.

pub mod comment;
pub mod project;
pub mod task;
pub mod user;

use crate::error::ValidationErrorDetail;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Length bound for free-form text fields, which carry no schema limit
pub(crate) const UNBOUNDED: usize = usize::MAX;

/// Resolves a request body to a JSON object, or a single body-level error
pub(crate) fn body_object(
    value: &Value,
) -> Result<&Map<String, Value>, Vec<ValidationErrorDetail>> {
    value.as_object().ok_or_else(|| {
        vec![ValidationErrorDetail::new(
            "non_field_errors",
            "Invalid data. Expected a JSON object.",
        )]
    })
}

fn push_required(errors: &mut Vec<ValidationErrorDetail>, field: &str) {
    errors.push(ValidationErrorDetail::new(field, "This field is required."));
}

/// Validates one string value against blank/length rules
fn string_value(
    field: &str,
    value: &Value,
    max_len: usize,
    errors: &mut Vec<ValidationErrorDetail>,
) -> Option<String> {
    match value {
        Value::String(s) => {
            if s.is_empty() {
                errors.push(ValidationErrorDetail::new(
                    field,
                    "This field may not be blank.",
                ));
                return None;
            }
            if s.chars().count() > max_len {
                errors.push(ValidationErrorDetail::new(
                    field,
                    format!("Ensure this field has no more than {} characters.", max_len),
                ));
                return None;
            }
            Some(s.clone())
        }
        Value::Null => {
            errors.push(ValidationErrorDetail::new(
                field,
                "This field may not be null.",
            ));
            None
        }
        _ => {
            errors.push(ValidationErrorDetail::new(field, "Not a valid string."));
            None
        }
    }
}

/// Required string field
pub(crate) fn required_string(
    obj: &Map<String, Value>,
    field: &str,
    max_len: usize,
    errors: &mut Vec<ValidationErrorDetail>,
) -> Option<String> {
    match obj.get(field) {
        Some(value) => string_value(field, value, max_len, errors),
        None => {
            push_required(errors, field);
            None
        }
    }
}

/// Optional string field; absent returns None without error
pub(crate) fn optional_string(
    obj: &Map<String, Value>,
    field: &str,
    max_len: usize,
    errors: &mut Vec<ValidationErrorDetail>,
) -> Option<String> {
    obj.get(field)
        .and_then(|value| string_value(field, value, max_len, errors))
}

/// Validates one reference value (a bare id, numeric or numeric string)
fn reference_value(
    field: &str,
    value: &Value,
    errors: &mut Vec<ValidationErrorDetail>,
) -> Option<i64> {
    let id = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse::<i64>().ok(),
        _ => None,
    };

    if id.is_none() {
        errors.push(ValidationErrorDetail::new(
            field,
            "Incorrect type. Expected pk value.",
        ));
    }
    id
}

/// Required foreign-key field
pub(crate) fn required_reference(
    obj: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<ValidationErrorDetail>,
) -> Option<i64> {
    match obj.get(field) {
        Some(Value::Null) => {
            errors.push(ValidationErrorDetail::new(
                field,
                "This field may not be null.",
            ));
            None
        }
        Some(value) => reference_value(field, value, errors),
        None => {
            push_required(errors, field);
            None
        }
    }
}

/// Optional nullable foreign-key field; absent and null both return None
pub(crate) fn optional_reference(
    obj: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<ValidationErrorDetail>,
) -> Option<i64> {
    match obj.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => reference_value(field, value, errors),
    }
}

/// Required RFC 3339 datetime field
pub(crate) fn required_datetime(
    obj: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<ValidationErrorDetail>,
) -> Option<DateTime<Utc>> {
    match obj.get(field) {
        Some(value) => datetime_value(field, value, errors),
        None => {
            push_required(errors, field);
            None
        }
    }
}

/// Optional RFC 3339 datetime field
pub(crate) fn optional_datetime(
    obj: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<ValidationErrorDetail>,
) -> Option<DateTime<Utc>> {
    obj.get(field)
        .and_then(|value| datetime_value(field, value, errors))
}

fn datetime_value(
    field: &str,
    value: &Value,
    errors: &mut Vec<ValidationErrorDetail>,
) -> Option<DateTime<Utc>> {
    let parsed = value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    if parsed.is_none() {
        errors.push(ValidationErrorDetail::new(
            field,
            "Datetime has wrong format. Use ISO 8601 (e.g. 2024-06-12T10:00:00Z).",
        ));
    }
    parsed
}

/// Validates one value against a closed choice set
fn choice_value<T>(
    field: &str,
    value: &Value,
    choices: &'static [&'static str],
    parse: fn(&str) -> Option<T>,
    errors: &mut Vec<ValidationErrorDetail>,
) -> Option<T> {
    let parsed = value.as_str().and_then(parse);

    if parsed.is_none() {
        let raw = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        errors.push(ValidationErrorDetail::new(
            field,
            format!(
                "\"{}\" is not a valid choice. Valid choices: {}.",
                raw,
                choices.join(", ")
            ),
        ));
    }
    parsed
}

/// Required choice field
pub(crate) fn required_choice<T>(
    obj: &Map<String, Value>,
    field: &str,
    choices: &'static [&'static str],
    parse: fn(&str) -> Option<T>,
    errors: &mut Vec<ValidationErrorDetail>,
) -> Option<T> {
    match obj.get(field) {
        Some(value) => choice_value(field, value, choices, parse, errors),
        None => {
            push_required(errors, field);
            None
        }
    }
}

/// Optional choice field; absent returns None without error
pub(crate) fn optional_choice<T>(
    obj: &Map<String, Value>,
    field: &str,
    choices: &'static [&'static str],
    parse: fn(&str) -> Option<T>,
    errors: &mut Vec<ValidationErrorDetail>,
) -> Option<T> {
    obj.get(field)
        .and_then(|value| choice_value(field, value, choices, parse, errors))
}
