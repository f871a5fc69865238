pub mod outcome;
pub mod relay;
pub mod send;

use serde_json::{Map, Value};

use crate::error::{AppError, Result};

pub use outcome::{BulkResult, BulkSummary, RecipientOutcome};
pub use relay::RelayConfig;
pub use send::SendRequest;

/// Check that `payload` is an object carrying every `required` field.
/// A field set to `null` counts as missing.
fn require_fields<'a>(payload: &'a Value, required: &[&str]) -> Result<&'a Map<String, Value>> {
    let object = payload
        .as_object()
        .ok_or_else(|| AppError::BadRequest("Request body must be a JSON object".to_string()))?;

    let complete = required
        .iter()
        .all(|field| object.get(*field).is_some_and(|value| !value.is_null()));

    if !complete {
        return Err(AppError::missing_fields(required));
    }

    Ok(object)
}

fn string_field(object: &Map<String, Value>, name: &str) -> Result<String> {
    match object.get(name) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(AppError::Validation(format!("Field '{}' must be a string", name))),
    }
}

/// Optional array of strings. Absent and `null` both yield an empty list.
fn string_list_field(object: &Map<String, Value>, name: &str) -> Result<Vec<String>> {
    let invalid = || AppError::Validation(format!("Field '{}' must be an array of strings", name));

    match object.get(name) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
            .collect(),
        Some(_) => Err(invalid()),
    }
}
