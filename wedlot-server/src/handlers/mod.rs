//! HTTP request handlers, one submodule per API area.

pub mod announce;
pub mod draw;
pub mod names;
pub mod winners;

use crate::error::HttpError;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::Value;

/// Pulls a list of strings out of `{ <field>: [...] }`.
///
/// Non-string entries and blank strings are dropped; an absent field, a
/// non-array or a list with nothing usable left is a 400.
pub(crate) fn string_list(
    body: Result<Json<Value>, JsonRejection>,
    field: &str,
) -> Result<Vec<String>, HttpError> {
    let Json(body) = body.map_err(|e| HttpError::BadRequest(e.body_text()))?;
    let label = capitalize(field);

    let items = match body.get(field) {
        Some(Value::Array(items)) => items,
        _ => return Err(HttpError::BadRequest(format!("{} must be an array", label))),
    };
    if items.is_empty() {
        return Err(HttpError::BadRequest(format!(
            "{} array cannot be empty",
            label
        )));
    }

    let valid: Vec<String> = items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if valid.is_empty() {
        return Err(HttpError::BadRequest(format!("No valid {} provided", field)));
    }

    Ok(valid)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: Value) -> Result<Vec<String>, HttpError> {
        string_list(Ok(Json(body)), "names")
    }

    #[test]
    fn test_string_list_filters_entries() {
        let names = parse(json!({ "names": [" Alice ", 7, "", null, "Bob"] })).unwrap();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_string_list_rejections() {
        for (body, expected) in [
            (json!({}), "Names must be an array"),
            (json!({ "names": "Alice" }), "Names must be an array"),
            (json!({ "names": [] }), "Names array cannot be empty"),
            (json!({ "names": ["  ", 3] }), "No valid names provided"),
        ] {
            match parse(body) {
                Err(HttpError::BadRequest(msg)) => assert_eq!(msg, expected),
                other => panic!("unexpected {:?}", other),
            }
        }
    }
}
