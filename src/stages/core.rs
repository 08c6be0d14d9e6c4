//! Shared helpers for the LLM-backed stages.
//!
//! Model output is free text that should contain one JSON object. These
//! helpers locate that object and pull typed fields out of it with
//! [`StageError`]s that name the offending field.

use serde_json::Value;

use crate::error::StageError;

/// Sampling temperature for every analytical stage.
pub const STAGE_TEMPERATURE: f32 = 0.2;

/// Extract the JSON object from a model response.
///
/// Every stage replies with a single object, so only objects are accepted.
/// Candidates are tried in order and the first that parses wins:
/// 1. The whole response
/// 2. The body of each fenced block, with any language tag dropped
/// 3. Each top-level balanced `{...}` span in the text
///
/// Prose braces such as `{sic}` before the real payload are skipped.
///
/// # Errors
///
/// Returns [`StageError::JsonParseFailed`] if no candidate parses as a JSON
/// object. The message carries the last parse error when a candidate was
/// found but malformed.
///
/// # Examples
///
/// ```
/// use bias_lens::stages::extract_json;
///
/// let json = extract_json("Sure! {\"detections\": []} Hope that helps.").unwrap();
/// assert!(json["detections"].as_array().unwrap().is_empty());
///
/// assert!(extract_json("no json here").is_err());
/// assert!(extract_json("[1, 2, 3]").is_err());
/// ```
pub fn extract_json(text: &str) -> Result<Value, StageError> {
    let mut last_error = None;

    for candidate in candidates(text.trim()) {
        match serde_json::from_str::<Value>(candidate) {
            Ok(value) if value.is_object() => return Ok(value),
            Ok(_) => {}
            Err(e) => last_error = Some(e),
        }
    }

    let message = match last_error {
        Some(e) => format!(
            "Failed to parse JSON object: {e}. Preview: {}",
            preview(text, 100)
        ),
        None => format!("No JSON object found in response: {}", preview(text, 100)),
    };
    Err(StageError::JsonParseFailed { message })
}

fn candidates(text: &str) -> impl Iterator<Item = &str> + '_ {
    std::iter::once(text)
        .chain(fenced_blocks(text))
        .chain(balanced_objects(text))
        .filter(|candidate| candidate.starts_with('{'))
}

/// Bodies of closed ```` ``` ```` blocks.
fn fenced_blocks(text: &str) -> Vec<&str> {
    let parts: Vec<&str> = text.split("```").collect();
    parts
        .iter()
        .enumerate()
        .skip(1)
        .step_by(2)
        .filter(|(i, _)| i + 1 < parts.len())
        .map(|(_, body)| strip_language_tag(body))
        .collect()
}

fn strip_language_tag(body: &str) -> &str {
    let body = body.trim();
    match body.split_once('\n') {
        Some((tag, rest)) if !tag.trim_start().starts_with('{') => rest.trim(),
        _ => body,
    }
}

/// Top-level `{...}` spans, left to right. Stops at the first unclosed brace.
fn balanced_objects(text: &str) -> impl Iterator<Item = &str> + '_ {
    let mut rest = text;
    std::iter::from_fn(move || {
        let start = rest.find('{')?;
        let object = balanced_object(&rest[start..])?;
        rest = &rest[start + object.len()..];
        Some(object)
    })
}

/// The balanced object at the start of `text`, which must begin with `{`.
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// First `max_chars` characters of `text`, with an ellipsis if cut.
#[must_use]
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Required array field.
pub(crate) fn required_array<'a>(json: &'a Value, field: &str) -> Result<&'a Vec<Value>, StageError> {
    json.get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| missing(field))
}

/// Required string field.
pub(crate) fn required_str<'a>(json: &'a Value, field: &str) -> Result<&'a str, StageError> {
    json.get(field).and_then(Value::as_str).ok_or_else(|| missing(field))
}

/// Required numeric field.
pub(crate) fn required_f64(json: &Value, field: &str) -> Result<f64, StageError> {
    json.get(field).and_then(Value::as_f64).ok_or_else(|| missing(field))
}

/// Required non-negative integer field.
pub(crate) fn required_index(json: &Value, field: &str) -> Result<usize, StageError> {
    let value = json.get(field).ok_or_else(|| missing(field))?;
    value
        .as_u64()
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| StageError::InvalidValue {
            field: field.to_string(),
            reason: format!("expected a non-negative integer, got {value}"),
        })
}

/// Required boolean field.
pub(crate) fn required_bool(json: &Value, field: &str) -> Result<bool, StageError> {
    json.get(field).and_then(Value::as_bool).ok_or_else(|| missing(field))
}

/// Optional string field; empty strings count as absent.
pub(crate) fn optional_str(json: &Value, field: &str) -> Option<String> {
    json.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Optional list of strings; non-string entries are skipped.
pub(crate) fn string_list(json: &Value, field: &str) -> Vec<String> {
    json.get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn missing(field: &str) -> StageError {
    StageError::MissingField {
        field: field.to_string(),
    }
}
