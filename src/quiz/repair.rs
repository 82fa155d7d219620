//! Locating and repairing the JSON array inside a model reply.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::AttemptError;

static TRAILING_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("valid trailing-comma regex"));

/// The substring from the first `[` to the last `]`, if both exist in that order.
pub fn extract_json_array(response: &str) -> Option<&str> {
    let start = response.find('[')?;
    let end = response.rfind(']')?;
    (start < end).then(|| &response[start..=end])
}

/// Fix the malformations models commonly produce: single-quoted strings,
/// trailing commas before `}`/`]`, and raw control characters.
pub fn repair_json(json: &str) -> String {
    let quoted = json.replace('\'', "\"");
    let without_trailing = TRAILING_COMMA_RE.replace_all(&quoted, "$1");
    without_trailing.chars().filter(|c| !c.is_control()).collect()
}

/// Extract and parse the question array from a raw reply. The array is
/// parsed as-is first; the repair pass only runs when that fails, so valid
/// JSON containing apostrophes is left intact.
pub fn parse_question_array(response: &str) -> Result<Vec<Value>, AttemptError> {
    let raw = extract_json_array(response).ok_or(AttemptError::NoJsonArray)?;

    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(_) => {
            let repaired = repair_json(raw);
            tracing::debug!("Repaired quiz JSON: {repaired}");
            serde_json::from_str::<Value>(&repaired).map_err(AttemptError::Json)?
        }
    };

    match value {
        Value::Array(items) => Ok(items),
        _ => Err(AttemptError::NotAnArray),
    }
}
