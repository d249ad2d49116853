use serde_json::Value;

use super::{ModelVerdict, RemoteEvaluationError};

const MIN_MODEL_SCORE: f64 = 0.0;
const MAX_MODEL_SCORE: f64 = 10.0;

/// Return the first balanced `{...}` span in `text`.
///
/// Braces inside JSON string literals are ignored. A `{` that never closes is skipped and the
/// search resumes at the next one.
pub fn extract_first_json_object(text: &str) -> Option<&str> {
    let mut search_from = 0;

    while let Some(relative) = text[search_from..].find('{') {
        let start = search_from + relative;
        if let Some(end) = balanced_end(&text[start..]) {
            return Some(&text[start..start + end]);
        }
        search_from = start + 1;
    }

    None
}

/// Byte length of the balanced object at the head of `candidate`, if it closes.
fn balanced_end(candidate: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in candidate.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(offset + ch.len_utf8());
                }
            }
            _ => {}
        }
    }

    None
}

/// Extract, validate, and clamp a verdict from raw model text.
pub fn parse_verdict(raw: &str) -> Result<ModelVerdict, RemoteEvaluationError> {
    let span = extract_first_json_object(raw).ok_or(RemoteEvaluationError::MissingJson)?;
    let value: Value = serde_json::from_str(span)?;

    let score = value
        .get("score")
        .and_then(Value::as_f64)
        .ok_or(RemoteEvaluationError::InvalidShape { field: "score" })?;
    let flagged_as_ai = value
        .get("flagged_as_ai")
        .and_then(Value::as_bool)
        .ok_or(RemoteEvaluationError::InvalidShape {
            field: "flagged_as_ai",
        })?;
    let comments = value
        .get("comments")
        .and_then(Value::as_str)
        .ok_or(RemoteEvaluationError::InvalidShape { field: "comments" })?;

    Ok(ModelVerdict {
        score: score.round().clamp(MIN_MODEL_SCORE, MAX_MODEL_SCORE) as u8,
        flagged_as_ai,
        comments: comments.to_string(),
    })
}
