//! Recover the classification object from raw model output

use crate::error::ClassifierError;
use dacat_domain::Category;
use serde_json::Value;

/// The two fields the model is asked to produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResponse {
    /// Category named by the model, validated against the taxonomy
    pub category: Category,

    /// The model's explanation
    pub reason: String,
}

/// Parse model output into a classification response
///
/// Tolerates markdown fences and prose around the object. Fails when there is
/// no balanced object, the object is not valid JSON, `category` or `reason`
/// is missing or not a string, or the category is not a taxonomy label.
pub fn parse_response(response: &str) -> Result<ClassificationResponse, ClassifierError> {
    let json_str = extract_json(response).ok_or(ClassifierError::NoStructuredData)?;

    let json: Value = serde_json::from_str(&json_str)?;
    let obj = json
        .as_object()
        .ok_or_else(|| ClassifierError::JsonParse("Expected JSON object".to_string()))?;

    let category = obj
        .get("category")
        .and_then(Value::as_str)
        .ok_or(ClassifierError::MissingField("category"))?;

    let reason = obj
        .get("reason")
        .and_then(Value::as_str)
        .ok_or(ClassifierError::MissingField("reason"))?;

    let category = Category::parse(category)
        .ok_or_else(|| ClassifierError::UnknownCategory(category.to_string()))?;

    Ok(ClassificationResponse {
        category,
        reason: reason.to_string(),
    })
}

/// Extract the first balanced `{...}` span, ignoring code fences
///
/// Braces inside JSON string literals do not count towards nesting. An
/// opening brace that is never closed is skipped in favour of the earliest
/// object that does close. Runs in a single pass over the text.
pub fn extract_json(response: &str) -> Option<String> {
    let cleaned = response.replace("```json", "").replace("```", "");

    let mut open: Vec<usize> = Vec::new();
    let mut best: Option<(usize, usize)> = None;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in cleaned.char_indices() {
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
            '"' if !open.is_empty() => in_string = true,
            '{' => open.push(idx),
            '}' => {
                let Some(start) = open.pop() else { continue };
                if best.is_none_or(|(s, _)| start < s) {
                    best = Some((start, idx));
                }
                if open.is_empty() {
                    break;
                }
            }
            _ => {}
        }
    }

    best.map(|(start, end)| cleaned[start..=end].to_string())
}
