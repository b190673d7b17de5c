use serde::Deserialize;

use super::super::domain::CandidateItem;

/// Typed parse failure for model output. The parser never guesses a partial
/// structure; anything that does not deserialize cleanly is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseParseError {
    #[error("response contains no JSON object")]
    NoJsonObject,
    #[error("response JSON does not match the checklist schema: {0}")]
    Schema(String),
}

#[derive(Debug, Deserialize)]
struct ChecklistPayload {
    checklist: Vec<CandidateItem>,
}

/// Extract the candidate items from a raw completion.
///
/// Models wrap JSON in markdown fences or pad it with prose, so the object is
/// located before strict deserialization: fenced blocks are unwrapped, then
/// the outermost brace pair is taken as the payload.
pub(crate) fn parse_candidates(raw: &str) -> Result<Vec<CandidateItem>, ResponseParseError> {
    let unfenced = strip_markdown_fences(raw.trim());
    let object = extract_object(unfenced).ok_or(ResponseParseError::NoJsonObject)?;

    let payload: ChecklistPayload =
        serde_json::from_str(object).map_err(|err| ResponseParseError::Schema(err.to_string()))?;

    Ok(payload.checklist)
}

fn strip_markdown_fences(text: &str) -> &str {
    for opener in ["```json", "```"] {
        if let Some(start) = text.find(opener) {
            let body = &text[start + opener.len()..];
            if let Some(end) = body.find("```") {
                return body[..end].trim();
            }
        }
    }
    text
}

fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end >= start).then(|| &text[start..=end])
}
