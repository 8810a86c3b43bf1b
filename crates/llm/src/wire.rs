//! Gemini `generateContent` request and response handling.

use pipeline::GenerationError;
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Builds the JSON body for a single-turn text prompt.
pub(crate) fn request_body(prompt: &str) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{"text": prompt}]
        }]
    })
}

/// Extracts the generated text from a `generateContent` response.
///
/// Text from every part of the first candidate is concatenated in order.
pub(crate) fn parse_response(body: &Value) -> Result<String, GenerationError> {
    let candidates = body["candidates"].as_array();

    if candidates.map_or(true, |c| c.is_empty()) {
        if let Some(reason) = body["promptFeedback"]["blockReason"].as_str() {
            return Err(GenerationError::generation(format!(
                "Prompt was blocked by the model: {reason}"
            )));
        }
        return Err(GenerationError::generation(
            "Response contained no candidates",
        ));
    }

    let candidate = &body["candidates"][0];
    let text: String = candidate["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part["text"].as_str())
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate["finishReason"].as_str().unwrap_or("unknown");
        return Err(GenerationError::generation(format!(
            "Response contained no text (finish reason: {reason})"
        )));
    }

    Ok(text)
}

/// Maps a non-success HTTP status to a [`GenerationError`].
pub(crate) fn map_http_error(status: StatusCode, body_text: &str) -> GenerationError {
    let detail = serde_json::from_str::<Value>(body_text)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body_text.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::generation(format!(
            "Authentication with the generation API failed (HTTP {status}): {detail}"
        )),
        _ => GenerationError::generation(format!("HTTP {status} from generation API: {detail}")),
    }
}
