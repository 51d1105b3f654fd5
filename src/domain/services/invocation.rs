#[cfg(test)]
#[path = "invocation_test.rs"]
mod tests;

use anyhow::Result;

use crate::domain::models::MediaAttachment;
use crate::domain::models::Operation;
use crate::domain::models::PipelineError;
use crate::domain::models::ReasoningBox;
use crate::domain::models::ReasoningPrompt;

/// Builds the reply-format instruction appended to every rendered prompt so
/// the backend produces the operation's declared output shape.
fn output_instruction(operation: &Operation) -> String {
    let fields = operation
        .output
        .fields
        .iter()
        .map(|field| {
            return format!("\"{}\" ({})", field.name, field.description);
        })
        .collect::<Vec<String>>()
        .join(", ");

    return format!("\n\nRespond with a single JSON object containing the fields: {fields}. Do not include any text outside the JSON object.");
}

/// Models wrap JSON in markdown fences often enough that stripping them is
/// cheaper than failing the call.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let without_open = match trimmed.find('\n') {
        Some(idx) => &trimmed[idx + 1..],
        None => return trimmed,
    };

    return without_open.trim_end().trim_end_matches("```").trim();
}

fn parse_reply(operation: &Operation, raw: &str) -> Result<serde_json::Value> {
    let cleaned = strip_code_fences(raw);

    let parsed = serde_json::from_str::<serde_json::Value>(cleaned).map_err(|err| {
        tracing::error!(operation = operation.name, error = %err, "Unparseable reply");
        return PipelineError::Service(format!(
            "{} returned unparseable output: {err}",
            operation.name
        ));
    })?;

    operation.output.validate_output(&parsed)?;

    return Ok(parsed);
}

/// One schema-validated call to the reasoning service: validates the input
/// against the operation's input schema (failing before any dispatch),
/// renders the output-format instruction onto the prompt, invokes the
/// backend, and validates the parsed reply against the output schema.
pub async fn invoke(
    backend: &ReasoningBox,
    operation: &Operation,
    input: &serde_json::Value,
    prompt: String,
    media: Option<MediaAttachment>,
) -> Result<serde_json::Value> {
    operation.input.validate_input(input)?;

    let text = format!("{prompt}{}", output_instruction(operation));
    let reasoning_prompt = match media {
        Some(media) => ReasoningPrompt::with_media(operation.name, text, media),
        None => ReasoningPrompt::new(operation.name, text),
    };

    let raw = backend.invoke(reasoning_prompt).await?;
    tracing::debug!(operation = operation.name, body = %raw, "Reasoning reply");

    return parse_reply(operation, &raw);
}

/// Reads a text field from a validated reply, substituting the operation's
/// fallback when the model returned a semantically empty result.
pub fn output_text(reply: &serde_json::Value, field: &str, fallback: &str) -> String {
    if let Some(text) = reply.get(field).and_then(|entry| return entry.as_str()) {
        if !text.trim().is_empty() {
            return text.to_string();
        }
    }

    return fallback.to_string();
}
