#[cfg(test)]
#[path = "extend_test.rs"]
mod tests;

use anyhow::Result;

use crate::domain::models::Field;
use crate::domain::models::Operation;
use crate::domain::models::ReasoningBox;
use crate::domain::models::Schema;
use crate::domain::services::invocation;
use crate::domain::services::retry;

pub const EXTEND_FALLBACK: &str = "I couldn't process that. Please try again.";

const OPERATION: Operation = Operation {
    name: "extend-explanation-and-insights",
    input: Schema {
        name: "extend-explanation-and-insights-input",
        fields: &[
            Field {
                name: "priorSummary",
                required: true,
                description: "A summary of previous ML analysis.",
            },
            Field {
                name: "additionalNotes",
                required: false,
                description: "Optional additional research notes to consider.",
            },
            Field {
                name: "userQuestion",
                required: true,
                description: "The user question to answer with extended insights.",
            },
        ],
    },
    output: Schema {
        name: "extend-explanation-and-insights-output",
        fields: &[Field {
            name: "extendedInsights",
            required: true,
            description: "Extended explanations and insights based on the prior summary and user question.",
        }],
    },
};

fn render_prompt(prior_summary: &str, additional_notes: Option<&str>, user_question: &str) -> String {
    let notes_block = match additional_notes {
        Some(notes) if !notes.trim().is_empty() => format!("\nAdditional Notes: {notes}\n"),
        _ => "".to_string(),
    };

    return format!(
        r#"You are PhazeGEN, an AI research assistant. Your persona is calm, encouraging, and clear. You extend explanations and insights on existing ML analysis.

SAFETY: All outputs must be labeled "In-silico theoretical research output for academic discussion only." NEVER provide wet-lab protocols, experimental steps, or clinical advice.

Prior Summary: {prior_summary}
{notes_block}
User Question: {user_question}

Based on the prior summary and any additional notes, provide extended explanations and insights to answer the user's question.
Ensure the response is clear, concise, and suitable for academic discussion.
Use clean paragraphs or numbered points. Avoid asterisks or decorative markdown."#
    );
}

/// Extends an existing analysis. Operates only on the already-produced
/// summary; raw notes and ML output are never reprocessed here.
pub async fn extend_insights(
    backend: &ReasoningBox,
    prior_summary: &str,
    additional_notes: Option<&str>,
    user_question: &str,
) -> Result<String> {
    let input = serde_json::json!({
        "priorSummary": prior_summary,
        "additionalNotes": additional_notes.unwrap_or(""),
        "userQuestion": user_question,
    });
    let prompt = render_prompt(prior_summary, additional_notes, user_question);

    let reply = retry::with_retry(
        || return invocation::invoke(backend, &OPERATION, &input, prompt.clone(), None),
        retry::configured_max_retries(),
        retry::configured_initial_delay(),
    )
    .await?;

    return Ok(invocation::output_text(&reply, "extendedInsights", EXTEND_FALLBACK));
}
