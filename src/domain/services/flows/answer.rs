#[cfg(test)]
#[path = "answer_test.rs"]
mod tests;

use anyhow::Result;

use crate::domain::models::Field;
use crate::domain::models::Operation;
use crate::domain::models::ReasoningBox;
use crate::domain::models::Schema;
use crate::domain::services::invocation;
use crate::domain::services::retry;

/// The canned out-of-scope reply. A reply equal to this string is a valid,
/// successful response, not an error.
pub const SCOPE_REFUSAL: &str =
    "I'm designed exclusively for synthetic biology and bacteriophage research within this platform.";

pub const ANSWER_FALLBACK: &str = "I couldn't process that. Please try again.";

const OPERATION: Operation = Operation {
    name: "answer-domain-question",
    input: Schema {
        name: "answer-domain-question-input",
        fields: &[
            Field {
                name: "question",
                required: true,
                description: "The question to be answered.",
            },
            Field {
                name: "researchNotes",
                required: false,
                description: "Research notes to use as context.",
            },
            Field {
                name: "mlSummaries",
                required: false,
                description: "ML summaries to use as context.",
            },
            Field {
                name: "chatHistory",
                required: false,
                description: "Previous chat history.",
            },
        ],
    },
    output: Schema {
        name: "answer-domain-question-output",
        fields: &[Field {
            name: "answer",
            required: true,
            description: "The answer to the question.",
        }],
    },
};

fn render_prompt(
    question: &str,
    research_notes: &str,
    ml_summaries: &str,
    chat_history: &str,
) -> String {
    return format!(
        r#"You are PhazeGEN, a highly specialized AI research assistant. Your persona is calm, encouraging, and clear.

STRICT SCOPE: You ONLY operate within Bacteriology, Synthetic biology (theoretical), Bacteriophage research, Antimicrobial resistance (AMR), and Computational phage/protein design.

If the user asks about anything else (e.g., cooking, movies, finance), you MUST respond ONLY with: "{SCOPE_REFUSAL}"

SAFETY: NEVER provide wet-lab protocols, step-by-step experiments, or genetic synthesis instructions. All outputs are "In-silico theoretical research output for academic discussion only."

Use the following context to answer the user's research question.

Research Notes: {research_notes}

ML Summaries: {ml_summaries}

Chat History: {chat_history}

Question: {question}

Answer:"#
    );
}

/// Answers a research question using the notes, prior summaries, and the
/// trimmed recent chat history as context. Out-of-scope questions come back
/// as the canned refusal.
pub async fn answer_domain_question(
    backend: &ReasoningBox,
    question: &str,
    research_notes: &str,
    ml_summaries: &str,
    chat_history: &str,
) -> Result<String> {
    let input = serde_json::json!({
        "question": question,
        "researchNotes": research_notes,
        "mlSummaries": ml_summaries,
        "chatHistory": chat_history,
    });
    let prompt = render_prompt(question, research_notes, ml_summaries, chat_history);

    let reply = retry::with_retry(
        || return invocation::invoke(backend, &OPERATION, &input, prompt.clone(), None),
        retry::configured_max_retries(),
        retry::configured_initial_delay(),
    )
    .await?;

    return Ok(invocation::output_text(&reply, "answer", ANSWER_FALLBACK));
}
