#[cfg(test)]
#[path = "summarize_test.rs"]
mod tests;

use anyhow::Result;

use crate::domain::models::Field;
use crate::domain::models::Operation;
use crate::domain::models::ReasoningBox;
use crate::domain::models::Schema;
use crate::domain::services::invocation;
use crate::domain::services::retry;

pub const SUMMARIZE_FALLBACK: &str = "No summary could be generated.";

const OPERATION: Operation = Operation {
    name: "summarize-key-findings",
    input: Schema {
        name: "summarize-key-findings-input",
        fields: &[
            Field {
                name: "mlOutputs",
                required: true,
                description: "Structured ML outputs, including pathogenic risk score, CRISPR system presence, resistance genes, GC content, genome length, ORF count, and optional protein structure predictions.",
            },
            Field {
                name: "researchNotes",
                required: true,
                description: "Uploaded research notes in text format.",
            },
            Field {
                name: "researchContext",
                required: false,
                description: "Existing research context.",
            },
        ],
    },
    output: Schema {
        name: "summarize-key-findings-output",
        fields: &[Field {
            name: "summary",
            required: true,
            description: "A concise summary of the key findings, highlighting the most important aspects of the data.",
        }],
    },
};

fn render_prompt(ml_outputs: &str, research_notes: &str, research_context: &str) -> String {
    return format!(
        r#"You are an AI research assistant that specializes in summarizing genome research data.

Your task is to analyze the provided ML outputs, research notes, and existing research context, and identify the most biologically important signals. Create a concise summary highlighting what matters and why.

ML Outputs:
{ml_outputs}

Research Notes:
{research_notes}

Research Context:
{research_context}

Summary:"#
    );
}

/// Summarizes structured ML outputs and research notes. Works only on the
/// already-extracted textual form of the data, never raw file bytes.
pub async fn summarize_key_findings(
    backend: &ReasoningBox,
    ml_outputs: &str,
    research_notes: &str,
    research_context: Option<&str>,
) -> Result<String> {
    let context = research_context.unwrap_or("");
    let input = serde_json::json!({
        "mlOutputs": ml_outputs,
        "researchNotes": research_notes,
        "researchContext": context,
    });
    let prompt = render_prompt(ml_outputs, research_notes, context);

    let reply = retry::with_retry(
        || return invocation::invoke(backend, &OPERATION, &input, prompt.clone(), None),
        retry::configured_max_retries(),
        retry::configured_initial_delay(),
    )
    .await?;

    return Ok(invocation::output_text(&reply, "summary", SUMMARIZE_FALLBACK));
}
