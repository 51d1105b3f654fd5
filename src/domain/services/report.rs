#[cfg(test)]
#[path = "report_test.rs"]
mod tests;

use crate::domain::models::Role;
use crate::domain::models::Session;

const NO_FINDINGS: &str = "No key findings were generated in this session.";

/// Renders a session as a Markdown research report. The welcome message is
/// presentation only and never appears in the transcript.
pub fn render(session: &Session) -> String {
    let mut lines: Vec<String> = vec![
        "# PhazeGEN Research Report".to_string(),
        "".to_string(),
        "## Key Findings".to_string(),
        "".to_string(),
    ];

    if session.summary.trim().is_empty() {
        lines.push(NO_FINDINGS.to_string());
    } else {
        lines.push(session.summary.trim().to_string());
    }

    lines.push("".to_string());
    lines.push("## Structured ML Input".to_string());
    lines.push("".to_string());
    lines.push("```json".to_string());
    lines.push(session.ml_input.trim().to_string());
    lines.push("```".to_string());
    lines.push("".to_string());
    lines.push("## Conversation Transcript".to_string());

    for message in session.conversation() {
        let heading = match message.role {
            Role::Assistant => "### Assistant",
            Role::User => "### User",
        };

        lines.push("".to_string());
        lines.push(heading.to_string());
        lines.push("".to_string());
        for content_line in message.content.split('\n') {
            lines.push(format!("> {content_line}"));
        }
    }

    lines.push("".to_string());

    return lines.join("\n");
}
