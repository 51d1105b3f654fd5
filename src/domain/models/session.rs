#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use anyhow::Result;
use chrono::Local;
use chrono::SecondsFormat;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Message;
use super::Role;

pub const DEFAULT_SESSION_TITLE: &str = "New analysis";

const TITLE_MAX_CHARS: usize = 30;

/// Example inputs shown when a fresh session starts, matching the sample data
/// the assistant is tuned for. Users overwrite these with their own runs.
pub const DEFAULT_ML_OUTPUT: &str = r#"{
  "pathogenicRisk": { "score": 0.85, "category": "High" },
  "crisprSystem": { "present": true, "details": "Type I-F system detected" },
  "resistanceGenes": ["ampC", "blaTEM-1"],
  "gcContent": "62.5%",
  "genomeLength": "4.8 Mbp",
  "orfCount": 4500
}"#;

pub const DEFAULT_RESEARCH_NOTES: &str = r#"Initial findings from sequencing run #A42. The sample is sourced from wastewater treatment facility.
Preliminary BLAST results show homology with Escherichia coli strains.
Focus of this analysis is to identify novel bacteriophages capable of lysing multi-drug resistant E. coli.
The high GC content is unusual and warrants further investigation. The presence of ampC and blaTEM-1 confirms beta-lactam resistance."#;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub ml_input: String,
    pub notes: String,
    pub summary: String,
    pub updated_at: String,
    pub messages: Vec<Message>,
}

impl Session {
    pub fn touch(&mut self) {
        self.updated_at = Local::now().to_rfc3339_opts(SecondsFormat::Nanos, false);
    }

    /// Title derived from the first user message, or the default for sessions
    /// without any conversation yet.
    pub fn derived_title(&self) -> String {
        let first_user_message = self
            .messages
            .iter()
            .find(|message| return message.role == Role::User);

        if let Some(message) = first_user_message {
            let first_line = message.content.split('\n').next().unwrap_or("").trim();
            let truncated = first_line
                .chars()
                .take(TITLE_MAX_CHARS)
                .collect::<String>()
                .trim_end()
                .to_string();
            if first_line.chars().count() > TITLE_MAX_CHARS {
                return format!("{truncated}...");
            }
            if !truncated.is_empty() {
                return truncated;
            }
        }

        return DEFAULT_SESSION_TITLE.to_string();
    }

    /// The conversation without the welcome message, which is presentation
    /// only and must never leave the client.
    pub fn conversation(&self) -> Vec<&Message> {
        return self
            .messages
            .iter()
            .filter(|message| return !message.is_welcome())
            .collect();
    }

    /// The last `turns` conversation messages serialized for prompt context.
    /// Only role and content are exposed to the reasoning service.
    pub fn recent_history(&self, turns: usize) -> Result<String> {
        let conversation = self.conversation();
        let skip = conversation.len().saturating_sub(turns);

        let trimmed = conversation
            .iter()
            .skip(skip)
            .map(|message| {
                return serde_json::json!({
                    "role": message.role.to_string(),
                    "content": message.content,
                });
            })
            .collect::<Vec<serde_json::Value>>();

        return Ok(serde_json::to_string(&trimmed)?);
    }
}
