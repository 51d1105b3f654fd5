use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use strum::EnumIter;
use strum::EnumVariantNames;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ReasoningName {
    Ollama,
    OpenAI,
}

impl ReasoningName {
    pub fn parse(text: String) -> Result<ReasoningName> {
        match text.to_lowercase().as_str() {
            "ollama" => return Ok(ReasoningName::Ollama),
            "openai" => return Ok(ReasoningName::OpenAI),
            _ => bail!(format!("{text} is not a valid reasoning backend")),
        }
    }
}

/// Binary content forwarded to the reasoning service as multimodal input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaAttachment {
    pub mime_type: String,
    pub data_base64: String,
}

pub struct ReasoningPrompt {
    pub operation: String,
    pub text: String,
    pub media: Option<MediaAttachment>,
}

impl ReasoningPrompt {
    pub fn new(operation: &str, text: String) -> ReasoningPrompt {
        return ReasoningPrompt {
            operation: operation.to_string(),
            text,
            media: None,
        };
    }

    pub fn with_media(operation: &str, text: String, media: MediaAttachment) -> ReasoningPrompt {
        return ReasoningPrompt {
            operation: operation.to_string(),
            text,
            media: Some(media),
        };
    }
}

#[async_trait]
pub trait Reasoning {
    fn name(&self) -> ReasoningName;

    /// Used at startup to verify all configurations are available to work with
    /// the reasoning backend.
    async fn health_check(&self) -> Result<()>;

    /// Lists all models available from the backend.
    async fn list_models(&self) -> Result<Vec<String>>;

    /// Performs a single schema-constrained invocation. The backend is asked
    /// for a JSON reply; the raw reply body is returned for the invocation
    /// layer to parse and validate.
    async fn invoke(&self, prompt: ReasoningPrompt) -> Result<String>;
}

pub type ReasoningBox = Box<dyn Reasoning + Send + Sync>;
