pub mod ollama;
pub mod openai;

use anyhow::bail;
use anyhow::Result;

use crate::domain::models::ReasoningBox;
use crate::domain::models::ReasoningName;

pub struct ReasoningManager {}

impl ReasoningManager {
    pub fn get(name: ReasoningName) -> Result<ReasoningBox> {
        if name == ReasoningName::Ollama {
            return Ok(Box::<ollama::Ollama>::default());
        }

        if name == ReasoningName::OpenAI {
            return Ok(Box::<openai::OpenAI>::default());
        }

        bail!(format!("No reasoning backend implemented for {name}"))
    }
}
