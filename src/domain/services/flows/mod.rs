mod answer;
mod extend;
mod extract;
mod summarize;

pub use answer::*;
pub use extend::*;
pub use extract::*;
pub use summarize::*;

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::Mutex;

    use anyhow::Result;
    use async_trait::async_trait;

    use crate::domain::models::PipelineError;
    use crate::domain::models::Reasoning;
    use crate::domain::models::ReasoningBox;
    use crate::domain::models::ReasoningName;
    use crate::domain::models::ReasoningPrompt;

    pub struct RecordedPrompt {
        pub operation: String,
        pub text: String,
        pub has_media: bool,
    }

    struct ScriptedReasoning {
        replies: Mutex<VecDeque<Result<String, String>>>,
        prompts: Arc<Mutex<Vec<RecordedPrompt>>>,
    }

    #[async_trait]
    impl Reasoning for ScriptedReasoning {
        fn name(&self) -> ReasoningName {
            return ReasoningName::Ollama;
        }

        async fn health_check(&self) -> Result<()> {
            return Ok(());
        }

        async fn list_models(&self) -> Result<Vec<String>> {
            return Ok(vec![]);
        }

        async fn invoke(&self, prompt: ReasoningPrompt) -> Result<String> {
            self.prompts.lock().unwrap().push(RecordedPrompt {
                operation: prompt.operation.clone(),
                text: prompt.text.clone(),
                has_media: prompt.media.is_some(),
            });

            let next = self.replies.lock().unwrap().pop_front();
            match next {
                Some(Ok(reply)) => return Ok(reply),
                Some(Err(message)) => return Err(PipelineError::Service(message).into()),
                None => return Err(PipelineError::Service("script exhausted".to_string()).into()),
            }
        }
    }

    /// A backend that replays the given replies in order. `Err` entries fail
    /// the call with a retryable service error.
    pub fn scripted(
        replies: Vec<Result<String, String>>,
    ) -> (ReasoningBox, Arc<Mutex<Vec<RecordedPrompt>>>) {
        let prompts = Arc::new(Mutex::new(vec![]));
        let backend = ScriptedReasoning {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: prompts.clone(),
        };

        return (Box::new(backend), prompts);
    }

    pub fn replies_ok(replies: Vec<&str>) -> (ReasoningBox, Arc<Mutex<Vec<RecordedPrompt>>>) {
        return scripted(
            replies
                .iter()
                .map(|reply| return Ok(reply.to_string()))
                .collect(),
        );
    }
}
