#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;

use anyhow::Result;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::domain::models::Field;
use crate::domain::models::FilePayload;
use crate::domain::models::MediaAttachment;
use crate::domain::models::Operation;
use crate::domain::models::PipelineError;
use crate::domain::models::ReasoningBox;
use crate::domain::models::Schema;
use crate::domain::services::invocation;
use crate::domain::services::retry;
use crate::infrastructure::documents;

const OPERATION: Operation = Operation {
    name: "extract-text-from-file",
    input: Schema {
        name: "extract-text-from-file-input",
        fields: &[Field {
            name: "fileContent",
            required: true,
            description: "The textual content of the file, or a note that the file is an image.",
        }],
    },
    output: Schema {
        name: "extract-text-from-file-output",
        fields: &[Field {
            name: "text",
            required: true,
            description: "The extracted text from the file.",
        }],
    },
};

fn render_prompt(file_content: &str) -> String {
    return format!(
        r#"You are an OCR and text extraction specialist.
Analyze the following content from a file (which could be an image or a PDF).
Extract only the biologically or research-relevant information.
Ignore formatting, page numbers, headers, footers, and unrelated text.
Present the extracted information as clean, readable text.

File Content:
{file_content}"#
    );
}

async fn clean_through_model(backend: &ReasoningBox, file_content: &str) -> Result<String> {
    let input = serde_json::json!({ "fileContent": file_content });
    let prompt = render_prompt(file_content);

    let reply = retry::with_retry(
        || return invocation::invoke(backend, &OPERATION, &input, prompt.clone(), None),
        retry::configured_max_retries(),
        retry::configured_initial_delay(),
    )
    .await?;

    return Ok(invocation::output_text(&reply, "text", ""));
}

async fn extract_from_image(backend: &ReasoningBox, file: &FilePayload) -> Result<String> {
    let content = "This is an image file. Extract relevant text.";
    let input = serde_json::json!({ "fileContent": content });
    let media = MediaAttachment {
        mime_type: file.mime_type.to_string(),
        data_base64: BASE64.encode(&file.data),
    };
    let prompt = render_prompt(content);

    let reply = retry::with_retry(
        || {
            return invocation::invoke(
                backend,
                &OPERATION,
                &input,
                prompt.clone(),
                Some(media.clone()),
            );
        },
        retry::configured_max_retries(),
        retry::configured_initial_delay(),
    )
    .await?;

    return Ok(invocation::output_text(&reply, "text", ""));
}

/// Extracts research-relevant text from an uploaded file. PDFs run through
/// the local extraction path before a cleanup pass; images go to the backend
/// as multimodal input; unknown MIME types fail before any call is attempted.
pub async fn extract_text(backend: &ReasoningBox, file: &FilePayload) -> Result<String> {
    if file.is_pdf() {
        let text = documents::extract_text(&file.data)?;
        return clean_through_model(backend, &text).await;
    }

    if file.is_image() {
        return extract_from_image(backend, file).await;
    }

    if file.is_text() {
        let text = String::from_utf8(file.data.clone()).map_err(|_| {
            return PipelineError::Validation(format!(
                "{} is not valid UTF-8 text",
                file.filename
            ));
        })?;
        return clean_through_model(backend, &text).await;
    }

    return Err(PipelineError::UnsupportedMedia(format!(
        "Unsupported file type: {}",
        file.mime_type
    ))
    .into());
}
