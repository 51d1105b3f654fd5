#[cfg(test)]
#[path = "documents_test.rs"]
mod tests;

use anyhow::Result;

use crate::domain::models::PipelineError;

/// Extracts the raw text of a PDF locally. The document bytes never reach the
/// reasoning service; only the extracted text travels further.
pub fn extract_text(data: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(data).map_err(|err| {
        return PipelineError::Validation(format!("Could not read the PDF: {err}"));
    })?;

    // pdf-extract separates pages with form feeds.
    let cleaned = text
        .split('\x0c')
        .map(|page| return page.trim())
        .filter(|page| return !page.is_empty())
        .collect::<Vec<&str>>()
        .join("\n\n");

    return Ok(cleaned);
}
