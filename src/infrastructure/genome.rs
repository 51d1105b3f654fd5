#[cfg(test)]
#[path = "genome_test.rs"]
mod tests;

use anyhow::Result;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AnalysisResult;
use crate::domain::models::PipelineError;

#[derive(Debug, Clone, Serialize)]
struct TextAnalysisRequest {
    sequence: String,
}

/// Client for the external genome-analysis service. Sequences and files go
/// out, a structured analysis comes back; raw sequence bytes are never kept.
pub struct GenomeClient {
    url: String,
}

impl Default for GenomeClient {
    fn default() -> GenomeClient {
        return GenomeClient {
            url: Config::get(ConfigKey::GenomeServiceURL),
        };
    }
}

impl GenomeClient {
    pub fn new(url: &str) -> GenomeClient {
        return GenomeClient {
            url: url.to_string(),
        };
    }

    pub async fn analyze_text(&self, sequence: &str) -> Result<AnalysisResult> {
        let req = TextAnalysisRequest {
            sequence: sequence.to_string(),
        };

        let res = reqwest::Client::new()
            .post(format!("{url}/analyze/text", url = self.url))
            .json(&req)
            .send()
            .await?;

        return GenomeClient::parse_response(res).await;
    }

    pub async fn analyze_file(&self, filename: &str, data: Vec<u8>) -> Result<AnalysisResult> {
        let part = reqwest::multipart::Part::bytes(data).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let res = reqwest::Client::new()
            .post(format!("{url}/analyze/file", url = self.url))
            .multipart(form)
            .send()
            .await?;

        return GenomeClient::parse_response(res).await;
    }

    async fn parse_response(res: reqwest::Response) -> Result<AnalysisResult> {
        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "Genome analysis request failed"
            );
            return Err(PipelineError::Service(format!(
                "Genome analysis failed with status {status}",
                status = res.status().as_u16()
            ))
            .into());
        }

        return Ok(res.json::<AnalysisResult>().await?);
    }
}
