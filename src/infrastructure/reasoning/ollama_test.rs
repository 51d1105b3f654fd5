use anyhow::Result;

use super::GenerateResponse;
use super::Model;
use super::ModelListResponse;
use super::Ollama;
use crate::domain::models::MediaAttachment;
use crate::domain::models::PipelineError;
use crate::domain::models::Reasoning;
use crate::domain::models::ReasoningPrompt;

impl Ollama {
    fn with_url(url: String) -> Ollama {
        return Ollama {
            url,
            timeout: "200".to_string(),
        };
    }
}

#[tokio::test]
async fn it_successfully_health_checks() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/").with_status(200).create();

    let backend = Ollama::with_url(server.url());
    let res = backend.health_check().await;

    assert!(res.is_ok());
    mock.assert();
}

#[tokio::test]
async fn it_fails_health_checks() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/").with_status(500).create();

    let backend = Ollama::with_url(server.url());
    let res = backend.health_check().await;

    assert!(res.is_err());
    mock.assert();
}

#[tokio::test]
async fn it_lists_models() -> Result<()> {
    let body = serde_json::to_string(&ModelListResponse {
        models: vec![
            Model {
                name: "first".to_string(),
            },
            Model {
                name: "second".to_string(),
            },
        ],
    })?;

    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_body(body)
        .create();

    let backend = Ollama::with_url(server.url());
    let res = backend.list_models().await?;

    assert_eq!(res, vec!["first".to_string(), "second".to_string()]);
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_invokes_with_json_output() -> Result<()> {
    let body = serde_json::to_string(&GenerateResponse {
        response: r#"{"summary":"High risk."}"#.to_string(),
    })?;

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/generate")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "format": "json",
            "stream": false,
            "prompt": "Summarize the findings.",
        })))
        .with_status(200)
        .with_body(body)
        .create();

    let backend = Ollama::with_url(server.url());
    let res = backend
        .invoke(ReasoningPrompt::new(
            "summarize-key-findings",
            "Summarize the findings.".to_string(),
        ))
        .await?;

    assert_eq!(res, r#"{"summary":"High risk."}"#);
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_forwards_media_as_images() -> Result<()> {
    let body = serde_json::to_string(&GenerateResponse {
        response: r#"{"text":"Extracted."}"#.to_string(),
    })?;

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/generate")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "images": ["aGVsbG8="],
        })))
        .with_status(200)
        .with_body(body)
        .create();

    let backend = Ollama::with_url(server.url());
    let media = MediaAttachment {
        mime_type: "image/png".to_string(),
        data_base64: "aGVsbG8=".to_string(),
    };
    let res = backend
        .invoke(ReasoningPrompt::with_media(
            "extract-text-from-file",
            "Extract the text.".to_string(),
            media,
        ))
        .await?;

    assert_eq!(res, r#"{"text":"Extracted."}"#);
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_classifies_server_errors_as_retryable() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/generate")
        .with_status(503)
        .create();

    let backend = Ollama::with_url(server.url());
    let err = backend
        .invoke(ReasoningPrompt::new("summarize-key-findings", "Summarize.".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::Service(_))
    ));
    mock.assert();
}
