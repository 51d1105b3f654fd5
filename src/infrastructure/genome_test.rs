use anyhow::Result;

use super::GenomeClient;
use crate::domain::models::AnalysisResult;
use crate::domain::models::GenomeMetadata;
use crate::domain::models::PipelineError;
use crate::domain::models::ResistanceGene;

fn analysis() -> AnalysisResult {
    return AnalysisResult {
        metadata: GenomeMetadata {
            length: 4800000,
            gc_content: 62.5,
            orf_count: 4500,
        },
        resistance_genes: vec![ResistanceGene {
            gene: "ampC".to_string(),
            gene_class: "beta-lactam".to_string(),
            confidence: 0.97,
        }],
        crispr_status: "Type I-F system detected".to_string(),
        risk_score: 0.85,
        risk_level: "High".to_string(),
        explanation: "Multiple resistance determinants detected.".to_string(),
        protein_structure: None,
        advanced_ml: None,
    };
}

#[tokio::test]
async fn it_analyzes_sequence_text() -> Result<()> {
    let body = serde_json::to_string(&analysis())?;

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/analyze/text")
        .with_status(200)
        .with_body(body)
        .create();

    let client = GenomeClient::new(&server.url());
    let res = client.analyze_text("ATGCGTAAGGCT").await?;

    assert_eq!(res, analysis());
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_analyzes_uploaded_files() -> Result<()> {
    let body = serde_json::to_string(&analysis())?;

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/analyze/file")
        .with_status(200)
        .with_body(body)
        .create();

    let client = GenomeClient::new(&server.url());
    let res = client
        .analyze_file("sample.fasta", b">seq1\nATGCGTAAGGCT".to_vec())
        .await?;

    assert_eq!(res.risk_level, "High");
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_fails_on_service_errors() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/analyze/text")
        .with_status(500)
        .create();

    let client = GenomeClient::new(&server.url());
    let err = client.analyze_text("ATGCGTAAGGCT").await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::Service(_))
    ));
    mock.assert();
}
