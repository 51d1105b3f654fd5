use anyhow::Result;

use super::summarize_key_findings;
use super::SUMMARIZE_FALLBACK;
use crate::domain::models::PipelineError;
use crate::domain::models::OVERLOADED_HINT;
use crate::domain::services::flows::testing;

#[tokio::test(start_paused = true)]
async fn it_summarizes_ml_outputs_and_notes() -> Result<()> {
    let (backend, prompts) = testing::replies_ok(vec![
        r#"{"summary":"The 0.85 pathogenic risk score and beta-lactam resistance genes are the dominant signals."}"#,
    ]);

    let summary = summarize_key_findings(
        &backend,
        r#"{"pathogenicRisk":{"score":0.85}}"#,
        "sample X",
        None,
    )
    .await?;

    assert!(!summary.is_empty());
    assert!(summary.contains("0.85"));

    let recorded = prompts.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].text.contains(r#"{"pathogenicRisk":{"score":0.85}}"#));
    assert!(recorded[0].text.contains("sample X"));

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_fails_validation_without_any_call_when_inputs_are_empty() {
    let (backend, prompts) = testing::replies_ok(vec![r#"{"summary":"unused"}"#]);

    let err = summarize_key_findings(&backend, "", "sample X", None)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::Validation(_))
    ));
    assert!(prompts.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn it_retries_transient_failures_before_succeeding() -> Result<()> {
    let (backend, prompts) = testing::scripted(vec![
        Err("rate limited".to_string()),
        Err("rate limited".to_string()),
        Ok(r#"{"summary":"Recovered summary."}"#.to_string()),
    ]);

    let summary = summarize_key_findings(&backend, "ml data", "notes", None).await?;

    assert_eq!(summary, "Recovered summary.");
    assert_eq!(prompts.lock().unwrap().len(), 3);

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_surfaces_exhaustion_with_the_overloaded_hint() {
    let (backend, prompts) = testing::scripted(vec![
        Err("boom".to_string()),
        Err("boom".to_string()),
        Err("boom".to_string()),
        Err("boom".to_string()),
    ]);

    let err = summarize_key_findings(&backend, "ml data", "notes", None)
        .await
        .unwrap_err();

    assert_eq!(prompts.lock().unwrap().len(), 4);
    assert!(format!("{err}").contains(OVERLOADED_HINT));
}

#[tokio::test(start_paused = true)]
async fn it_substitutes_the_fallback_for_an_empty_summary() -> Result<()> {
    let (backend, _prompts) = testing::replies_ok(vec![r#"{"summary":""}"#]);

    let summary = summarize_key_findings(&backend, "ml data", "notes", Some("context")).await?;

    assert_eq!(summary, SUMMARIZE_FALLBACK);

    return Ok(());
}
