use anyhow::Result;

use super::extend_insights;
use crate::domain::models::PipelineError;
use crate::domain::services::flows::testing;

#[tokio::test(start_paused = true)]
async fn it_extends_insights_from_the_prior_summary_only() -> Result<()> {
    let (backend, prompts) = testing::replies_ok(vec![
        r#"{"extendedInsights":"The Type I-F CRISPR system suggests prior phage exposure."}"#,
    ]);

    let insights = extend_insights(
        &backend,
        "High risk sample with a Type I-F CRISPR system.",
        None,
        "What does the CRISPR system imply?",
    )
    .await?;

    assert!(insights.contains("phage exposure"));

    let recorded = prompts.lock().unwrap();
    assert!(recorded[0].text.contains("Prior Summary: High risk sample"));
    assert!(!recorded[0].text.contains("Additional Notes:"));

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_includes_additional_notes_when_present() -> Result<()> {
    let (backend, prompts) =
        testing::replies_ok(vec![r#"{"extendedInsights":"Extended."}"#]);

    extend_insights(
        &backend,
        "Prior summary.",
        Some("Fresh observations from run #A43."),
        "Anything new?",
    )
    .await?;

    let recorded = prompts.lock().unwrap();
    assert!(recorded[0]
        .text
        .contains("Additional Notes: Fresh observations from run #A43."));

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_requires_a_prior_summary() {
    let (backend, prompts) = testing::replies_ok(vec![r#"{"extendedInsights":"unused"}"#]);

    let err = extend_insights(&backend, "", None, "What next?")
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::Validation(_))
    ));
    assert!(prompts.lock().unwrap().is_empty());
}
