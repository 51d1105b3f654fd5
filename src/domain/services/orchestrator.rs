#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::flows;
use super::report;
use super::Sessions;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::ReasoningBox;
use crate::domain::models::Role;
use crate::infrastructure::genome::GenomeClient;

const HISTORY_TURNS: usize = 5;

/// Result of one spawned stage call, tagged with the session it belongs to so
/// a reply can never land in a session opened while the call was in flight.
enum StageOutcome {
    Answered(String, Result<String>),
    Extended(String, Result<String>),
    Extracted(String, Result<String>),
    MlAnalysis(String, Result<String>),
    Summarized(String, Result<String>),
}

fn busy(worker: &Option<JoinHandle<()>>) -> bool {
    return worker
        .as_ref()
        .map(|handle| return !handle.is_finished())
        .unwrap_or(false);
}

pub struct OrchestratorService {}

impl OrchestratorService {
    /// Sequences pipeline stages over the active session. One worker per
    /// action kind may be in flight; duplicate actions while one is pending
    /// are no-ops with a notice. Session state is only mutated and persisted
    /// after a stage call settles.
    pub async fn start(
        backend: ReasoningBox,
        genome: GenomeClient,
        mut sessions: Sessions,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let backend = Arc::new(backend);
        let genome = Arc::new(genome);
        let (stage_tx, mut stage_rx) = mpsc::unbounded_channel::<StageOutcome>();

        let mut working = sessions.create();
        tx.send(Event::ActiveSession(working.clone()))?;

        let mut summarize_worker: Option<JoinHandle<()>> = None;
        let mut chat_worker: Option<JoinHandle<()>> = None;
        let mut extend_worker: Option<JoinHandle<()>> = None;
        let mut attach_worker: Option<JoinHandle<()>> = None;
        let mut analyze_worker: Option<JoinHandle<()>> = None;

        loop {
            tokio::select! {
                action = rx.recv() => {
                    let action = match action {
                        Some(action) => action,
                        None => return Ok(()),
                    };

                    match action {
                        Action::SetMlInput(text) => {
                            working.ml_input = text;
                            tx.send(Event::MlInputUpdated(working.ml_input.to_string()))?;
                        }
                        Action::SetNotes(text) => {
                            working.notes = text;
                            tx.send(Event::NotesUpdated(working.notes.to_string()))?;
                        }
                        Action::Summarize() => {
                            if busy(&summarize_worker) {
                                tx.send(Event::Notice(
                                    "A summarization is already in progress.".to_string(),
                                ))?;
                                continue;
                            }

                            let backend = backend.clone();
                            let stage_tx = stage_tx.clone();
                            let session_id = working.id.to_string();
                            let ml_input = working.ml_input.to_string();
                            let notes = working.notes.to_string();

                            summarize_worker = Some(tokio::spawn(async move {
                                let res = flows::summarize_key_findings(
                                    &backend, &ml_input, &notes, None,
                                )
                                .await;
                                let _ = stage_tx.send(StageOutcome::Summarized(session_id, res));
                            }));
                        }
                        Action::SendMessage(text) => {
                            if busy(&chat_worker) {
                                tx.send(Event::Notice(
                                    "Still waiting on the previous reply.".to_string(),
                                ))?;
                                continue;
                            }

                            // History is trimmed before the new message so the
                            // question is not duplicated into its own context.
                            let history = working.recent_history(HISTORY_TURNS)?;
                            let message = Message::new(Role::User, &text);
                            working.messages.push(message.clone());
                            tx.send(Event::UserMessage(message))?;

                            let backend = backend.clone();
                            let stage_tx = stage_tx.clone();
                            let session_id = working.id.to_string();
                            let notes = working.notes.to_string();
                            let summary = working.summary.to_string();

                            chat_worker = Some(tokio::spawn(async move {
                                let res = flows::answer_domain_question(
                                    &backend, &text, &notes, &summary, &history,
                                )
                                .await;
                                let _ = stage_tx.send(StageOutcome::Answered(session_id, res));
                            }));
                        }
                        Action::ExtendInsights(question) => {
                            if busy(&extend_worker) {
                                tx.send(Event::Notice(
                                    "An insight extension is already in progress.".to_string(),
                                ))?;
                                continue;
                            }

                            let message = Message::new(Role::User, &question);
                            working.messages.push(message.clone());
                            tx.send(Event::UserMessage(message))?;

                            let backend = backend.clone();
                            let stage_tx = stage_tx.clone();
                            let session_id = working.id.to_string();
                            // Extension builds only on the produced summary,
                            // never the raw notes or ML output.
                            let summary = working.summary.to_string();

                            extend_worker = Some(tokio::spawn(async move {
                                let res =
                                    flows::extend_insights(&backend, &summary, None, &question)
                                        .await;
                                let _ = stage_tx.send(StageOutcome::Extended(session_id, res));
                            }));
                        }
                        Action::AttachFile(file) => {
                            if busy(&attach_worker) {
                                tx.send(Event::Notice(
                                    "A file extraction is already in progress.".to_string(),
                                ))?;
                                continue;
                            }

                            let backend = backend.clone();
                            let stage_tx = stage_tx.clone();
                            let session_id = working.id.to_string();

                            attach_worker = Some(tokio::spawn(async move {
                                let res = flows::extract_text(&backend, &file).await;
                                let _ = stage_tx.send(StageOutcome::Extracted(session_id, res));
                            }));
                        }
                        Action::AnalyzeText(sequence) => {
                            if busy(&analyze_worker) {
                                tx.send(Event::Notice(
                                    "A genome analysis is already in progress.".to_string(),
                                ))?;
                                continue;
                            }

                            let genome = genome.clone();
                            let stage_tx = stage_tx.clone();
                            let session_id = working.id.to_string();

                            analyze_worker = Some(tokio::spawn(async move {
                                let res = match genome.analyze_text(&sequence).await {
                                    Ok(analysis) => analysis.to_ml_output(),
                                    Err(err) => Err(err),
                                };
                                let _ = stage_tx.send(StageOutcome::MlAnalysis(session_id, res));
                            }));
                        }
                        Action::AnalyzeFile(file) => {
                            if busy(&analyze_worker) {
                                tx.send(Event::Notice(
                                    "A genome analysis is already in progress.".to_string(),
                                ))?;
                                continue;
                            }

                            let genome = genome.clone();
                            let stage_tx = stage_tx.clone();
                            let session_id = working.id.to_string();

                            analyze_worker = Some(tokio::spawn(async move {
                                let res = match genome.analyze_file(&file.filename, file.data).await
                                {
                                    Ok(analysis) => analysis.to_ml_output(),
                                    Err(err) => Err(err),
                                };
                                let _ = stage_tx.send(StageOutcome::MlAnalysis(session_id, res));
                            }));
                        }
                        Action::NewSession() => {
                            if !working.conversation().is_empty() || !working.summary.is_empty() {
                                sessions.upsert(&working).await?;
                            }

                            working = sessions.create();
                            tx.send(Event::ActiveSession(working.clone()))?;
                        }
                        Action::OpenSession(id) => match sessions.load(&id).await {
                            Ok(session) => {
                                working = session;
                                tx.send(Event::ActiveSession(working.clone()))?;
                            }
                            Err(err) => {
                                tx.send(Event::Notice(format!("Could not open session: {err:#}")))?;
                            }
                        },
                        Action::DeleteSession(id) => {
                            let replacement = sessions.delete(&id).await?;
                            tx.send(Event::Notice(format!("Deleted session {id}")))?;

                            if let Some(fresh) = replacement {
                                working = fresh;
                                tx.send(Event::ActiveSession(working.clone()))?;
                            }
                        }
                        Action::ListSessions() => {
                            tx.send(Event::SessionList(sessions.list().await?))?;
                        }
                        Action::GenerateReport() => {
                            tx.send(Event::ReportReady(report::render(&working)))?;
                        }
                    }
                }
                outcome = stage_rx.recv() => {
                    let outcome = match outcome {
                        Some(outcome) => outcome,
                        None => return Ok(()),
                    };

                    let session_id = match &outcome {
                        StageOutcome::Answered(id, _) => id,
                        StageOutcome::Extended(id, _) => id,
                        StageOutcome::Extracted(id, _) => id,
                        StageOutcome::MlAnalysis(id, _) => id,
                        StageOutcome::Summarized(id, _) => id,
                    };

                    if session_id != &working.id {
                        tracing::warn!("Discarding stage result for inactive session {session_id}");
                        continue;
                    }

                    match outcome {
                        StageOutcome::Summarized(_, Ok(summary)) => {
                            working.summary = summary.to_string();
                            working.title = working.derived_title();
                            sessions.upsert(&working).await?;
                            tx.send(Event::SummaryReady(summary))?;
                        }
                        StageOutcome::Summarized(_, Err(err)) => {
                            tx.send(Event::Notice(format!("Summarization failed: {err:#}")))?;
                        }
                        StageOutcome::Answered(_, res) | StageOutcome::Extended(_, res) => {
                            let message = match res {
                                Ok(reply) => Message::new(Role::Assistant, &reply),
                                Err(err) => Message::new_with_type(
                                    Role::Assistant,
                                    MessageType::Error,
                                    &format!("Sorry, an error occurred: {err:#}"),
                                ),
                            };

                            working.messages.push(message.clone());
                            working.title = working.derived_title();
                            sessions.upsert(&working).await?;
                            tx.send(Event::AssistantMessage(message))?;
                        }
                        StageOutcome::Extracted(_, Ok(text)) => {
                            if working.notes.trim().is_empty() {
                                working.notes = text;
                            } else {
                                working.notes = format!("{}\n\n{text}", working.notes);
                            }
                            tx.send(Event::NotesUpdated(working.notes.to_string()))?;
                            tx.send(Event::Notice(
                                "Attached file content added to research notes.".to_string(),
                            ))?;
                        }
                        StageOutcome::Extracted(_, Err(err)) => {
                            tx.send(Event::Notice(format!("File extraction failed: {err:#}")))?;
                        }
                        StageOutcome::MlAnalysis(_, Ok(text)) => {
                            working.ml_input = text;
                            tx.send(Event::MlInputUpdated(working.ml_input.to_string()))?;
                            tx.send(Event::Notice(
                                "Genome analysis complete. Structured ML outputs updated."
                                    .to_string(),
                            ))?;
                        }
                        StageOutcome::MlAnalysis(_, Err(err)) => {
                            tx.send(Event::Notice(format!("Genome analysis failed: {err:#}")))?;
                        }
                    }
                }
            }
        }
    }
}
