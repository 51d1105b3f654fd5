#[cfg(test)]
#[path = "ui_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use tokio::fs;
use tokio::io;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::FilePayload;
use crate::domain::models::MessageType;
use crate::domain::models::Session;

pub fn help_text() -> String {
    return r#"COMMANDS:
/summarize - Summarize the structured ML outputs and research notes.
/extend <question> - Extend the current summary with deeper insights.
/analyze <sequence> - Send a raw sequence to the genome-analysis service.
/analyze-file <path> - Upload a genome file to the analysis service.
/attach <path> - Extract text from a file into the research notes.
/ml <json> - Replace the structured ML outputs.
/notes <text> - Replace the research notes.
/report - Render the current session as a Markdown report.
/sessions - List stored sessions.
/open <id> - Open a stored session.
/delete <id> - Delete a stored session.
/new - Start a fresh session.
/help - Show this help.
/quit - Exit."#
        .to_string();
}

/// MIME type from a file extension. Sequence formats are plain text as far as
/// the extraction stage is concerned.
fn guess_mime_type(file_path: &path::Path) -> String {
    let extension = file_path
        .extension()
        .and_then(|ext| return ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mime = match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "json" => "application/json",
        "csv" => "text/csv",
        "txt" | "md" | "fasta" | "fa" | "fastq" | "gb" | "gbk" => "text/plain",
        _ => "application/octet-stream",
    };

    return mime.to_string();
}

async fn read_file_payload(raw_path: &str) -> Result<FilePayload> {
    let file_path = path::PathBuf::from(raw_path);
    let data = fs::read(&file_path).await?;
    let filename = file_path
        .file_name()
        .and_then(|name| return name.to_str())
        .unwrap_or(raw_path)
        .to_string();

    return Ok(FilePayload::new(
        &filename,
        &guess_mime_type(&file_path),
        data,
    ));
}

fn print_session(session: &Session) {
    println!("Session: {} (ID: {})", session.title, session.id);
    for message in &session.messages {
        if message.is_welcome() {
            println!("PhazeGEN: {}", message.content);
        } else {
            println!("{}: {}", message.role.to_string(), message.content);
        }
    }
}

fn render_event(event: Event) {
    match event {
        Event::ActiveSession(session) => print_session(&session),
        Event::AssistantMessage(message) => {
            if message.message_type() == MessageType::Error {
                eprintln!("PhazeGEN: {}", message.content);
            } else {
                println!("PhazeGEN: {}", message.content);
            }
        }
        Event::MlInputUpdated(_) => println!("Structured ML outputs updated."),
        Event::Notice(notice) => println!("{notice}"),
        Event::NotesUpdated(_) => println!("Research notes updated."),
        Event::ReportReady(report) => println!("{report}"),
        Event::SessionList(sessions) => {
            if sessions.is_empty() {
                println!("There are no sessions available. You should start your first one!");
            } else {
                for session in sessions {
                    println!(
                        "- (ID: {}) {}, {}",
                        session.id, session.updated_at, session.title
                    );
                }
            }
        }
        Event::SummaryReady(summary) => println!("Key findings:\n{summary}"),
        Event::UserMessage(_) => {}
    }
}

/// Turns one input line into an action. Returns None for lines handled
/// locally, like /help and blank input.
async fn parse_line(line: &str) -> Result<Option<Action>> {
    if line.is_empty() {
        return Ok(None);
    }

    if !line.starts_with('/') {
        return Ok(Some(Action::SendMessage(line.to_string())));
    }

    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "/summarize" => return Ok(Some(Action::Summarize())),
        "/extend" => {
            if rest.is_empty() {
                println!("Usage: /extend <question>");
                return Ok(None);
            }
            return Ok(Some(Action::ExtendInsights(rest.to_string())));
        }
        "/analyze" => {
            if rest.is_empty() {
                println!("Usage: /analyze <sequence>");
                return Ok(None);
            }
            return Ok(Some(Action::AnalyzeText(rest.to_string())));
        }
        "/analyze-file" => {
            if rest.is_empty() {
                println!("Usage: /analyze-file <path>");
                return Ok(None);
            }
            return Ok(Some(Action::AnalyzeFile(read_file_payload(rest).await?)));
        }
        "/attach" => {
            if rest.is_empty() {
                println!("Usage: /attach <path>");
                return Ok(None);
            }
            return Ok(Some(Action::AttachFile(read_file_payload(rest).await?)));
        }
        "/ml" => return Ok(Some(Action::SetMlInput(rest.to_string()))),
        "/notes" => return Ok(Some(Action::SetNotes(rest.to_string()))),
        "/report" => return Ok(Some(Action::GenerateReport())),
        "/sessions" => return Ok(Some(Action::ListSessions())),
        "/open" => {
            if rest.is_empty() {
                println!("Usage: /open <id>");
                return Ok(None);
            }
            return Ok(Some(Action::OpenSession(rest.to_string())));
        }
        "/delete" => {
            if rest.is_empty() {
                println!("Usage: /delete <id>");
                return Ok(None);
            }
            return Ok(Some(Action::DeleteSession(rest.to_string())));
        }
        "/new" => return Ok(Some(Action::NewSession())),
        "/help" => {
            println!("{}", help_text());
            return Ok(None);
        }
        _ => {
            println!("Unknown command {command}. Try /help.");
            return Ok(None);
        }
    }
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    mut rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();

    let session_id = Config::get(ConfigKey::SessionID);
    if !session_id.is_empty() {
        tx.send(Action::OpenSession(session_id))?;
    }

    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Some(event) => render_event(event),
                    None => return Ok(()),
                }
            }
            line = lines.next_line() => {
                let line = match line? {
                    Some(line) => line,
                    None => return Ok(()),
                };

                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    return Ok(());
                }

                if let Some(action) = parse_line(trimmed).await? {
                    tx.send(action)?;
                }
            }
        }
    }
}
