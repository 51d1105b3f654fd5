use super::render;
use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::models::Session;

fn session() -> Session {
    return Session {
        id: "abc-123".to_string(),
        title: "What is the risk?".to_string(),
        ml_input: r#"{"pathogenicRisk":{"score":0.85}}"#.to_string(),
        notes: "sample X".to_string(),
        summary: "High risk sample with beta-lactam resistance.".to_string(),
        updated_at: "2024-01-01T00:00:00+00:00".to_string(),
        messages: vec![
            Message::welcome(),
            Message::new(Role::User, "What is the risk?"),
            Message::new(Role::Assistant, "The risk score of 0.85 is high."),
        ],
    };
}

#[test]
fn it_renders_the_full_report() {
    let report = render(&session());

    assert!(report.starts_with("# PhazeGEN Research Report"));
    assert!(report.contains("High risk sample with beta-lactam resistance."));
    assert!(report.contains("```json\n{\"pathogenicRisk\":{\"score\":0.85}}\n```"));
    assert!(report.contains("### User\n\n> What is the risk?"));
    assert!(report.contains("### Assistant\n\n> The risk score of 0.85 is high."));
}

#[test]
fn it_excludes_the_welcome_message() {
    let report = render(&session());

    assert!(!report.contains("Hello! I am PhazeGEN"));
}

#[test]
fn it_notes_missing_findings() {
    let mut session = session();
    session.summary = "".to_string();

    let report = render(&session);

    assert!(report.contains("No key findings were generated in this session."));
}

#[test]
fn it_quotes_multiline_messages() {
    let mut session = session();
    session.messages.push(Message::new(
        Role::Assistant,
        "First insight.\nSecond insight.",
    ));

    let report = render(&session);

    assert!(report.contains("> First insight.\n> Second insight."));
}
