use super::Message;
use super::Session;

#[derive(Debug)]
pub enum Event {
    ActiveSession(Session),
    AssistantMessage(Message),
    MlInputUpdated(String),
    Notice(String),
    NotesUpdated(String),
    ReportReady(String),
    SessionList(Vec<Session>),
    SummaryReady(String),
    UserMessage(Message),
}
