use super::FilePayload;

#[derive(Debug)]
pub enum Action {
    AnalyzeFile(FilePayload),
    AnalyzeText(String),
    AttachFile(FilePayload),
    DeleteSession(String),
    ExtendInsights(String),
    GenerateReport(),
    ListSessions(),
    NewSession(),
    OpenSession(String),
    SendMessage(String),
    SetMlInput(String),
    SetNotes(String),
    Summarize(),
}
