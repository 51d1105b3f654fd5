#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;

use std::path;
#[cfg(test)]
use std::sync::Arc;
#[cfg(test)]
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::DateTime;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::domain::models::Message;
use crate::domain::models::PipelineError;
use crate::domain::models::Session;
use crate::domain::models::DEFAULT_ML_OUTPUT;
use crate::domain::models::DEFAULT_RESEARCH_NOTES;
use crate::domain::models::DEFAULT_SESSION_TITLE;

/// Where the serialized session list lives. The whole list is read and
/// written as one document so every persist is a full read-modify-write.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn read(&self) -> Result<Option<String>>;
    async fn write(&self, payload: &str) -> Result<()>;
}

pub struct FileStorage {
    pub path: path::PathBuf,
}

impl Default for FileStorage {
    fn default() -> FileStorage {
        let path = dirs::cache_dir().unwrap().join("phazegen/sessions.yaml");

        return FileStorage { path };
    }
}

#[async_trait]
impl SessionStorage for FileStorage {
    async fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let payload = fs::read_to_string(&self.path).await?;
        return Ok(Some(payload));
    }

    async fn write(&self, payload: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut file = fs::File::create(&self.path).await?;
        file.write_all(payload.as_bytes()).await?;

        return Ok(());
    }
}

/// In-memory storage for tests. Cloning shares the underlying payload so a
/// test can inspect what the service persisted.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemoryStorage {
    payload: Arc<Mutex<Option<String>>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> MemoryStorage {
        return MemoryStorage::default();
    }

    pub fn payload(&self) -> Option<String> {
        return self.payload.lock().unwrap().clone();
    }
}

#[cfg(test)]
#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn read(&self) -> Result<Option<String>> {
        return Ok(self.payload.lock().unwrap().clone());
    }

    async fn write(&self, payload: &str) -> Result<()> {
        *self.payload.lock().unwrap() = Some(payload.to_string());
        return Ok(());
    }
}

pub struct Sessions {
    storage: Box<dyn SessionStorage>,
    active_id: String,
}

impl Default for Sessions {
    fn default() -> Sessions {
        return Sessions::new(Box::<FileStorage>::default());
    }
}

impl Sessions {
    pub fn new(storage: Box<dyn SessionStorage>) -> Sessions {
        return Sessions {
            storage,
            active_id: "".to_string(),
        };
    }

    pub fn create_id() -> String {
        return Uuid::new_v4()
            .to_string()
            .split('-')
            .enumerate()
            .filter_map(|(idx, str)| {
                if idx > 1 {
                    return None;
                }
                return Some(str);
            })
            .collect::<Vec<&str>>()
            .join("-");
    }

    pub fn active_id(&self) -> &str {
        return &self.active_id;
    }

    /// Starts a fresh working session and marks it active. Not persisted
    /// until the first upsert.
    pub fn create(&mut self) -> Session {
        let mut session = Session {
            id: Sessions::create_id(),
            title: DEFAULT_SESSION_TITLE.to_string(),
            ml_input: DEFAULT_ML_OUTPUT.to_string(),
            notes: DEFAULT_RESEARCH_NOTES.to_string(),
            summary: "".to_string(),
            updated_at: "".to_string(),
            messages: vec![Message::welcome()],
        };
        session.touch();

        self.active_id = session.id.to_string();

        return session;
    }

    async fn read_all(&self) -> Result<Vec<Session>> {
        let payload = match self.storage.read().await? {
            Some(payload) => payload,
            None => return Ok(vec![]),
        };

        let sessions: Vec<Session> = serde_yaml::from_str(&payload)?;
        return Ok(sessions);
    }

    async fn write_all(&self, sessions: &[Session]) -> Result<()> {
        let payload = serde_yaml::to_string(sessions)?;
        self.storage.write(&payload).await?;

        return Ok(());
    }

    /// Persisted sessions, most recently updated first.
    pub async fn list(&self) -> Result<Vec<Session>> {
        let mut sessions = self.read_all().await?;

        sessions.sort_by_cached_key(|session| {
            return std::cmp::Reverse(DateTime::parse_from_rfc3339(&session.updated_at).unwrap());
        });

        return Ok(sessions);
    }

    /// Loads a stored session and marks it active.
    pub async fn load(&mut self, id: &str) -> Result<Session> {
        let sessions = self.read_all().await?;
        let session = sessions.into_iter().find(|session| return session.id == id);

        match session {
            Some(session) => {
                self.active_id = session.id.to_string();
                return Ok(session);
            }
            None => {
                return Err(
                    PipelineError::NotFound(format!("No session found for id {id}")).into(),
                );
            }
        }
    }

    /// Replaces the stored session with the same id in place, or prepends it
    /// as new, then persists the full list. Idempotent for identical content.
    pub async fn upsert(&self, session: &Session) -> Result<()> {
        let mut session = session.clone();
        session.touch();

        let mut sessions = self.read_all().await?;
        match sessions.iter_mut().find(|stored| return stored.id == session.id) {
            Some(stored) => *stored = session,
            None => sessions.insert(0, session),
        }

        return self.write_all(&sessions).await;
    }

    /// Removes a session by id. Deleting the active session immediately
    /// creates a replacement so an active session always exists.
    pub async fn delete(&mut self, id: &str) -> Result<Option<Session>> {
        let mut sessions = self.read_all().await?;
        sessions.retain(|session| return session.id != id);
        self.write_all(&sessions).await?;

        if self.active_id == id {
            return Ok(Some(self.create()));
        }

        return Ok(None);
    }

    pub async fn delete_all(&mut self) -> Result<Option<Session>> {
        self.write_all(&[]).await?;

        return Ok(Some(self.create()));
    }
}
