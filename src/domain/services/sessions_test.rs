use anyhow::Result;

use super::MemoryStorage;
use super::Sessions;
use crate::domain::models::Message;
use crate::domain::models::PipelineError;
use crate::domain::models::Role;
use crate::domain::models::DEFAULT_ML_OUTPUT;

fn service() -> (Sessions, MemoryStorage) {
    let storage = MemoryStorage::new();
    let sessions = Sessions::new(Box::new(storage.clone()));

    return (sessions, storage);
}

#[test]
fn it_creates_collision_resistant_ids() {
    let first = Sessions::create_id();
    let second = Sessions::create_id();

    assert_ne!(first, second);
    assert_eq!(first.split('-').count(), 2);
}

#[test]
fn it_creates_an_active_session_with_defaults() {
    let (mut sessions, storage) = service();

    let session = sessions.create();

    assert_eq!(sessions.active_id(), session.id);
    assert_eq!(session.ml_input, DEFAULT_ML_OUTPUT);
    assert_eq!(session.messages.len(), 1);
    assert!(session.messages[0].is_welcome());
    // Fresh sessions are working state only until the first upsert.
    assert!(storage.payload().is_none());
}

#[tokio::test]
async fn it_round_trips_a_session_through_upsert_and_load() -> Result<()> {
    let (mut sessions, _storage) = service();

    let mut session = sessions.create();
    session.ml_input = r#"{"pathogenicRisk":{"score":0.85}}"#.to_string();
    session.notes = "sample X".to_string();
    session.summary = "High risk sample.".to_string();
    session.messages.push(Message::new(Role::User, "What is the risk?"));
    sessions.upsert(&session).await?;

    let loaded = sessions.load(&session.id).await?;

    assert_eq!(loaded.ml_input, session.ml_input);
    assert_eq!(loaded.notes, session.notes);
    assert_eq!(loaded.summary, session.summary);
    assert_eq!(loaded.messages, session.messages);
    assert_eq!(sessions.active_id(), session.id);

    return Ok(());
}

#[tokio::test]
async fn it_upserts_idempotently() -> Result<()> {
    let (mut sessions, _storage) = service();

    let session = sessions.create();
    sessions.upsert(&session).await?;
    sessions.upsert(&session).await?;

    let stored = sessions.list().await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, session.id);

    return Ok(());
}

#[tokio::test]
async fn it_lists_most_recently_updated_first() -> Result<()> {
    let (mut sessions, _storage) = service();

    let older = sessions.create();
    sessions.upsert(&older).await?;
    let newer = sessions.create();
    sessions.upsert(&newer).await?;

    let stored = sessions.list().await?;
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].id, newer.id);
    assert_eq!(stored[1].id, older.id);

    // Touching the older session moves it back to the front.
    sessions.upsert(&older).await?;
    let stored = sessions.list().await?;
    assert_eq!(stored[0].id, older.id);

    return Ok(());
}

#[tokio::test]
async fn it_fails_to_load_a_missing_session() {
    let (mut sessions, _storage) = service();

    let err = sessions.load("does-not-exist").await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::NotFound(_))
    ));
}

#[tokio::test]
async fn it_replaces_the_active_session_on_delete() -> Result<()> {
    let (mut sessions, _storage) = service();

    let session = sessions.create();
    sessions.upsert(&session).await?;

    let replacement = sessions.delete(&session.id).await?.unwrap();

    let stored = sessions.list().await?;
    assert!(stored.iter().all(|stored| return stored.id != session.id));
    assert_ne!(replacement.id, session.id);
    assert_eq!(sessions.active_id(), replacement.id);
    assert!(replacement.summary.is_empty());
    assert!(stored.iter().all(|stored| return stored.id != replacement.id));

    return Ok(());
}

#[tokio::test]
async fn it_keeps_the_active_session_when_deleting_another() -> Result<()> {
    let (mut sessions, _storage) = service();

    let other = sessions.create();
    sessions.upsert(&other).await?;
    let active = sessions.create();
    sessions.upsert(&active).await?;

    let replacement = sessions.delete(&other.id).await?;

    assert!(replacement.is_none());
    assert_eq!(sessions.active_id(), active.id);

    return Ok(());
}
