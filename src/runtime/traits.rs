//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use super::ChatEvent;
use crate::db::{SessionUpdate, VisitorSession};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    NotFound(String),
    #[error("Session already exists: {0}")]
    Duplicate(String),
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Persistent record of visitor sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(&self, session: &VisitorSession) -> Result<(), StoreError>;

    async fn update_session(
        &self,
        session_id: &str,
        update: &SessionUpdate,
    ) -> Result<(), StoreError>;

    async fn list_sessions(&self) -> Result<Vec<VisitorSession>, StoreError>;
}

/// Short audible cue for incoming bot messages. Fire-and-forget.
pub trait NotificationCue: Send + Sync {
    fn play(&self);
}

/// Source of delays for the delivery loop
pub trait Timer: Send + Sync {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn create_session(&self, session: &VisitorSession) -> Result<(), StoreError> {
        (**self).create_session(session).await
    }

    async fn update_session(
        &self,
        session_id: &str,
        update: &SessionUpdate,
    ) -> Result<(), StoreError> {
        (**self).update_session(session_id, update).await
    }

    async fn list_sessions(&self) -> Result<Vec<VisitorSession>, StoreError> {
        (**self).list_sessions().await
    }
}

impl<T: NotificationCue + ?Sized> NotificationCue for Arc<T> {
    fn play(&self) {
        (**self).play();
    }
}

impl<T: Timer + ?Sized> Timer for Arc<T> {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        (**self).sleep(duration)
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

use crate::db::{Database, DbError};

/// Adapter to use Database as a `SessionStore`
#[derive(Clone)]
pub struct DatabaseStorage {
    db: Database,
}

impl DatabaseStorage {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl From<DbError> for StoreError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::SessionNotFound(id) => StoreError::NotFound(id),
            DbError::SessionExists(id) => StoreError::Duplicate(id),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

#[async_trait]
impl SessionStore for DatabaseStorage {
    async fn create_session(&self, session: &VisitorSession) -> Result<(), StoreError> {
        Ok(self.db.create_session(session)?)
    }

    async fn update_session(
        &self,
        session_id: &str,
        update: &SessionUpdate,
    ) -> Result<(), StoreError> {
        Ok(self.db.update_session(session_id, update)?)
    }

    async fn list_sessions(&self) -> Result<Vec<VisitorSession>, StoreError> {
        Ok(self.db.list_sessions()?)
    }
}

/// Cue that asks connected browsers to play the notification sound
pub struct SseCue {
    broadcast_tx: broadcast::Sender<ChatEvent>,
}

impl SseCue {
    pub fn new(broadcast_tx: broadcast::Sender<ChatEvent>) -> Self {
        Self { broadcast_tx }
    }
}

impl NotificationCue for SseCue {
    fn play(&self) {
        // No subscribers just means nobody is listening
        let _ = self.broadcast_tx.send(ChatEvent::Notify);
    }
}

/// Wall-clock timer backed by the tokio runtime
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}
