//! Runtime for delivering conversations
//!
//! One task per visitor session owns the conversation state and paces the
//! scripted messages. `RuntimeManager` creates, addresses and tears down
//! those tasks.

mod executor;
mod tracker;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ChatRuntime;
pub use tracker::{new_session_id, plan_click_label, InteractionTracker, PAYMENT_CLICK_LABEL};
pub use traits::*;

use crate::db::Database;
use crate::sniff::{detect_browser, DeviceClass};
use crate::state_machine::{ConvContext, ConvState, Event, Message};
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch, RwLock};
use tokio_util::sync::CancellationToken;

/// Type alias for production runtime with concrete implementations
pub type ProductionRuntime = ChatRuntime<SseCue, TokioTimer>;

/// Window the per-message reveal delay is sampled from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealDelay {
    pub min: Duration,
    pub max: Duration,
}

impl RevealDelay {
    #[cfg(test)]
    pub fn fixed(delay: Duration) -> Self {
        Self {
            min: delay,
            max: delay,
        }
    }

    /// Uniform sample from the window; a collapsed or inverted window yields `min`
    pub fn sample(&self) -> Duration {
        if self.min >= self.max {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

impl Default for RevealDelay {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(800),
            max: Duration::from_millis(1200),
        }
    }
}

/// Pacing of one chat session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub reveal: RevealDelay,
    /// Idle time on a checkout before the followup nudge
    pub followup_after: Duration,
    /// Interval of elapsed-time pushes once the session record exists
    pub refresh_every: Duration,
    /// A chat with no visitor action and no subscriber for this long is stopped
    pub idle_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            reveal: RevealDelay::default(),
            followup_after: Duration::from_secs(10),
            refresh_every: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

/// Everything a late subscriber needs to render the chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatSnapshot {
    pub session_id: String,
    pub state: ConvState,
    pub visitor_name: Option<String>,
    pub transcript: Vec<Message>,
    pub typing: bool,
    pub input_enabled: bool,
}

impl ChatSnapshot {
    pub fn initial(context: &ConvContext) -> Self {
        Self {
            session_id: context.session_id.clone(),
            state: ConvState::default(),
            visitor_name: context.visitor_name.clone(),
            transcript: vec![],
            typing: false,
            input_enabled: false,
        }
    }
}

/// Events sent to SSE clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Init { snapshot: ChatSnapshot },
    StateChange { state: ConvState },
    Message { message: Message },
    Typing { active: bool },
    Input { enabled: bool },
    /// Name submission refused; the prompt is shown inline
    InputRejected { prompt: String },
    /// Play the incoming-message sound
    Notify,
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Chat session not found: {0}")]
    NotFound(String),
    #[error("Chat session {0} has stopped")]
    Stopped(String),
}

/// Handle to interact with a running chat
#[derive(Clone)]
pub struct ChatHandle {
    pub event_tx: mpsc::Sender<Event>,
    pub broadcast_tx: broadcast::Sender<ChatEvent>,
    pub snapshot_rx: watch::Receiver<ChatSnapshot>,
    pub shutdown: CancellationToken,
}

/// Manager for all chat runtimes
pub struct RuntimeManager {
    db: Database,
    config: RuntimeConfig,
    runtimes: Arc<RwLock<HashMap<String, ChatHandle>>>,
}

impl RuntimeManager {
    pub fn new(db: Database, config: RuntimeConfig) -> Self {
        Self {
            db,
            config,
            runtimes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Start a new chat for a visitor and return its session id
    pub async fn create_session(&self, user_agent: Option<&str>) -> String {
        let user_agent = user_agent.unwrap_or_default();
        let session_id = new_session_id();
        let device_type = DeviceClass::from_user_agent(user_agent);
        let browser = detect_browser(user_agent);

        let context = ConvContext::new(&session_id);
        let (event_tx, event_rx) = mpsc::channel(32);
        let (broadcast_tx, _) = broadcast::channel(128);
        let (snapshot_tx, snapshot_rx) = watch::channel(ChatSnapshot::initial(&context));
        let shutdown = CancellationToken::new();

        let tracker = InteractionTracker::spawn(
            DatabaseStorage::new(self.db.clone()),
            &session_id,
            device_type,
            browser,
        );

        let runtime: ProductionRuntime = ChatRuntime::new(
            context,
            self.config,
            tracker,
            SseCue::new(broadcast_tx.clone()),
            TokioTimer,
            event_rx,
            broadcast_tx.clone(),
            snapshot_tx,
            shutdown.clone(),
        );

        self.runtimes.write().await.insert(
            session_id.clone(),
            ChatHandle {
                event_tx,
                broadcast_tx,
                snapshot_rx,
                shutdown,
            },
        );

        let id = session_id.clone();
        let runtimes = Arc::clone(&self.runtimes);
        tokio::spawn(async move {
            runtime.run().await;
            // Already gone after an explicit teardown
            runtimes.write().await.remove(&id);
            tracing::info!(session_id = %id, "Chat runtime finished");
        });

        tracing::info!(session_id = %session_id, device = %device_type, browser, "Chat session created");
        session_id
    }

    async fn handle(&self, session_id: &str) -> Result<ChatHandle, SessionError> {
        self.runtimes
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    /// Send an event to a chat
    pub async fn send_event(&self, session_id: &str, event: Event) -> Result<(), SessionError> {
        let handle = self.handle(session_id).await?;
        handle
            .event_tx
            .send(event)
            .await
            .map_err(|_| SessionError::Stopped(session_id.to_string()))
    }

    pub async fn snapshot(&self, session_id: &str) -> Result<ChatSnapshot, SessionError> {
        let handle = self.handle(session_id).await?;
        let snapshot = handle.snapshot_rx.borrow().clone();
        Ok(snapshot)
    }

    /// Subscribe to chat updates, starting from the current snapshot
    pub async fn subscribe(
        &self,
        session_id: &str,
    ) -> Result<(ChatSnapshot, broadcast::Receiver<ChatEvent>), SessionError> {
        let handle = self.handle(session_id).await?;
        // Subscribe before reading the snapshot so nothing falls in between
        let rx = handle.broadcast_tx.subscribe();
        let snapshot = handle.snapshot_rx.borrow().clone();
        Ok((snapshot, rx))
    }

    /// Stop a chat. Pending reveals and timers are dropped with its task.
    pub async fn teardown(&self, session_id: &str) -> Result<(), SessionError> {
        let handle = self
            .runtimes
            .write()
            .await
            .remove(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
        handle.shutdown.cancel();
        tracing::info!(session_id = %session_id, "Chat session torn down");
        Ok(())
    }

    /// Stop every chat (server shutdown)
    pub async fn shutdown_all(&self) {
        let mut runtimes = self.runtimes.write().await;
        for handle in runtimes.values() {
            handle.shutdown.cancel();
        }
        tracing::info!(count = runtimes.len(), "Stopped all chat runtimes");
        runtimes.clear();
    }

    /// Get the database handle
    pub fn db(&self) -> &Database {
        &self.db
    }
}
