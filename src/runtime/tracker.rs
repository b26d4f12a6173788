//! Engine-side view of the visitor session record
//!
//! Store writes are queued to a background writer task and applied in the
//! order they were issued. The chat never waits on the store and never fails
//! because of it.

use super::traits::SessionStore;
use crate::db::{SessionUpdate, VisitorSession};
use crate::sniff::DeviceClass;
use crate::state_machine::Plan;
use chrono::{DateTime, Utc};
use rand::Rng;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

pub const PAYMENT_CLICK_LABEL: &str = "Clicou no pagamento";

/// Click entry recorded alongside a plan selection
pub fn plan_click_label(plan: Plan) -> String {
    format!("Plano: {plan}")
}

/// Generate a session id of the form `session_<millis>_<9 base36 chars>`
pub fn new_session_id() -> String {
    const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect();
    format!("session_{}_{suffix}", Utc::now().timestamp_millis())
}

/// Where the session record stands in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordStatus {
    Absent,
    /// Create queued, outcome not known yet
    Pending,
    Created,
    /// The store refused the create; the next one retries
    Failed,
}

#[derive(Debug)]
enum TrackerCommand {
    Create(VisitorSession),
    Update(SessionUpdate),
}

/// Records the visitor's journey for the session it was created for
pub struct InteractionTracker {
    session_id: String,
    device_type: DeviceClass,
    browser: String,
    started_at: DateTime<Utc>,
    started: Instant,
    /// Written by the tracker when a create is queued, by the writer once it lands
    status: Arc<watch::Sender<RecordStatus>>,
    tx: mpsc::UnboundedSender<TrackerCommand>,
}

impl InteractionTracker {
    /// Create a tracker and spawn its writer task onto the current runtime
    pub fn spawn<S: SessionStore + 'static>(
        store: S,
        session_id: impl Into<String>,
        device_type: DeviceClass,
        browser: impl Into<String>,
    ) -> Self {
        let session_id = session_id.into();
        let (tx, rx) = mpsc::unbounded_channel();
        let status = Arc::new(watch::Sender::new(RecordStatus::Absent));
        tokio::spawn(run_writer(store, session_id.clone(), Arc::clone(&status), rx));
        Self {
            session_id,
            device_type,
            browser: browser.into(),
            started_at: Utc::now(),
            started: Instant::now(),
            status,
            tx,
        }
    }

    /// Whether the store has confirmed the session record
    pub fn is_created(&self) -> bool {
        *self.status.borrow() == RecordStatus::Created
    }

    fn elapsed_seconds(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    fn send(&self, command: TrackerCommand) {
        if self.tx.send(command).is_err() {
            tracing::warn!(session_id = %self.session_id, "Session writer stopped, dropping write");
        }
    }

    /// Queue the create for this session. Returns false while an earlier
    /// create is pending or has succeeded; a failed one may be retried.
    pub fn create(&mut self, visitor_name: &str) -> bool {
        let status = *self.status.borrow();
        if matches!(status, RecordStatus::Pending | RecordStatus::Created) {
            tracing::debug!(session_id = %self.session_id, ?status, "Session record already requested");
            return false;
        }
        self.status.send_replace(RecordStatus::Pending);
        let now = Utc::now();
        self.send(TrackerCommand::Create(VisitorSession {
            session_id: self.session_id.clone(),
            visitor_name: visitor_name.to_string(),
            device_type: self.device_type,
            browser: self.browser.clone(),
            plan_selected: None,
            clicked_payment: false,
            all_clicks: vec![],
            time_in_chat_seconds: 0,
            started_at: self.started_at,
            last_activity: now,
        }));
        true
    }

    fn update(&self, update: SessionUpdate) {
        self.send(TrackerCommand::Update(SessionUpdate {
            elapsed_seconds: self.elapsed_seconds(),
            ..update
        }));
    }

    pub fn track_click(&self, label: &str) {
        self.update(SessionUpdate {
            append_click: Some(label.to_string()),
            ..SessionUpdate::default()
        });
    }

    pub fn track_plan(&self, plan: Plan) {
        self.update(SessionUpdate {
            plan_selected: Some(plan),
            append_click: Some(plan_click_label(plan)),
            ..SessionUpdate::default()
        });
    }

    pub fn track_payment_click(&self) {
        self.update(SessionUpdate {
            clicked_payment: Some(true),
            append_click: Some(PAYMENT_CLICK_LABEL.to_string()),
            ..SessionUpdate::default()
        });
    }

    /// Push the elapsed time only
    pub fn refresh(&self) {
        self.update(SessionUpdate::default());
    }
}

async fn run_writer<S: SessionStore>(
    store: S,
    session_id: String,
    status: Arc<watch::Sender<RecordStatus>>,
    mut rx: mpsc::UnboundedReceiver<TrackerCommand>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            TrackerCommand::Create(session) => match store.create_session(&session).await {
                Ok(()) => {
                    status.send_replace(RecordStatus::Created);
                    tracing::info!(
                        session_id = %session_id,
                        visitor = %session.visitor_name,
                        device = %session.device_type,
                        browser = %session.browser,
                        "Session record created"
                    );
                }
                Err(e) => {
                    status.send_replace(RecordStatus::Failed);
                    tracing::warn!(session_id = %session_id, error = %e, "Failed to create session record");
                }
            },
            TrackerCommand::Update(update) => {
                if *status.borrow() != RecordStatus::Created {
                    tracing::debug!(session_id = %session_id, ?update, "Session not created yet, skipping update");
                    continue;
                }
                if let Err(e) = store.update_session(&session_id, &update).await {
                    tracing::warn!(session_id = %session_id, error = %e, "Failed to update session record");
                }
            }
        }
    }

    tracing::debug!(session_id = %session_id, "Session writer finished");
}
