//! Mock implementations for testing
//!
//! These mocks enable integration testing of the delivery loop without real
//! I/O or wall-clock waits.

use super::traits::*;
use super::tracker::InteractionTracker;
use crate::db::{SessionUpdate, VisitorSession};
use crate::sniff::DeviceClass;
use async_trait::async_trait;
use chrono::Utc;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Mock Session Store
// ============================================================================

/// In-memory session store that records every write
#[derive(Default)]
pub struct MockSessionStore {
    sessions: Mutex<HashMap<String, VisitorSession>>,
    /// Updates in the order they arrived
    pub updates: Mutex<Vec<(String, SessionUpdate)>>,
}

impl MockSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, session_id: &str) -> Option<VisitorSession> {
        self.sessions.lock().unwrap().get(session_id).cloned()
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn create_session(&self, session: &VisitorSession) -> Result<(), StoreError> {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.contains_key(&session.session_id) {
            return Err(StoreError::Duplicate(session.session_id.clone()));
        }
        sessions.insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    async fn update_session(
        &self,
        session_id: &str,
        update: &SessionUpdate,
    ) -> Result<(), StoreError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| StoreError::NotFound(session_id.to_string()))?;
        session.apply(update, Utc::now());
        self.updates
            .lock()
            .unwrap()
            .push((session_id.to_string(), update.clone()));
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<VisitorSession>, StoreError> {
        Ok(self.sessions.lock().unwrap().values().cloned().collect())
    }
}

/// Store whose every call fails
pub struct FailingSessionStore;

#[async_trait]
impl SessionStore for FailingSessionStore {
    async fn create_session(&self, _session: &VisitorSession) -> Result<(), StoreError> {
        Err(StoreError::Backend("store unavailable".into()))
    }

    async fn update_session(
        &self,
        _session_id: &str,
        _update: &SessionUpdate,
    ) -> Result<(), StoreError> {
        Err(StoreError::Backend("store unavailable".into()))
    }

    async fn list_sessions(&self) -> Result<Vec<VisitorSession>, StoreError> {
        Err(StoreError::Backend("store unavailable".into()))
    }
}

/// Recording store whose first `n` creates fail
pub struct FlakySessionStore {
    pub inner: MockSessionStore,
    create_failures: AtomicUsize,
}

impl FlakySessionStore {
    pub fn failing_creates(n: usize) -> Self {
        Self {
            inner: MockSessionStore::new(),
            create_failures: AtomicUsize::new(n),
        }
    }
}

#[async_trait]
impl SessionStore for FlakySessionStore {
    async fn create_session(&self, session: &VisitorSession) -> Result<(), StoreError> {
        let remaining = self.create_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.create_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Backend("store unavailable".into()));
        }
        self.inner.create_session(session).await
    }

    async fn update_session(
        &self,
        session_id: &str,
        update: &SessionUpdate,
    ) -> Result<(), StoreError> {
        self.inner.update_session(session_id, update).await
    }

    async fn list_sessions(&self) -> Result<Vec<VisitorSession>, StoreError> {
        self.inner.list_sessions().await
    }
}

// ============================================================================
// Mock Cue and Timer
// ============================================================================

/// Cue that counts how often it played
#[derive(Default)]
pub struct CountingCue {
    plays: AtomicUsize,
}

impl CountingCue {
    pub fn count(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }
}

impl NotificationCue for CountingCue {
    fn play(&self) {
        self.plays.fetch_add(1, Ordering::SeqCst);
    }
}

/// Tokio-backed timer that records every requested delay and tracks how many
/// are still pending
#[derive(Default)]
pub struct RecordingTimer {
    requested: Mutex<Vec<Duration>>,
    live: Arc<AtomicUsize>,
}

struct LiveGuard(Arc<AtomicUsize>);

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl RecordingTimer {
    pub fn requested(&self) -> Vec<Duration> {
        self.requested.lock().unwrap().clone()
    }

    /// Delays neither elapsed nor dropped
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl Timer for RecordingTimer {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        self.requested.lock().unwrap().push(duration);
        self.live.fetch_add(1, Ordering::SeqCst);
        let guard = LiveGuard(self.live.clone());
        Box::pin(async move {
            tokio::time::sleep(duration).await;
            drop(guard);
        })
    }
}

// ============================================================================
// Test Runtime Builder
// ============================================================================

use crate::runtime::{ChatEvent, ChatRuntime, ChatSnapshot, RevealDelay, RuntimeConfig};
use crate::state_machine::{ChatOption, ConvContext, ConvState, Event};
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

pub const TEST_REVEAL: Duration = Duration::from_secs(1);

/// Helper for building test runtimes with minimal boilerplate
pub struct TestRuntime {
    pub store: Arc<MockSessionStore>,
    pub cue: Arc<CountingCue>,
    pub timer: Arc<RecordingTimer>,
    pub event_tx: mpsc::Sender<Event>,
    pub broadcast_rx: broadcast::Receiver<ChatEvent>,
    pub snapshot_rx: watch::Receiver<ChatSnapshot>,
    pub shutdown: CancellationToken,
    runtime_handle: tokio::task::JoinHandle<()>,
}

pub struct TestRuntimeBuilder {
    session_id: String,
    config: RuntimeConfig,
    store: Option<Arc<dyn SessionStore>>,
}

impl TestRuntime {
    pub fn builder() -> TestRuntimeBuilder {
        TestRuntimeBuilder {
            session_id: "test-session".to_string(),
            config: RuntimeConfig {
                reveal: RevealDelay::fixed(TEST_REVEAL),
                ..RuntimeConfig::default()
            },
            store: None,
        }
    }

    pub fn new() -> Self {
        Self::builder().build()
    }
}

impl TestRuntimeBuilder {
    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = id.into();
        self
    }

    /// Use a different store than the recording mock (which then stays empty)
    pub fn store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> TestRuntime {
        let store = Arc::new(MockSessionStore::new());
        let cue = Arc::new(CountingCue::default());
        let timer = Arc::new(RecordingTimer::default());

        let backing: Arc<dyn SessionStore> = match self.store {
            Some(s) => s,
            None => store.clone(),
        };
        let tracker =
            InteractionTracker::spawn(backing, &self.session_id, DeviceClass::Mobile, "Chrome");

        let context = ConvContext::new(&self.session_id);
        let (event_tx, event_rx) = mpsc::channel(32);
        let (broadcast_tx, broadcast_rx) = broadcast::channel(256);
        let (snapshot_tx, snapshot_rx) = watch::channel(ChatSnapshot::initial(&context));
        let shutdown = CancellationToken::new();

        let runtime = ChatRuntime::new(
            context,
            self.config,
            tracker,
            cue.clone(),
            timer.clone(),
            event_rx,
            broadcast_tx,
            snapshot_tx,
            shutdown.clone(),
        );

        let runtime_handle = tokio::spawn(runtime.run());

        TestRuntime {
            store,
            cue,
            timer,
            event_tx,
            broadcast_rx,
            snapshot_rx,
            shutdown,
            runtime_handle,
        }
    }
}

impl TestRuntime {
    pub async fn select(&self, option: ChatOption) {
        self.event_tx
            .send(Event::option(option))
            .await
            .expect("Failed to send option");
    }

    pub async fn submit_name(&self, text: &str) {
        self.event_tx
            .send(Event::name(text))
            .await
            .expect("Failed to send name");
    }

    pub async fn click_payment(&self) {
        self.event_tx
            .send(Event::PaymentClicked)
            .await
            .expect("Failed to send payment click");
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receive events until `done` matches one; returns everything received
    pub async fn collect_until(
        &mut self,
        timeout: Duration,
        done: impl Fn(&ChatEvent) -> bool,
    ) -> Option<Vec<ChatEvent>> {
        let mut seen = Vec::new();
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            match tokio::time::timeout_at(deadline, self.broadcast_rx.recv()).await {
                Ok(Ok(event)) => {
                    let finished = done(&event);
                    seen.push(event);
                    if finished {
                        return Some(seen);
                    }
                }
                Ok(Err(broadcast::error::RecvError::Lagged(_))) => {}
                Ok(Err(broadcast::error::RecvError::Closed)) | Err(_) => return None,
            }
        }
    }

    /// Wait until the current delivery has been fully revealed
    pub async fn wait_for_drain(&mut self) -> Vec<ChatEvent> {
        self.collect_until(Duration::from_secs(60), |e| {
            matches!(e, ChatEvent::Typing { active: false })
        })
        .await
        .expect("delivery never drained")
    }

    pub async fn wait_for_state(&mut self, expected: ConvState, timeout: Duration) -> bool {
        self.collect_until(timeout, |e| {
            matches!(e, ChatEvent::StateChange { state } if *state == expected)
        })
        .await
        .is_some()
    }

    /// Stop the runtime and wait for its task to end
    pub async fn stop(self) -> Arc<RecordingTimer> {
        self.shutdown.cancel();
        self.runtime_handle.await.expect("runtime task panicked");
        self.timer
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::{script, Message, Plan};

    fn messages(events: &[ChatEvent]) -> Vec<Message> {
        events
            .iter()
            .filter_map(|e| match e {
                ChatEvent::Message { message } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Settle the background writer
    async fn flush() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    async fn reach_checkout(rt: &mut TestRuntime) {
        rt.wait_for_drain().await;
        rt.select(ChatOption::QueroComprar).await;
        rt.wait_for_drain().await;
        rt.submit_name("Pedro").await;
        rt.wait_for_drain().await;
        rt.select(ChatOption::VerPlanos).await;
        rt.wait_for_drain().await;
        rt.select(ChatOption::Mensal).await;
        rt.wait_for_drain().await;
    }

    #[tokio::test]
    async fn test_mock_store_applies_updates() {
        let store = MockSessionStore::new();
        let err = store
            .update_session("missing", &SessionUpdate::default())
            .await;
        assert_eq!(err, Err(StoreError::NotFound("missing".into())));
        assert!(store.list_sessions().await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_welcome_reveals_fifo_then_clears_typing() {
        let mut rt = TestRuntime::new();

        let events = rt.wait_for_drain().await;

        assert_eq!(events.first(), Some(&ChatEvent::Typing { active: true }));
        assert_eq!(events.last(), Some(&ChatEvent::Typing { active: false }));
        assert_eq!(messages(&events), script::welcome());
        // Typing stays on until the very last message is out
        let typing_off = events
            .iter()
            .position(|e| matches!(e, ChatEvent::Typing { active: false }))
            .unwrap();
        assert_eq!(typing_off, events.len() - 1);

        let snapshot = rt.snapshot();
        assert_eq!(snapshot.transcript, script::welcome());
        assert!(!snapshot.typing);
        assert!(!snapshot.input_enabled);
        let reveals = rt.timer.requested().into_iter().filter(|d| *d == TEST_REVEAL).count();
        assert_eq!(reveals, 3);
        assert_eq!(rt.cue.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_name_input_opens_only_when_asking() {
        let mut rt = TestRuntime::new();
        rt.wait_for_drain().await;

        // Input is closed on the welcome screen
        rt.submit_name("Pedro").await;
        let events = rt
            .collect_until(Duration::from_secs(5), |e| matches!(e, ChatEvent::Error { .. }))
            .await
            .unwrap();
        assert!(matches!(events.last(), Some(ChatEvent::Error { .. })));
        assert_eq!(rt.snapshot().state, ConvState::Welcome);

        rt.select(ChatOption::QueroComprar).await;
        let events = rt
            .collect_until(Duration::from_secs(60), |e| {
                matches!(e, ChatEvent::Input { enabled: true })
            })
            .await
            .unwrap();
        // The prompt is fully revealed before input opens
        assert_eq!(
            messages(&events),
            [
                vec![Message::user_echo(ChatOption::QueroComprar.label())],
                script::ask_name(crate::state_machine::Intent::Buy),
            ]
            .concat()
        );
        assert!(rt.snapshot().input_enabled);
        assert_eq!(rt.snapshot().state, ConvState::AskingName);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_name_keeps_input_open() {
        let mut rt = TestRuntime::new();
        rt.wait_for_drain().await;
        rt.select(ChatOption::QueroComprar).await;
        rt.wait_for_drain().await;

        rt.submit_name("oi").await;
        let events = rt
            .collect_until(Duration::from_secs(5), |e| {
                matches!(e, ChatEvent::InputRejected { .. })
            })
            .await
            .unwrap();
        assert_eq!(
            events.last(),
            Some(&ChatEvent::InputRejected {
                prompt: "Por favor, digite seu nome 😊".to_string()
            })
        );

        let snapshot = rt.snapshot();
        assert_eq!(snapshot.state, ConvState::AskingName);
        assert!(snapshot.input_enabled);
        assert_eq!(snapshot.visitor_name, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notifications_start_after_name() {
        let mut rt = TestRuntime::new();
        rt.wait_for_drain().await;
        rt.select(ChatOption::QueroComprar).await;
        rt.wait_for_drain().await;
        assert_eq!(rt.cue.count(), 0);

        rt.submit_name("Pedro").await;
        rt.wait_for_drain().await;

        // Only bot-authored reveals play; the echo does not
        assert_eq!(rt.cue.count(), script::initial("Pedro").len());
        assert_eq!(rt.snapshot().state, ConvState::Initial);
        assert_eq!(rt.snapshot().visitor_name.as_deref(), Some("Pedro"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_renew_path_queues_renovar_then_plans() {
        let mut rt = TestRuntime::new();
        rt.wait_for_drain().await;
        rt.select(ChatOption::QueroRenovar).await;
        rt.wait_for_drain().await;

        rt.submit_name("Ana").await;
        let events = rt.wait_for_drain().await;

        let mut expected = vec![Message::user_echo("Ana")];
        expected.extend(script::renovar("Ana"));
        expected.extend(script::plans("Ana"));
        assert_eq!(messages(&events), expected);
        assert_eq!(rt.snapshot().state, ConvState::Renovar);
    }

    #[tokio::test(start_paused = true)]
    async fn test_followup_fires_once_after_idle() {
        let mut rt = TestRuntime::new();
        reach_checkout(&mut rt).await;

        assert!(rt.wait_for_state(ConvState::Followup, Duration::from_secs(15)).await);
        let events = rt.wait_for_drain().await;
        assert_eq!(messages(&events), script::followup("Pedro"));
        assert!(rt.timer.requested().contains(&Duration::from_secs(10)));

        // Back to a checkout: the nudge never comes again
        rt.select(ChatOption::VerPlanos).await;
        rt.wait_for_drain().await;
        rt.select(ChatOption::Anual).await;
        rt.wait_for_drain().await;
        assert!(!rt.wait_for_state(ConvState::Followup, Duration::from_secs(120)).await);
        assert_eq!(rt.snapshot().state, ConvState::Anual);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interaction_cancels_followup() {
        let mut rt = TestRuntime::new();
        reach_checkout(&mut rt).await;

        // Switch plans halfway through the window
        tokio::time::sleep(Duration::from_secs(5)).await;
        rt.select(ChatOption::Anual).await;
        rt.wait_for_drain().await;

        // The window opened on Mensal has passed without a nudge
        assert!(!rt.wait_for_state(ConvState::Followup, Duration::from_secs(5)).await);
        assert_eq!(rt.snapshot().state, ConvState::Anual);

        // The new checkout arms its own window
        assert!(rt.wait_for_state(ConvState::Followup, Duration::from_secs(15)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unoffered_click_cancels_followup() {
        let mut rt = TestRuntime::new();
        reach_checkout(&mut rt).await;

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(!ConvState::Mensal.offers(ChatOption::ConhecerLuna));
        rt.select(ChatOption::ConhecerLuna).await;

        assert!(!rt.wait_for_state(ConvState::Followup, Duration::from_secs(30)).await);
        assert_eq!(rt.snapshot().state, ConvState::Mensal);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_delivery_supersedes_pending_reveals() {
        let mut rt = TestRuntime::new();
        rt.wait_for_drain().await;

        let ask_name = script::ask_name(crate::state_machine::Intent::Buy);
        rt.select(ChatOption::QueroComprar).await;
        let first_prompt = ask_name[0].clone();
        rt.collect_until(Duration::from_secs(5), |e| {
            matches!(e, ChatEvent::Message { message } if *message == first_prompt)
        })
        .await
        .unwrap();

        // Change of mind while the rest of the prompt is still typing
        rt.select(ChatOption::PrecisoDeSuporte).await;
        let events = rt.wait_for_drain().await;

        let mut expected = vec![Message::user_echo(ChatOption::PrecisoDeSuporte.label())];
        expected.extend(script::suporte());
        assert_eq!(messages(&events), expected);

        let transcript = rt.snapshot().transcript;
        assert!(!transcript.contains(&ask_name[1]));
        assert_eq!(rt.snapshot().state, ConvState::Suporte);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unoffered_option_changes_nothing() {
        let mut rt = TestRuntime::new();
        rt.wait_for_drain().await;
        let before = rt.snapshot();

        rt.select(ChatOption::Vitalicio).await;
        let events = rt.collect_until(Duration::from_secs(5), |_| true).await;

        assert!(events.is_none());
        assert_eq!(rt.snapshot(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tracker_records_journey() {
        let mut rt = TestRuntime::new();
        rt.wait_for_drain().await;
        rt.select(ChatOption::QueroComprar).await;
        rt.wait_for_drain().await;
        rt.submit_name("Pedro").await;
        rt.wait_for_drain().await;
        rt.select(ChatOption::VerPlanos).await;
        rt.wait_for_drain().await;
        rt.select(ChatOption::Vitalicio).await;
        rt.wait_for_drain().await;
        rt.click_payment().await;
        flush().await;

        let session = rt.store.get("test-session").unwrap();
        assert_eq!(session.visitor_name, "Pedro");
        assert_eq!(session.plan_selected, Some(Plan::Vitalicio));
        assert!(session.clicked_payment);
        // The intent click happened before the record existed
        assert_eq!(
            session.all_clicks,
            vec![
                "📺 Ver planos",
                "Vitalício",
                "Plano: Vitalício",
                "Clicou no pagamento"
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_support_shortcut_records_placeholder() {
        let mut rt = TestRuntime::new();
        rt.wait_for_drain().await;
        rt.select(ChatOption::PrecisoDeSuporte).await;
        let events = rt.wait_for_drain().await;
        flush().await;

        assert_eq!(
            messages(&events).last(),
            Some(&Message::support(script::SUPPORT_URL))
        );
        let session = rt.store.get("test-session").unwrap();
        assert_eq!(session.visitor_name, "Suporte Direto");
        assert!(session.all_clicks.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_pushes_elapsed_time() {
        let mut rt = TestRuntime::new();
        rt.wait_for_drain().await;
        rt.select(ChatOption::QueroComprar).await;
        rt.wait_for_drain().await;
        rt.submit_name("Pedro").await;
        rt.wait_for_drain().await;
        flush().await;
        let before = rt.store.update_count();

        tokio::time::sleep(Duration::from_secs(65)).await;
        flush().await;

        let updates = rt.store.updates.lock().unwrap().clone();
        assert_eq!(updates.len(), before + 2);
        assert!(updates.last().unwrap().1.elapsed_seconds >= 60);
        assert_eq!(updates.last().unwrap().1.append_click, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_failure_is_not_fatal() {
        let mut rt = TestRuntime::builder()
            .store(Arc::new(FailingSessionStore))
            .build();
        rt.wait_for_drain().await;
        rt.select(ChatOption::QueroComprar).await;
        rt.wait_for_drain().await;
        rt.submit_name("Pedro").await;
        rt.wait_for_drain().await;
        rt.select(ChatOption::VerPlanos).await;
        rt.wait_for_drain().await;

        assert_eq!(rt.snapshot().state, ConvState::Plans);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_record_is_created_on_next_name() {
        let store = Arc::new(FlakySessionStore::failing_creates(1));
        let mut rt = TestRuntime::builder().store(store.clone()).build();
        rt.wait_for_drain().await;

        // The support shortcut's create is refused
        rt.select(ChatOption::PrecisoDeSuporte).await;
        rt.wait_for_drain().await;
        flush().await;
        assert!(store.inner.get("test-session").is_none());

        rt.select(ChatOption::QueroComprar).await;
        rt.wait_for_drain().await;
        rt.submit_name("Pedro").await;
        rt.wait_for_drain().await;
        rt.select(ChatOption::VerPlanos).await;
        rt.wait_for_drain().await;
        flush().await;

        let session = store.inner.get("test-session").unwrap();
        assert_eq!(session.visitor_name, "Pedro");
        assert_eq!(session.all_clicks, vec!["📺 Ver planos"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_releases_timers() {
        let mut rt = TestRuntime::new();
        reach_checkout(&mut rt).await;
        // Followup and refresh are both pending
        assert!(rt.timer.live() >= 2);

        let mut rx = rt.broadcast_rx.resubscribe();
        let timer = rt.stop().await;
        assert_eq!(timer.live(), 0);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }

    /// welcome → comprar → Pedro → Ver planos → Vitalício
    #[tokio::test(start_paused = true)]
    async fn test_buy_scenario_end_to_end() {
        let mut rt = TestRuntime::new();
        rt.wait_for_drain().await;
        rt.select(ChatOption::QueroComprar).await;
        rt.wait_for_drain().await;
        rt.submit_name("Pedro").await;
        rt.wait_for_drain().await;
        rt.select(ChatOption::VerPlanos).await;
        rt.wait_for_drain().await;
        rt.select(ChatOption::Vitalicio).await;
        let events = rt.wait_for_drain().await;

        let revealed = messages(&events);
        assert_eq!(revealed[0], Message::user_echo("Vitalício"));
        assert_eq!(&revealed[1..], script::checkout(Plan::Vitalicio, "Pedro").as_slice());
        assert_eq!(
            revealed[3],
            Message::payment(script::payment_url(Plan::Vitalicio))
        );

        let snapshot = rt.snapshot();
        assert_eq!(snapshot.state, ConvState::Vitalicio);
        assert_eq!(snapshot.visitor_name.as_deref(), Some("Pedro"));
        assert!(!snapshot.input_enabled);
    }
}
