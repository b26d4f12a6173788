//! Chat runtime executor

use super::traits::{NotificationCue, Timer};
use super::tracker::InteractionTracker;
use super::{ChatEvent, ChatSnapshot, RuntimeConfig};

use crate::state_machine::{
    transition, ConvContext, ConvState, Effect, Event, Message, TransitionError,
};
use futures::future::BoxFuture;
use std::collections::VecDeque;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

/// A pending delay; `None` never fires
type TimerSlot = Option<BoxFuture<'static, ()>>;

async fn fire(slot: &mut TimerSlot) {
    match slot {
        Some(delay) => delay.await,
        None => std::future::pending().await,
    }
}

/// Generic chat runtime that can work with any cue and timer implementations
pub struct ChatRuntime<N, T>
where
    N: NotificationCue + 'static,
    T: Timer + 'static,
{
    context: ConvContext,
    state: ConvState,
    config: RuntimeConfig,
    tracker: InteractionTracker,
    cue: N,
    timer: T,
    event_rx: mpsc::Receiver<Event>,
    broadcast_tx: broadcast::Sender<ChatEvent>,
    snapshot_tx: watch::Sender<ChatSnapshot>,
    shutdown: CancellationToken,
    /// Messages waiting to be revealed, head first
    queue: VecDeque<Message>,
    transcript: Vec<Message>,
    typing: bool,
    input_enabled: bool,
    reveal: TimerSlot,
    followup: TimerSlot,
    refresh: TimerSlot,
    idle: TimerSlot,
}

impl<N, T> ChatRuntime<N, T>
where
    N: NotificationCue + 'static,
    T: Timer + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        context: ConvContext,
        config: RuntimeConfig,
        tracker: InteractionTracker,
        cue: N,
        timer: T,
        event_rx: mpsc::Receiver<Event>,
        broadcast_tx: broadcast::Sender<ChatEvent>,
        snapshot_tx: watch::Sender<ChatSnapshot>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            context,
            state: ConvState::default(),
            config,
            tracker,
            cue,
            timer,
            event_rx,
            broadcast_tx,
            snapshot_tx,
            shutdown,
            queue: VecDeque::new(),
            transcript: Vec::new(),
            typing: false,
            input_enabled: false,
            reveal: None,
            followup: None,
            refresh: None,
            idle: None,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.context.session_id, "Starting chat runtime");

        self.process_event(Event::Start);
        self.arm_idle();

        let mut abandoned = false;
        loop {
            tokio::select! {
                biased;
                () = self.shutdown.cancelled() => break,
                event = self.event_rx.recv() => match event {
                    Some(event) => self.process_event(event),
                    None => break,
                },
                () = fire(&mut self.reveal) => {
                    self.reveal = None;
                    self.reveal_next();
                }
                () = fire(&mut self.followup) => {
                    self.followup = None;
                    self.process_event(Event::FollowupElapsed);
                }
                () = fire(&mut self.refresh) => {
                    // Time only counts while the chat is on screen
                    if self.tracker.is_created() && self.is_watched() {
                        self.tracker.refresh();
                    }
                    self.arm_refresh();
                }
                () = fire(&mut self.idle) => {
                    if self.is_watched() {
                        self.arm_idle();
                    } else {
                        tracing::info!(session_id = %self.context.session_id, "Chat abandoned, stopping");
                        abandoned = true;
                        break;
                    }
                }
            }
        }

        if self.tracker.is_created() && !abandoned {
            self.tracker.refresh();
        }

        tracing::info!(session_id = %self.context.session_id, "Chat runtime stopped");
    }

    fn process_event(&mut self, event: Event) {
        if matches!(
            event,
            Event::OptionSelected { .. } | Event::NameSubmitted { .. } | Event::PaymentClicked
        ) {
            self.arm_idle();
        }
        // Any click or typed name cancels the nudge, accepted or not
        if matches!(event, Event::OptionSelected { .. } | Event::NameSubmitted { .. }) {
            self.followup = None;
        }

        if matches!(event, Event::NameSubmitted { .. }) && !self.input_enabled {
            self.report(TransitionError::InputClosed(self.state));
            return;
        }

        let result = match transition(&self.state, &self.context, event) {
            Ok(r) => r,
            Err(e) => {
                self.report(e);
                return;
            }
        };

        let old_state = std::mem::replace(&mut self.state, result.new_state);
        if old_state != self.state {
            tracing::info!(
                session_id = %self.context.session_id,
                from = %old_state,
                to = %self.state,
                "State change"
            );
            self.broadcast(ChatEvent::StateChange { state: self.state });
        }

        for effect in result.effects {
            self.execute_effect(effect);
        }

        self.publish_snapshot();
    }

    /// Surface a refused event. Nothing about the conversation changes.
    fn report(&self, error: TransitionError) {
        let session_id = &self.context.session_id;
        match error {
            TransitionError::EmptyName => {
                tracing::debug!(session_id = %session_id, "Ignoring blank name submission");
            }
            TransitionError::InvalidName => {
                tracing::debug!(session_id = %session_id, "Name rejected");
                self.broadcast(ChatEvent::InputRejected {
                    prompt: error.to_string(),
                });
            }
            TransitionError::UnhandledOption { .. } => {
                tracing::warn!(session_id = %session_id, error = %error, "Option not offered");
            }
            TransitionError::InputClosed(_) | TransitionError::InvalidTransition(_) => {
                tracing::warn!(session_id = %session_id, error = %error, "Event rejected");
                self.broadcast(ChatEvent::Error {
                    message: error.to_string(),
                });
            }
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Deliver { messages } => {
                tracing::debug!(session_id = %self.context.session_id, count = messages.len(), "Delivering");
                self.queue = messages.into();
                self.reveal = None;
                self.set_input(false);
                self.set_typing(true);
                self.arm_reveal();
            }
            Effect::Echo { text } => {
                self.append(Message::user_echo(text));
            }
            Effect::Remember(change) => {
                self.context.apply(change);
            }
            Effect::CreateSession { visitor_name } => {
                if self.tracker.create(&visitor_name) {
                    self.arm_refresh();
                }
            }
            Effect::TrackClick { label } => self.tracker.track_click(&label),
            Effect::TrackPlan { plan } => self.tracker.track_plan(plan),
            Effect::TrackPaymentClick => self.tracker.track_payment_click(),
            Effect::OpenNameInput => self.set_input(true),
            Effect::ArmFollowup => {
                self.followup = Some(self.timer.sleep(self.config.followup_after));
            }
            Effect::CancelFollowup => {
                self.followup = None;
            }
        }
    }

    /// Reveal the head of the queue
    fn reveal_next(&mut self) {
        if let Some(message) = self.queue.pop_front() {
            let notify = self.context.notifications_enabled && message.is_bot_authored();
            self.append(message);
            if notify {
                self.cue.play();
            }
        }

        if self.queue.is_empty() {
            self.set_typing(false);
            self.publish_snapshot();
            self.process_event(Event::DeliveryDrained);
        } else {
            self.arm_reveal();
            self.publish_snapshot();
        }
    }

    fn arm_reveal(&mut self) {
        self.reveal = Some(self.timer.sleep(self.config.reveal.sample()));
    }

    fn arm_refresh(&mut self) {
        self.refresh = Some(self.timer.sleep(self.config.refresh_every));
    }

    fn arm_idle(&mut self) {
        self.idle = Some(self.timer.sleep(self.config.idle_timeout));
    }

    /// Whether any client is subscribed to this chat
    fn is_watched(&self) -> bool {
        self.broadcast_tx.receiver_count() > 0
    }

    fn append(&mut self, message: Message) {
        self.transcript.push(message.clone());
        self.broadcast(ChatEvent::Message { message });
    }

    fn set_typing(&mut self, active: bool) {
        if self.typing != active {
            self.typing = active;
            self.broadcast(ChatEvent::Typing { active });
        }
    }

    fn set_input(&mut self, enabled: bool) {
        if self.input_enabled != enabled {
            self.input_enabled = enabled;
            self.broadcast(ChatEvent::Input { enabled });
        }
    }

    fn broadcast(&self, event: ChatEvent) {
        // No subscribers is fine; the snapshot carries the state
        let _ = self.broadcast_tx.send(event);
    }

    fn publish_snapshot(&self) {
        self.snapshot_tx.send_replace(ChatSnapshot {
            session_id: self.context.session_id.clone(),
            state: self.state,
            visitor_name: self.context.visitor_name.clone(),
            transcript: self.transcript.clone(),
            typing: self.typing,
            input_enabled: self.input_enabled,
        });
    }
}
