//! Server-Sent Events support

use crate::runtime::ChatEvent;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Convert broadcast stream to SSE stream
pub fn sse_stream(
    init_event: ChatEvent,
    broadcast_rx: tokio::sync::broadcast::Receiver<ChatEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move { Ok(chat_event_to_axum(init_event)) });

    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(chat_event_to_axum(event))),
        Err(_) => None, // Skip lagged messages
    });

    let combined = init.chain(broadcasts);

    Sse::new(combined).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn chat_event_to_axum(event: ChatEvent) -> Event {
    let (event_type, data) = event_payload(event);
    Event::default().event(event_type).data(data.to_string())
}

fn event_payload(event: ChatEvent) -> (&'static str, serde_json::Value) {
    match event {
        ChatEvent::Init { snapshot } => (
            "init",
            json!({
                "type": "init",
                "chat": snapshot
            }),
        ),
        ChatEvent::StateChange { state } => (
            "state_change",
            json!({
                "type": "state_change",
                "state": state
            }),
        ),
        ChatEvent::Message { message } => (
            "message",
            json!({
                "type": "message",
                "message": message
            }),
        ),
        ChatEvent::Typing { active } => (
            "typing",
            json!({
                "type": "typing",
                "active": active
            }),
        ),
        ChatEvent::Input { enabled } => (
            "input",
            json!({
                "type": "input",
                "enabled": enabled
            }),
        ),
        ChatEvent::InputRejected { prompt } => (
            "input_rejected",
            json!({
                "type": "input_rejected",
                "prompt": prompt
            }),
        ),
        ChatEvent::Notify => ("notify", json!({ "type": "notify" })),
        ChatEvent::Error { message } => (
            "error",
            json!({
                "type": "error",
                "message": message
            }),
        ),
    }
}
