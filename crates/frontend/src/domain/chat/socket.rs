//! WebSocket transport for the chat session.
//!
//! Owns the connection lifecycle: dial, decode, dispatch, reconnect. The
//! session only observes lifecycle transitions and decoded events;
//! reconnect policy lives entirely here.

use contracts::chat::protocol::{ClientEvent, ServerEvent};
use futures::channel::mpsc;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use gloo_net::websocket::{futures::WebSocket, Message};
use gloo_timers::future::{IntervalStream, TimeoutFuture};
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use super::session::{ChatSession, ConnectionState};
use crate::shared::api_utils::ws_url;

/// Delay before re-dialing a dropped connection.
const RECONNECT_DELAY_MS: u32 = 3_000;
/// Application-level keepalive period.
const PING_INTERVAL_MS: u32 = 25_000;

/// Cloneable sender half handed to the view model. Outbound events are
/// queued and drained by the connection task.
#[derive(Clone)]
pub struct ChatSocketHandle {
    tx: mpsc::UnboundedSender<ClientEvent>,
}

impl ChatSocketHandle {
    /// Fire-and-forget enqueue.
    pub fn send(&self, event: ClientEvent) {
        if self.tx.unbounded_send(event).is_err() {
            log::warn!("Chat socket task is gone; dropping outbound event");
        }
    }
}

/// Spawns the connection task for one chat page and returns its handle.
/// The task ends when every handle clone has been dropped.
pub fn spawn(session: RwSignal<ChatSession>) -> ChatSocketHandle {
    let (tx, rx) = mpsc::unbounded();
    spawn_local(run(session, rx));
    ChatSocketHandle { tx }
}

async fn run(session: RwSignal<ChatSession>, outbound: mpsc::UnboundedReceiver<ClientEvent>) {
    let mut outbound = outbound.fuse();
    let url = ws_url("/ws");

    loop {
        update_session(&session, |s| s.set_connection(ConnectionState::Connecting));
        log::info!("Connecting to {}", url);

        let ws = match WebSocket::open(&url) {
            Ok(ws) => ws,
            Err(e) => {
                log::error!("Connection error: {:?}", e);
                update_session(&session, |s| s.set_connection(ConnectionState::Disconnected));
                TimeoutFuture::new(RECONNECT_DELAY_MS).await;
                continue;
            }
        };

        let (mut write, read) = ws.split();
        let mut read = read.fuse();
        let mut ping = IntervalStream::new(PING_INTERVAL_MS).fuse();

        loop {
            futures::select! {
                frame = read.next() => match frame {
                    Some(Ok(Message::Text(text))) => dispatch(&session, &text),
                    Some(Ok(Message::Bytes(_))) => {
                        log::warn!("Ignoring unexpected binary frame");
                    }
                    Some(Err(e)) => {
                        log::error!("WebSocket error: {:?}", e);
                        break;
                    }
                    None => {
                        log::info!("WebSocket closed by server");
                        break;
                    }
                },
                event = outbound.next() => match event {
                    Some(event) => {
                        if !send_event(&mut write, &event).await {
                            break;
                        }
                    }
                    // Every handle dropped: the chat page is gone.
                    None => return,
                },
                _ = ping.next() => {
                    let event = ClientEvent::Ping {
                        timestamp: js_sys::Date::now(),
                    };
                    if !send_event(&mut write, &event).await {
                        break;
                    }
                }
            }
        }

        update_session(&session, |s| s.set_connection(ConnectionState::Disconnected));
        TimeoutFuture::new(RECONNECT_DELAY_MS).await;
    }
}

/// The page can unmount while the task still holds frames; a disposed
/// signal must not take the task down with it.
fn update_session(session: &RwSignal<ChatSession>, f: impl FnOnce(&mut ChatSession)) {
    if session.try_update(f).is_none() {
        log::debug!("Chat session signal is gone; dropping update");
    }
}

/// Encodes and writes one event. Returns `false` when the connection is no
/// longer usable.
async fn send_event(write: &mut SplitSink<WebSocket, Message>, event: &ClientEvent) -> bool {
    let frame = match serde_json::to_string(event) {
        Ok(frame) => frame,
        Err(e) => {
            log::error!("Failed to encode client event: {}", e);
            return true;
        }
    };
    match write.send(Message::Text(frame)).await {
        Ok(()) => true,
        Err(e) => {
            log::error!("WebSocket send failed: {:?}", e);
            false
        }
    }
}

fn dispatch(session: &RwSignal<ChatSession>, raw: &str) {
    match serde_json::from_str::<ServerEvent>(raw) {
        Ok(event) => update_session(session, |s| s.apply_server_event(event)),
        Err(e) => log::warn!("Undecodable server event ({}): {}", e, raw),
    }
}
