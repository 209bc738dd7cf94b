//! Chat page - View Model

use contracts::chat::protocol::ClientEvent;
use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::domain::chat::session::ChatSession;
use crate::domain::chat::socket::{self, ChatSocketHandle};
use crate::system::auth::api;

/// Signal bundle plus the socket handle for one chat page. Created when
/// the page mounts; the socket task dies with the last handle clone.
#[derive(Clone)]
pub struct ChatPageVm {
    pub session: RwSignal<ChatSession>,
    pub draft: RwSignal<String>,
    socket: ChatSocketHandle,
}

impl ChatPageVm {
    pub fn new() -> Self {
        let session = RwSignal::new(ChatSession::new());
        let socket = socket::spawn(session);
        Self {
            session,
            draft: RwSignal::new(String::new()),
            socket,
        }
    }

    /// Sends the current draft if the session guard allows it; otherwise a
    /// silent no-op with the draft left in place.
    pub fn send_command(&self) {
        let text = self.draft.get();
        let mut wire_text = None;
        self.session.update(|s| wire_text = s.begin_exchange(&text));
        let Some(message) = wire_text else {
            return;
        };
        self.draft.set(String::new());
        self.socket.send(ClientEvent::Message {
            message,
            model: None,
            web_search: None,
        });
    }

    /// Logs out and returns to the login page.
    pub fn logout_command(&self, navigate: impl Fn(&str, NavigateOptions) + 'static) {
        wasm_bindgen_futures::spawn_local(async move {
            match api::logout().await {
                Ok(_) => navigate("/login", Default::default()),
                Err(e) => log::error!("Logout error: {}", e),
            }
        });
    }
}
