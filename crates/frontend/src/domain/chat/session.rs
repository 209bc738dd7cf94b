//! Chat session state and stream reconstruction.
//!
//! Owns everything the chat page mutates: the transcript, the connection
//! state, the input lock, and the reply currently being streamed in. All
//! transitions are pure functions over this state, so the module is
//! testable without a DOM or a live socket; the view renders from it
//! reactively.

use contracts::chat::protocol::{ChunkPayload, ServerEvent};

/// Lifecycle of the realtime connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionState {
    /// CSS modifier class for the status dot.
    pub fn css_class(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
        }
    }

    /// Status bar label.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "Connecting...",
            ConnectionState::Connected => "Connected",
            ConnectionState::Disconnected => "Disconnected",
        }
    }
}

/// Transcript entry author.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

/// One rendered transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub thinking: bool,
    pub error: bool,
}

impl ChatMessage {
    fn user(text: String) -> Self {
        Self {
            sender: Sender::User,
            text,
            thinking: false,
            error: false,
        }
    }

    fn assistant(text: String, thinking: bool) -> Self {
        Self {
            sender: Sender::Assistant,
            text,
            thinking,
            error: false,
        }
    }
}

/// The assistant reply currently being streamed.
///
/// `buffer` accumulates `content` fragments. The displayed text of the
/// target entry can diverge from it while a thinking marker or a status
/// line is shown; the next content fragment re-renders from the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlightReply {
    index: usize,
    buffer: String,
}

/// All mutable state of one chat page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    pub messages: Vec<ChatMessage>,
    pub connection: ConnectionState,
    pub input_locked: bool,
    in_flight: Option<InFlightReply>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            connection: ConnectionState::Connecting,
            input_locked: false,
            in_flight: None,
        }
    }

    /// Connection lifecycle transition.
    ///
    /// Leaves `input_locked` alone: a bare disconnect does not re-disable
    /// input, only the stream termination paths touch the lock.
    pub fn set_connection(&mut self, state: ConnectionState) {
        self.connection = state;
    }

    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionState::Connected
    }

    /// Send-path guard: non-empty text, live connection, no reply already
    /// in flight.
    pub fn can_send(&self, text: &str) -> bool {
        !text.trim().is_empty() && self.is_connected() && self.in_flight.is_none()
    }

    /// Starts one user→assistant exchange: appends the user entry and the
    /// placeholder assistant entry in its thinking state, locks input and
    /// registers the in-flight reply.
    ///
    /// Returns the trimmed text to put on the wire, or `None` when the
    /// guard rejects the send (a silent no-op).
    pub fn begin_exchange(&mut self, text: &str) -> Option<String> {
        if !self.can_send(text) {
            return None;
        }
        let trimmed = text.trim().to_string();
        self.messages.push(ChatMessage::user(trimmed.clone()));
        self.messages
            .push(ChatMessage::assistant("Thinking...".to_string(), true));
        self.in_flight = Some(InFlightReply {
            index: self.messages.len() - 1,
            buffer: String::new(),
        });
        self.input_locked = true;
        Some(trimmed)
    }

    /// `message_received` acknowledgment: shows the server status line in
    /// the pending entry. Buffer and thinking flag stay untouched.
    pub fn acknowledge(&mut self, status: &str) {
        if let Some(reply) = &self.in_flight {
            self.messages[reply.index].text = status.to_string();
        }
    }

    /// Applies one `stream_chunk` payload per the reconstruction rules:
    /// content appends to the buffer, thinking replaces the displayed text
    /// only, opaque text appends verbatim. A chunk arriving with no pending
    /// reply starts one in place.
    pub fn apply_chunk(&mut self, chunk: &str) {
        if self.in_flight.is_none() {
            self.messages
                .push(ChatMessage::assistant(String::new(), false));
            self.in_flight = Some(InFlightReply {
                index: self.messages.len() - 1,
                buffer: String::new(),
            });
        }
        if let Some(reply) = self.in_flight.as_mut() {
            let entry = &mut self.messages[reply.index];
            entry.thinking = false;
            match ChunkPayload::classify(chunk) {
                ChunkPayload::Content(text) => {
                    reply.buffer.push_str(&text);
                    entry.text = reply.buffer.clone();
                }
                ChunkPayload::Thinking(text) => {
                    entry.text = format!("Thinking: {}", text);
                    entry.thinking = true;
                }
                ChunkPayload::Opaque(text) => {
                    reply.buffer.push_str(&text);
                    entry.text = reply.buffer.clone();
                }
                ChunkPayload::Ignored => {}
            }
        }
    }

    /// Normal stream termination: drops the in-flight reference and
    /// unlocks input.
    pub fn complete_stream(&mut self) {
        self.in_flight = None;
        self.input_locked = false;
    }

    /// Error termination: same cleanup as completion, plus the error text
    /// and marker on the pending entry. Input is unlocked even when no
    /// reply is pending.
    pub fn fail_stream(&mut self, error: &str) {
        if let Some(reply) = self.in_flight.take() {
            let entry = &mut self.messages[reply.index];
            entry.text = format!("Error: {}", error);
            entry.error = true;
        }
        self.input_locked = false;
    }

    /// Dispatches one decoded server event onto the session.
    pub fn apply_server_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Connected { status } => {
                log::info!("Server message: {}", status);
                self.set_connection(ConnectionState::Connected);
            }
            ServerEvent::MessageReceived { status } => self.acknowledge(&status),
            ServerEvent::StreamChunk { chunk } => self.apply_chunk(&chunk),
            ServerEvent::StreamComplete { status } => {
                log::debug!("Stream complete: {}", status);
                self.complete_stream();
            }
            ServerEvent::Error { error } => {
                log::error!("Server error: {}", error);
                self.fail_stream(&error);
            }
            ServerEvent::Pong { server_time, .. } => {
                log::debug!("Pong at {}", server_time.unwrap_or_default());
            }
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected_session() -> ChatSession {
        let mut session = ChatSession::new();
        session.set_connection(ConnectionState::Connected);
        session
    }

    #[test]
    fn test_send_appends_both_entries_and_locks_input() {
        let mut session = connected_session();

        let wire = session.begin_exchange("  hello there  ");
        assert_eq!(wire, Some("hello there".to_string()));
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[0].sender, Sender::User);
        assert_eq!(session.messages[0].text, "hello there");
        assert_eq!(session.messages[1].sender, Sender::Assistant);
        assert_eq!(session.messages[1].text, "Thinking...");
        assert!(session.messages[1].thinking);
        assert!(session.input_locked);
    }

    #[test]
    fn test_send_is_noop_for_blank_input() {
        let mut session = connected_session();

        assert_eq!(session.begin_exchange("   "), None);
        assert_eq!(session.begin_exchange(""), None);
        assert!(session.messages.is_empty());
        assert!(!session.input_locked);
    }

    #[test]
    fn test_send_is_noop_while_disconnected() {
        let mut session = ChatSession::new();
        assert_eq!(session.begin_exchange("hi"), None);

        session.set_connection(ConnectionState::Disconnected);
        assert_eq!(session.begin_exchange("hi"), None);
        assert!(session.messages.is_empty());
    }

    #[test]
    fn test_send_is_noop_while_reply_in_flight() {
        let mut session = connected_session();
        session.begin_exchange("first");

        assert_eq!(session.begin_exchange("second"), None);
        assert_eq!(session.messages.len(), 2);
    }

    #[test]
    fn test_content_chunks_append_monotonically() {
        let mut session = connected_session();
        session.begin_exchange("question");

        session.apply_chunk(r#"{"content":"a"}"#);
        session.apply_chunk(r#"{"content":"b"}"#);
        session.apply_chunk(r#"{"content":"c"}"#);

        assert_eq!(session.messages[1].text, "abc");
        assert!(!session.messages[1].thinking);
    }

    #[test]
    fn test_chunk_without_pending_reply_starts_one() {
        let mut session = connected_session();

        session.apply_chunk("hello");
        session.apply_chunk(r#"{"content":" world"}"#);

        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].sender, Sender::Assistant);
        assert_eq!(session.messages[0].text, "hello world");
    }

    #[test]
    fn test_thinking_clobbers_display_but_not_buffer() {
        let mut session = connected_session();
        session.begin_exchange("question");

        session.apply_chunk(r#"{"content":"a"}"#);
        session.apply_chunk(r#"{"thinking":"x"}"#);
        assert_eq!(session.messages[1].text, "Thinking: x");
        assert!(session.messages[1].thinking);

        session.apply_chunk(r#"{"content":"y"}"#);
        assert_eq!(session.messages[1].text, "ay");
        assert!(!session.messages[1].thinking);
    }

    #[test]
    fn test_unrecognized_json_chunk_only_clears_thinking() {
        let mut session = connected_session();
        session.begin_exchange("question");

        session.apply_chunk(r#"{"other":1}"#);

        assert_eq!(session.messages[1].text, "Thinking...");
        assert!(!session.messages[1].thinking);
    }

    #[test]
    fn test_acknowledge_replaces_placeholder_text_only() {
        let mut session = connected_session();
        session.begin_exchange("question");

        session.acknowledge("Processing your request...");
        assert_eq!(session.messages[1].text, "Processing your request...");
        assert!(session.messages[1].thinking);

        // The status line is not part of the reply content.
        session.apply_chunk(r#"{"content":"hi"}"#);
        assert_eq!(session.messages[1].text, "hi");
    }

    #[test]
    fn test_complete_stream_unlocks_input() {
        let mut session = connected_session();
        session.begin_exchange("question");
        session.apply_chunk(r#"{"content":"done"}"#);

        session.complete_stream();
        assert!(!session.input_locked);

        // The next chunk belongs to a fresh synthesized entry.
        session.apply_chunk(r#"{"content":"late"}"#);
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.messages[2].text, "late");
    }

    #[test]
    fn test_fail_stream_marks_entry_and_unlocks_input() {
        let mut session = connected_session();
        session.begin_exchange("question");

        session.fail_stream("model unavailable");
        assert_eq!(session.messages[1].text, "Error: model unavailable");
        assert!(session.messages[1].error);
        assert!(!session.input_locked);
    }

    #[test]
    fn test_fail_stream_without_pending_reply_still_unlocks() {
        let mut session = connected_session();
        session.input_locked = true;

        session.fail_stream("boom");
        assert!(session.messages.is_empty());
        assert!(!session.input_locked);
    }

    #[test]
    fn test_disconnect_leaves_input_lock_alone() {
        let mut session = connected_session();
        session.begin_exchange("question");

        session.set_connection(ConnectionState::Disconnected);
        assert!(session.input_locked);
        assert!(!session.can_send("more"));
    }

    #[test]
    fn test_server_event_dispatch_round() {
        let mut session = ChatSession::new();

        session.apply_server_event(ServerEvent::Connected {
            status: "Connected to WebAI".to_string(),
        });
        assert!(session.is_connected());

        session.begin_exchange("question");
        session.apply_server_event(ServerEvent::MessageReceived {
            status: "Processing your request...".to_string(),
        });
        session.apply_server_event(ServerEvent::StreamChunk {
            chunk: r#"{"content":"an answer"}"#.to_string(),
        });
        session.apply_server_event(ServerEvent::StreamComplete {
            status: "done".to_string(),
        });

        assert_eq!(session.messages[1].text, "an answer");
        assert!(!session.input_locked);

        session.apply_server_event(ServerEvent::Error {
            error: "late failure".to_string(),
        });
        assert_eq!(session.messages.len(), 2);
        assert!(!session.input_locked);
    }
}
