//! Wire protocol for the chat WebSocket.
//!
//! One JSON envelope per text frame, tagged by `type`. The payload of a
//! `stream_chunk` envelope is itself either opaque text or a JSON object
//! with optional `content`/`thinking` string fields;
//! [`ChunkPayload::classify`] is the single place that distinction is made.

use serde::{Deserialize, Serialize};

/// Client → server envelopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// One outbound chat message. `model` and `web_search` are optional
    /// overrides; the server applies its own defaults when they are absent.
    Message {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        web_search: Option<bool>,
    },
    /// Application-level keepalive.
    Ping { timestamp: f64 },
}

/// Server → client envelopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Greeting emitted once the server has accepted the connection.
    Connected { status: String },
    /// Acknowledgment that a message was accepted for processing.
    MessageReceived { status: String },
    /// One fragment of the assistant reply being streamed.
    StreamChunk { chunk: String },
    /// The in-flight reply is finished.
    StreamComplete { status: String },
    /// Server-side processing error; terminates the in-flight reply.
    Error { error: String },
    /// Keepalive response.
    Pong {
        #[serde(default)]
        timestamp: Option<f64>,
        #[serde(default)]
        server_time: Option<String>,
    },
}

/// Classification of one `stream_chunk` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkPayload {
    /// JSON object carrying a `content` string: append to the reply.
    Content(String),
    /// JSON object carrying a `thinking` string: display-only marker.
    Thinking(String),
    /// Not JSON at all: append the raw text verbatim.
    Opaque(String),
    /// Valid JSON carrying neither field; nothing to render.
    Ignored,
}

impl ChunkPayload {
    /// Sorts a raw chunk into one of the payload kinds.
    ///
    /// `content` wins over `thinking` when both are present. Empty strings
    /// count as absent.
    pub fn classify(raw: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(value) => {
                if let Some(content) = value.get("content").and_then(|v| v.as_str()) {
                    if !content.is_empty() {
                        return ChunkPayload::Content(content.to_string());
                    }
                }
                if let Some(thinking) = value.get("thinking").and_then(|v| v.as_str()) {
                    if !thinking.is_empty() {
                        return ChunkPayload::Thinking(thinking.to_string());
                    }
                }
                ChunkPayload::Ignored
            }
            Err(_) => ChunkPayload::Opaque(raw.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_wire_shape() {
        let event = ClientEvent::Message {
            message: "hello".to_string(),
            model: None,
            web_search: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"message","message":"hello"}"#);
    }

    #[test]
    fn test_server_event_names() {
        let event: ServerEvent =
            serde_json::from_str(r#"{"type":"stream_chunk","chunk":"abc"}"#).unwrap();
        assert_eq!(
            event,
            ServerEvent::StreamChunk {
                chunk: "abc".to_string()
            }
        );

        let event: ServerEvent =
            serde_json::from_str(r#"{"type":"message_received","status":"Processing"}"#).unwrap();
        assert_eq!(
            event,
            ServerEvent::MessageReceived {
                status: "Processing".to_string()
            }
        );

        let event: ServerEvent =
            serde_json::from_str(r#"{"type":"error","error":"boom"}"#).unwrap();
        assert_eq!(
            event,
            ServerEvent::Error {
                error: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_pong_fields_are_optional() {
        let event: ServerEvent = serde_json::from_str(r#"{"type":"pong"}"#).unwrap();
        assert_eq!(
            event,
            ServerEvent::Pong {
                timestamp: None,
                server_time: None
            }
        );
    }

    #[test]
    fn test_classify_content() {
        assert_eq!(
            ChunkPayload::classify(r#"{"content":"hi"}"#),
            ChunkPayload::Content("hi".to_string())
        );
    }

    #[test]
    fn test_classify_thinking() {
        assert_eq!(
            ChunkPayload::classify(r#"{"thinking":"hmm"}"#),
            ChunkPayload::Thinking("hmm".to_string())
        );
    }

    #[test]
    fn test_classify_content_wins_over_thinking() {
        assert_eq!(
            ChunkPayload::classify(r#"{"content":"a","thinking":"b"}"#),
            ChunkPayload::Content("a".to_string())
        );
    }

    #[test]
    fn test_classify_opaque_text() {
        assert_eq!(
            ChunkPayload::classify("plain words"),
            ChunkPayload::Opaque("plain words".to_string())
        );
    }

    #[test]
    fn test_classify_json_without_fields() {
        assert_eq!(ChunkPayload::classify(r#"{"other":1}"#), ChunkPayload::Ignored);
        assert_eq!(ChunkPayload::classify(r#""quoted""#), ChunkPayload::Ignored);
        assert_eq!(ChunkPayload::classify("42"), ChunkPayload::Ignored);
    }

    #[test]
    fn test_classify_empty_strings_count_as_absent() {
        assert_eq!(ChunkPayload::classify(r#"{"content":""}"#), ChunkPayload::Ignored);
        assert_eq!(
            ChunkPayload::classify(r#"{"content":"","thinking":"x"}"#),
            ChunkPayload::Thinking("x".to_string())
        );
    }
}
