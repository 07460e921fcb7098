//! Client for an Ollama-style chat-completion endpoint.
//!
//! One [`ChatClient`] serves both call shapes the pipeline needs:
//! [`ChatClient::chat`] awaits a complete reply, [`ChatClient::chat_stream`]
//! consumes an NDJSON stream chunk by chunk, pushing each piece of content
//! into a [`ChunkSink`] as it arrives.
//!
//! Chat requests carry no timeout — generation may legitimately run for
//! minutes; only page fetches are bounded.

use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use brochurebuilder_shared::{BrochureError, ChatConfig, Result};

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Chat message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry in the ordered message list sent to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// A system-role message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// A user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Request payload for the chat endpoint.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
}

/// A non-streamed reply is either a completed message or something else.
///
/// The malformed case is handled explicitly rather than probing for
/// attribute presence — any reply without `message.content` falls into
/// the catch-all variant and becomes an error.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatReply {
    Completed { message: Message },
    Malformed(serde_json::Value),
}

/// One NDJSON line of a streamed reply.
#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    message: Option<Message>,
    #[serde(default)]
    done: bool,
}

// ---------------------------------------------------------------------------
// ChunkSink
// ---------------------------------------------------------------------------

/// Receives streamed content chunks as they arrive.
///
/// The CLI plugs stdout in here; tests collect into a buffer.
pub trait ChunkSink {
    /// Called once per chunk that carries textual content.
    fn emit(&mut self, chunk: &str);
}

/// No-op sink for callers that only want the accumulated result.
pub struct SilentSink;

impl ChunkSink for SilentSink {
    fn emit(&mut self, _chunk: &str) {}
}

// ---------------------------------------------------------------------------
// ChatClient
// ---------------------------------------------------------------------------

/// Client for a fixed chat-completion endpoint and model.
pub struct ChatClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl ChatClient {
    /// Create a client for the configured endpoint and model.
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
        }
    }

    /// Send a non-streamed request and await the complete reply content.
    pub async fn chat(&self, messages: &[Message]) -> Result<String> {
        let response = self.send(messages, false).await?;

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| BrochureError::Chat(format!("undecodable chat reply: {e}")))?;

        match reply {
            ChatReply::Completed { message } => {
                debug!(chars = message.content.len(), "chat reply received");
                Ok(message.content)
            }
            ChatReply::Malformed(value) => Err(BrochureError::Chat(format!(
                "reply missing message content: {value}"
            ))),
        }
    }

    /// Send a streamed request, forwarding each content chunk to `sink`.
    ///
    /// Returns the accumulated text once the underlying stream ends.
    pub async fn chat_stream(
        &self,
        messages: &[Message],
        sink: &mut dyn ChunkSink,
    ) -> Result<String> {
        let response = self.send(messages, true).await?;

        let mut stream = response.bytes_stream();
        let mut buf: Vec<u8> = Vec::new();
        let mut accumulated = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| BrochureError::Network(format!("chat stream read failed: {e}")))?;
            buf.extend_from_slice(&chunk);

            // Consume every complete line buffered so far.
            while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buf.drain(..=pos).collect();
                handle_stream_line(&line[..pos], sink, &mut accumulated)?;
            }
        }

        // A final line may arrive without a trailing newline.
        if !buf.is_empty() {
            handle_stream_line(&buf, sink, &mut accumulated)?;
        }

        debug!(chars = accumulated.len(), "chat stream ended");
        Ok(accumulated)
    }

    async fn send(&self, messages: &[Message], stream: bool) -> Result<reqwest::Response> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| BrochureError::Network(format!("chat request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BrochureError::Chat(format!(
                "chat endpoint returned HTTP {status}"
            )));
        }

        Ok(response)
    }
}

/// Parse one stream line and forward its content, if any.
fn handle_stream_line(
    line: &[u8],
    sink: &mut dyn ChunkSink,
    accumulated: &mut String,
) -> Result<()> {
    let line = std::str::from_utf8(line)
        .map_err(|e| BrochureError::Chat(format!("non-UTF-8 stream chunk: {e}")))?;
    let line = line.trim();
    if line.is_empty() {
        return Ok(());
    }

    let chunk: StreamChunk = serde_json::from_str(line)
        .map_err(|e| BrochureError::Chat(format!("undecodable stream chunk: {e} (got: {line})")))?;

    if let Some(message) = chunk.message {
        if !message.content.is_empty() {
            sink.emit(&message.content);
            accumulated.push_str(&message.content);
        }
    }
    if chunk.done {
        debug!("chat stream reported done");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Sink that records every emitted chunk.
    struct CollectSink(Vec<String>);

    impl ChunkSink for CollectSink {
        fn emit(&mut self, chunk: &str) {
            self.0.push(chunk.to_string());
        }
    }

    fn client_for(server: &MockServer) -> ChatClient {
        ChatClient::new(&ChatConfig {
            endpoint: format!("{}/api/chat", server.uri()),
            model: "llama3.2".into(),
        })
    }

    #[test]
    fn message_serializes_with_lowercase_role() {
        let json = serde_json::to_string(&Message::system("be brief")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"be brief"}"#);
    }

    #[test]
    fn request_carries_model_messages_and_stream_flag() {
        let messages = vec![Message::user("hello")];
        let request = ChatRequest {
            model: "llama3.2",
            messages: &messages,
            stream: true,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""model":"llama3.2""#));
        assert!(json.contains(r#""stream":true"#));
        assert!(json.contains(r#""role":"user""#));
    }

    #[tokio::test]
    async fn chat_returns_reply_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({"stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "llama3.2",
                "message": {"role": "assistant", "content": "Hello there."},
                "done": true,
            })))
            .mount(&server)
            .await;

        let content = client_for(&server).chat(&[Message::user("hi")]).await.unwrap();
        assert_eq!(content, "Hello there.");
    }

    #[tokio::test]
    async fn chat_rejects_reply_without_message_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "llama3.2",
                "done": true,
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .chat(&[Message::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, BrochureError::Chat(_)));
    }

    #[tokio::test]
    async fn chat_rejects_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .chat(&[Message::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, BrochureError::Chat(_)));
    }

    #[tokio::test]
    async fn chat_stream_emits_chunks_in_order_and_accumulates() {
        let server = MockServer::start().await;
        let body = concat!(
            r##"{"message":{"role":"assistant","content":"# Acme"},"done":false}"##,
            "\n",
            "\n", // keep-alive blank line is ignored
            r#"{"message":{"role":"assistant","content":" Brochure"},"done":false}"#,
            "\n",
            r#"{"message":{"role":"assistant","content":""},"done":true}"#,
            "\n",
        );
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({"stream": true})))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"),
            )
            .mount(&server)
            .await;

        let mut sink = CollectSink(Vec::new());
        let full = client_for(&server)
            .chat_stream(&[Message::user("write")], &mut sink)
            .await
            .unwrap();

        assert_eq!(sink.0, vec!["# Acme", " Brochure"]);
        assert_eq!(full, "# Acme Brochure");
    }

    #[tokio::test]
    async fn chat_stream_handles_missing_trailing_newline() {
        let server = MockServer::start().await;
        let body = r#"{"message":{"role":"assistant","content":"tail"},"done":true}"#;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"))
            .mount(&server)
            .await;

        let mut sink = CollectSink(Vec::new());
        let full = client_for(&server)
            .chat_stream(&[Message::user("write")], &mut sink)
            .await
            .unwrap();
        assert_eq!(full, "tail");
    }

    #[tokio::test]
    async fn chat_stream_rejects_undecodable_chunk() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("not json\n", "application/x-ndjson"),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .chat_stream(&[Message::user("write")], &mut SilentSink)
            .await
            .unwrap_err();
        assert!(matches!(err, BrochureError::Chat(_)));
    }

    #[test]
    fn stream_chunk_without_message_is_skipped() {
        let mut sink = CollectSink(Vec::new());
        let mut acc = String::new();
        handle_stream_line(br#"{"done":false}"#, &mut sink, &mut acc).unwrap();
        assert!(sink.0.is_empty());
        assert!(acc.is_empty());
    }
}
