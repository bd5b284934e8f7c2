//! The outbound call to the backend chat service.
//!
//! A turn sends `{"message": ...}` as JSON and expects a 2xx response whose
//! JSON body carries a string `response` field. Every other outcome is a
//! [`TransportError`].

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Why a turn could not produce a reply. All variants are handled the same
/// way by the turn executor; the distinction only matters for diagnostics.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("HTTP error! status: {status}{}", detail_suffix(.detail))]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("malformed response body: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("request task ended without a result: {0}")]
    Interrupted(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|text| format!(" ({text})"))
        .unwrap_or_default()
}

/// Anything that can answer one chat message.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(&self, message: &str) -> Result<String, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpChatBackend {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send(&self, message: &str) -> Result<String, TransportError> {
        debug!(endpoint = %self.endpoint, "posting chat message");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(TransportError::Network)?;

        let status = response.status();
        let body = response.text().await.map_err(TransportError::Network)?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status,
                detail: summarize_error_body(&body),
            });
        }

        parse_reply(&body)
    }
}

/// Pull the `response` field out of a successful body.
pub fn parse_reply(body: &str) -> Result<String, TransportError> {
    serde_json::from_str::<ChatResponse>(body)
        .map(|parsed| parsed.response)
        .map_err(TransportError::Malformed)
}

/// Best-effort one-line summary of an error body, for logs only.
pub fn summarize_error_body(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let summary = match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => extract_error_summary(&value)?,
        Err(_) => trimmed.to_string(),
    };

    let collapsed = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            ["message", "response"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str().map(str::to_owned)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::Mutex;

    #[test]
    fn parse_reply_reads_response_field() {
        assert_eq!(
            parse_reply(r#"{"response":"Hello!"}"#).expect("reply"),
            "Hello!"
        );
    }

    #[test]
    fn parse_reply_rejects_missing_or_non_string_field() {
        assert!(matches!(
            parse_reply(r#"{"answer":"Hello!"}"#),
            Err(TransportError::Malformed(_))
        ));
        assert!(matches!(
            parse_reply(r#"{"response":42}"#),
            Err(TransportError::Malformed(_))
        ));
        assert!(matches!(
            parse_reply("<html>oops</html>"),
            Err(TransportError::Malformed(_))
        ));
    }

    #[test]
    fn summarize_error_body_prefers_structured_fields() {
        assert_eq!(
            summarize_error_body(r#"{"error":{"message":"model  overloaded"}}"#).as_deref(),
            Some("model overloaded")
        );
        assert_eq!(
            summarize_error_body(r#"{"error":"No message provided."}"#).as_deref(),
            Some("No message provided.")
        );
        assert_eq!(
            summarize_error_body(
                r#"{"response":"Sorry, I cannot connect to the AI service."}"#
            )
            .as_deref(),
            Some("Sorry, I cannot connect to the AI service.")
        );
        assert_eq!(summarize_error_body(r#"{"status":"failed"}"#), None);
        assert_eq!(
            summarize_error_body("bad gateway\n").as_deref(),
            Some("bad gateway")
        );
        assert_eq!(summarize_error_body("   "), None);
    }

    #[test]
    fn status_error_display_includes_detail() {
        let err = TransportError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            detail: Some("ollama down".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "HTTP error! status: 503 Service Unavailable (ollama down)"
        );
    }

    type CapturedBodies = Arc<Mutex<Vec<serde_json::Value>>>;

    async fn read_request_body(stream: &mut tokio::net::TcpStream) -> Vec<u8> {
        let mut buffer = Vec::new();
        let mut chunk = [0_u8; 1024];
        let header_end = loop {
            let read = stream.read(&mut chunk).await.expect("read request");
            assert!(read > 0, "client closed before sending headers");
            buffer.extend_from_slice(&chunk[..read]);
            if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let headers = String::from_utf8_lossy(&buffer[..header_end]).to_string();
        let content_length = headers
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let mut body = buffer[header_end..].to_vec();
        while body.len() < content_length {
            let read = stream.read(&mut chunk).await.expect("read body");
            assert!(read > 0, "client closed before sending body");
            body.extend_from_slice(&chunk[..read]);
        }
        body.truncate(content_length);
        body
    }

    /// Serve exactly one request with the given status line and body.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, CapturedBodies) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("local addr should resolve");
        let captured: CapturedBodies = Arc::new(Mutex::new(Vec::new()));
        let captured_for_server = Arc::clone(&captured);

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let body_bytes = read_request_body(&mut stream).await;
            if let Ok(json) = serde_json::from_slice(&body_bytes) {
                captured_for_server.lock().await.push(json);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .await
                .expect("write response");
            stream.shutdown().await.ok();
        });

        (format!("http://{addr}/api/chat/"), captured)
    }

    #[tokio::test]
    async fn http_backend_posts_message_and_reads_reply() {
        let (endpoint, captured) = serve_once("200 OK", r#"{"response":"Hello!"}"#).await;
        let backend = HttpChatBackend::new(endpoint);

        let reply = backend.send("hi").await.expect("reply");

        assert_eq!(reply, "Hello!");
        let bodies = captured.lock().await;
        assert_eq!(bodies.as_slice(), &[serde_json::json!({ "message": "hi" })]);
    }

    #[tokio::test]
    async fn http_backend_maps_non_success_status() {
        let (endpoint, _) = serve_once(
            "503 Service Unavailable",
            r#"{"response":"Sorry, I cannot connect to the AI service."}"#,
        )
        .await;
        let backend = HttpChatBackend::new(endpoint);

        match backend.send("test").await {
            Err(TransportError::Status { status, detail }) => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(
                    detail.as_deref(),
                    Some("Sorry, I cannot connect to the AI service.")
                );
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_backend_maps_malformed_success_body() {
        let (endpoint, _) = serve_once("200 OK", r#"{"reply":"wrong field"}"#).await;
        let backend = HttpChatBackend::new(endpoint);

        assert!(matches!(
            backend.send("hi").await,
            Err(TransportError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn http_backend_maps_connection_failure() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("local addr should resolve");
        drop(listener);

        let backend = HttpChatBackend::new(format!("http://{addr}/api/chat/"));
        assert!(matches!(
            backend.send("hi").await,
            Err(TransportError::Network(_))
        ));
    }
}
