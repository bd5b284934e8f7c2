use crate::core::backend::{parse_reply, ChatBackend, TransportError};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One canned backend result.
#[derive(Debug, Clone)]
pub enum Scripted {
    Reply(String),
    Status(StatusCode),
    Malformed,
    Interrupted,
}

impl Scripted {
    pub fn reply(text: &str) -> Self {
        Scripted::Reply(text.to_string())
    }
}

/// Backend that answers from a fixed script and records every message.
/// Panics when called more often than scripted.
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn send(&self, message: &str) -> Result<String, TransportError> {
        self.calls.lock().unwrap().push(message.to_string());
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("backend called more often than scripted");
        match next {
            Scripted::Reply(text) => Ok(text),
            Scripted::Status(status) => Err(TransportError::Status {
                status,
                detail: None,
            }),
            Scripted::Malformed => parse_reply(r#"{"unexpected":true}"#),
            Scripted::Interrupted => Err(TransportError::Interrupted(
                "connection reset".to_string(),
            )),
        }
    }
}
