use super::ChatApi;
use crate::models::{ChatReply, ChatRequest, HealthStatus, HistoryEntry, SessionHistory};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Scripted result for one `send_chat` call.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Reply(ChatReply),
    Fail { status: u16, detail: Option<String> },
}

#[derive(Clone)]
pub struct MockChatApi {
    outcomes: Arc<Mutex<Vec<MockOutcome>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
    history: Arc<Mutex<HashMap<String, Vec<HistoryEntry>>>>,
}

impl MockChatApi {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            history: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_response(self, text: &str) -> Self {
        self.with_outcome(MockOutcome::Reply(ChatReply::Response(text.to_string())))
    }

    pub fn with_failure(self, status: u16, detail: Option<&str>) -> Self {
        self.with_outcome(MockOutcome::Fail {
            status,
            detail: detail.map(str::to_string),
        })
    }

    pub fn with_outcome(self, outcome: MockOutcome) -> Self {
        self.outcomes.lock().unwrap().push(outcome);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockChatApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatApi for MockChatApi {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let count = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len()
        };

        let outcome = {
            let outcomes = self.outcomes.lock().unwrap();
            if outcomes.is_empty() {
                // Same shape the backend uses when it has no provider configured
                MockOutcome::Reply(ChatReply::Response(format!("Echo: {}", request.message)))
            } else {
                outcomes[(count - 1) % outcomes.len()].clone()
            }
        };

        match outcome {
            MockOutcome::Reply(reply) => {
                let mut history = self.history.lock().unwrap();
                history
                    .entry(request.session_id.clone())
                    .or_default()
                    .push(HistoryEntry {
                        timestamp: chrono::Utc::now().naive_utc().to_string(),
                        mode: request.mode,
                        message: request.message.clone(),
                        response: reply.as_str().to_string(),
                    });
                Ok(reply)
            }
            MockOutcome::Fail { status, detail } => Err(Error::Api { status, detail }),
        }
    }

    async fn health(&self) -> Result<HealthStatus> {
        Ok(HealthStatus {
            status: "ok".to_string(),
        })
    }

    async fn session_history(&self, session_id: &str) -> Result<SessionHistory> {
        let known = self
            .requests
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.session_id == session_id);
        if !known {
            return Err(Error::Api {
                status: 404,
                detail: Some("Session not found".to_string()),
            });
        }

        let history = self
            .history
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .unwrap_or_default();

        Ok(SessionHistory {
            session_id: session_id.to_string(),
            history,
        })
    }
}
