//! Backend API integration
//!
//! The chat backend is consumed purely over HTTP. [`ChatApi`] is the seam the
//! client talks through so tests can swap in [`MockChatApi`].

pub mod client;
pub mod mock;

pub use client::HttpChatApi;
pub use mock::{MockChatApi, MockOutcome};

use crate::models::{ChatReply, ChatRequest, HealthStatus, SessionHistory};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ChatApi: Send + Sync {
    /// POST a submission to `/chat`.
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply>;
    async fn health(&self) -> Result<HealthStatus>;
    async fn session_history(&self, session_id: &str) -> Result<SessionHistory>;
}
