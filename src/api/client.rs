use super::ChatApi;
use crate::models::{ChatReply, ChatRequest, ErrorBody, HealthStatus, SessionHistory};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde_json::Value;

/// HTTP implementation of [`ChatApi`].
///
/// No client-side timeout is configured: a request runs until the transport
/// settles it.
pub struct HttpChatApi {
    client: Client,
    base_url: String,
}

impl HttpChatApi {
    pub fn new(base_url: String) -> Self {
        Self::new_with_client(base_url, Client::new())
    }

    pub fn new_with_client(base_url: String, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json(&self, response: Response) -> Result<Value> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<Value>(&body)
                .map(|value| ErrorBody::from_body(&value))
                .unwrap_or_default()
                .detail;
            tracing::error!("Backend error (status {}): {}", status, body);
            return Err(Error::Api {
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse backend response: {}\nBody: {}", e, body);
            Error::MalformedResponse(format!("Failed to parse backend response: {}", e))
        })
    }

    /// `{base}/session/{id}` with the id percent-encoded as one path segment.
    fn session_url(&self, session_id: &str) -> Result<Url> {
        let invalid = |reason: String| {
            Error::Config(format!("Invalid API base URL {}: {}", self.base_url, reason))
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .push("session")
            .push(session_id);
        Ok(url)
    }

    async fn get(&self, url: String) -> Result<Value> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!("Failed to send request to {}: {}", url, e);
            e
        })?;

        self.read_json(response).await
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = self.url("/chat");
        tracing::debug!(
            "POST {} (mode: {}, session: {})",
            url,
            request.mode,
            request.session_id
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send chat request: {}", e);
                e
            })?;

        let body = self.read_json(response).await?;

        if let Some(echoed) = body.get("session_id").and_then(Value::as_str) {
            if echoed != request.session_id {
                tracing::warn!(
                    "Backend answered for session {} but {} was sent",
                    echoed,
                    request.session_id
                );
            }
        }

        Ok(ChatReply::from_body(&body))
    }

    async fn health(&self) -> Result<HealthStatus> {
        let body = self.get(self.url("/health")).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn session_history(&self, session_id: &str) -> Result<SessionHistory> {
        let url = self.session_url(session_id)?;
        let body = self.get(url.to_string()).await?;
        Ok(serde_json::from_value(body)?)
    }
}
