//! Data models and structures
//!
//! Defines the submission mode, the wire payloads exchanged with the chat
//! backend, and the configuration consumed at startup.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Chat,
    Image,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Chat => "chat",
            Mode::Image => "image",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Mode::Chat => "Ask something...",
            Mode::Image => "Describe an image...",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chat" => Ok(Mode::Chat),
            "image" => Ok(Mode::Image),
            other => Err(format!("Invalid mode '{}'. Expected 'chat' or 'image'", other)),
        }
    }
}

// Backend API Request/Response models
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub mode: Mode,
    pub session_id: String,
}

/// Value extracted from a successful `/chat` body.
///
/// The backend may answer with either a `response` or a `message` field.
/// `response` wins; a field that is missing, null, not a string, or empty
/// falls through to the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    Response(String),
    Message(String),
    Empty,
}

impl ChatReply {
    pub fn from_body(body: &Value) -> Self {
        if let Some(text) = non_empty_str(body, "response") {
            ChatReply::Response(text.to_string())
        } else if let Some(text) = non_empty_str(body, "message") {
            ChatReply::Message(text.to_string())
        } else {
            ChatReply::Empty
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChatReply::Response(text) | ChatReply::Message(text) => text,
            ChatReply::Empty => "",
        }
    }

    pub fn into_string(self) -> String {
        match self {
            ChatReply::Response(text) | ChatReply::Message(text) => text,
            ChatReply::Empty => String::new(),
        }
    }
}

/// Failure body returned with a non-2xx status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBody {
    pub detail: Option<String>,
}

impl ErrorBody {
    /// Reads `detail` as a plain string, or as a list of validation errors
    /// (`[{"msg": ...}, ...]`) whose messages are joined with `; `.
    pub fn from_body(body: &Value) -> Self {
        let detail = match body.get("detail") {
            Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
            Some(Value::Array(items)) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            _ => None,
        };

        Self { detail }
    }
}

fn non_empty_str<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub mode: Mode,
    pub message: String,
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionHistory {
    pub session_id: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

// Configuration
pub const DEVELOPMENT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_PRODUCTION_API_BASE_URL: &str = "https://vizzy-backend.railway.app";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    /// Debug builds talk to a local backend, release builds to production.
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            BuildMode::Development
        } else {
            BuildMode::Production
        }
    }

    /// Resolve the API base URL for this build mode.
    ///
    /// Development always uses the local backend. Production uses the
    /// configured URL when one is set and non-blank, else the fixed fallback.
    pub fn api_base_url(&self, configured: Option<&str>) -> String {
        let url = match self {
            BuildMode::Development => DEVELOPMENT_API_BASE_URL,
            BuildMode::Production => configured
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .unwrap_or(DEFAULT_PRODUCTION_API_BASE_URL),
        };
        url.trim_end_matches('/').to_string()
    }
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(BuildMode::Development),
            "production" | "prod" => Ok(BuildMode::Production),
            other => Err(format!(
                "Invalid environment '{}'. Expected 'development' or 'production'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub build_mode: BuildMode,
    pub api_base_url: Option<String>,
    pub image_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let build_mode = match lookup("VIZZY_ENV") {
            Some(value) => value.parse().map_err(Error::Config)?,
            None => BuildMode::current(),
        };

        Ok(Self {
            build_mode,
            api_base_url: lookup("VIZZY_API_BASE_URL"),
            image_dir: lookup("VIZZY_IMAGE_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn resolved_api_base_url(&self) -> String {
        self.build_mode.api_base_url(self.api_base_url.as_deref())
    }
}
