//! Client UI state and its transitions
//!
//! All state the page used to keep in component hooks lives in one
//! [`ClientState`]. It is mutated only through mode/input edits and the two
//! halves of a submission: [`ClientState::begin_submission`] and
//! [`ClientState::settle`].

use crate::models::{BuildMode, ChatReply, ChatRequest, Mode};
use crate::Result;
use chrono::{DateTime, Utc};

/// `"session-" + unix millis`, generated once per client.
pub fn new_session_id(now: DateTime<Utc>) -> String {
    format!("session-{}", now.timestamp_millis())
}

/// How a call to submit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Blank input, or a request already in flight. Nothing was sent.
    Skipped,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientState {
    mode: Mode,
    input: String,
    output: String,
    loading: bool,
    error: String,
    session_id: String,
    api_base_url: String,
}

impl ClientState {
    /// Resolve the base URL for `build_mode` and stamp a fresh session id.
    pub fn initialize(build_mode: BuildMode, configured_base_url: Option<&str>) -> Self {
        Self::with_session(
            build_mode.api_base_url(configured_base_url),
            new_session_id(Utc::now()),
        )
    }

    pub fn with_session(api_base_url: String, session_id: String) -> Self {
        Self {
            mode: Mode::default(),
            input: String::new(),
            output: String::new(),
            loading: false,
            error: String::new(),
            session_id,
            api_base_url,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && !self.input.trim().is_empty()
    }

    /// Enter the submitting state and build the request to send.
    ///
    /// Returns `None` without touching any state when the input is blank or a
    /// request is already in flight.
    pub fn begin_submission(&mut self) -> Option<ChatRequest> {
        if !self.can_submit() {
            return None;
        }

        self.loading = true;
        self.error.clear();

        Some(ChatRequest {
            message: self.input.clone(),
            mode: self.mode,
            session_id: self.session_id.clone(),
        })
    }

    /// Leave the submitting state without a result, e.g. when the request
    /// was cancelled. Input, output and error are untouched.
    pub fn abandon_submission(&mut self) {
        self.loading = false;
    }

    /// Apply the settled request. Output is left alone on failure.
    pub fn settle(&mut self, result: Result<ChatReply>) -> Submission {
        let submission = match result {
            Ok(reply) => {
                self.output = reply.into_string();
                self.input.clear();
                Submission::Succeeded
            }
            Err(e) => {
                self.error = e.user_message();
                Submission::Failed
            }
        };

        self.loading = false;
        submission
    }
}
