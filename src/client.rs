//! The chat/image client: state plus the backend it submits to.

use crate::api::ChatApi;
use crate::models::{HealthStatus, Mode, SessionHistory};
use crate::render::View;
use crate::state::{ClientState, Submission};
use crate::Result;
use tracing::{debug, error, info, warn};

pub struct ChatClient {
    api: Box<dyn ChatApi>,
    state: ClientState,
}

impl ChatClient {
    pub fn new(api: Box<dyn ChatApi>, state: ClientState) -> Self {
        Self { api, state }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.state.set_mode(mode);
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.state.set_input(input);
    }

    /// Send the current input in the current mode.
    ///
    /// Exactly one request per non-skipped call. Failures end up in the
    /// state's error message and are never returned. Dropping the future
    /// before it settles clears the loading flag and keeps everything else.
    pub async fn submit(&mut self) -> Submission {
        let Some(request) = self.state.begin_submission() else {
            debug!("Nothing to submit");
            return Submission::Skipped;
        };

        info!(
            "Submitting {} request ({} chars)",
            request.mode,
            request.message.len()
        );

        let mut in_flight = InFlight {
            state: &mut self.state,
        };
        let result = self.api.send_chat(&request).await;
        if let Err(e) = &result {
            error!("Request failed: {}", e);
        }

        in_flight.state.settle(result)
    }

    pub fn view(&self) -> View<'_> {
        View::from_state(&self.state)
    }

    pub async fn history(&self) -> Result<SessionHistory> {
        self.api.session_history(self.state.session_id()).await
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.api.health().await
    }
}

/// Clears the loading flag if a submission is dropped before it settles.
struct InFlight<'a> {
    state: &'a mut ClientState,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.state.is_loading() {
            warn!("Submission dropped before the backend answered");
            self.state.abandon_submission();
        }
    }
}
