//! Terminal rendering of the client state.

use crate::media;
use crate::models::Mode;
use crate::state::ClientState;
use std::fmt;

pub const TITLE: &str = "Vizzy Chat";
pub const SUBTITLE: &str = "AI Chat & Image Generation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputView<'a> {
    Text(&'a str),
    Image(&'a str),
}

/// Everything the page shows, derived from [`ClientState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View<'a> {
    pub mode: Mode,
    pub placeholder: &'static str,
    pub input: &'a str,
    pub controls_disabled: bool,
    pub submit_label: &'static str,
    pub error: Option<&'a str>,
    pub output: Option<OutputView<'a>>,
    pub session_id: &'a str,
}

impl<'a> View<'a> {
    pub fn from_state(state: &'a ClientState) -> Self {
        let output = match (state.output(), state.mode()) {
            ("", _) => None,
            (output, Mode::Image) => Some(OutputView::Image(output)),
            (output, Mode::Chat) => Some(OutputView::Text(output)),
        };

        Self {
            mode: state.mode(),
            placeholder: state.mode().placeholder(),
            input: state.input(),
            controls_disabled: state.is_loading(),
            submit_label: if state.is_loading() {
                "Processing..."
            } else {
                "Send"
            },
            error: Some(state.error()).filter(|e| !e.is_empty()),
            output,
            session_id: state.session_id(),
        }
    }
}

impl fmt::Display for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = self.error {
            writeln!(f, "Error: {}", error)?;
        }

        match self.output {
            Some(OutputView::Text(text)) => writeln!(f, "{}", text)?,
            Some(OutputView::Image(reference)) => {
                writeln!(f, "Image: {}", media::describe_image(reference))?
            }
            None => {}
        }

        write!(f, "[{}] Session ID: {}", self.mode, self.session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatReply;
    use crate::Error;

    fn state() -> ClientState {
        ClientState::with_session(
            "http://localhost:8000".to_string(),
            "session-1".to_string(),
        )
    }

    fn succeed(state: &mut ClientState, text: &str) {
        state.set_input("prompt");
        state.begin_submission().unwrap();
        state.settle(Ok(ChatReply::Response(text.to_string())));
    }

    #[test]
    fn test_initial_view() {
        let state = state();
        let view = View::from_state(&state);

        assert_eq!(view.output, None);
        assert_eq!(view.error, None);
        assert_eq!(view.placeholder, "Ask something...");
        assert_eq!(view.submit_label, "Send");
        assert!(!view.controls_disabled);
        assert_eq!(view.to_string(), "[chat] Session ID: session-1");
    }

    #[test]
    fn test_output_rendered_by_current_mode() {
        let mut state = state();
        succeed(&mut state, "https://via.placeholder.com/500x500?text=cat");

        assert_eq!(
            View::from_state(&state).output,
            Some(OutputView::Text("https://via.placeholder.com/500x500?text=cat"))
        );

        state.set_mode(Mode::Image);
        let view = View::from_state(&state);
        assert_eq!(
            view.output,
            Some(OutputView::Image("https://via.placeholder.com/500x500?text=cat"))
        );
        assert_eq!(view.placeholder, "Describe an image...");
        assert!(view
            .to_string()
            .starts_with("Image: https://via.placeholder.com/500x500?text=cat\n"));
    }

    #[test]
    fn test_error_shown_alongside_stale_output() {
        let mut state = state();
        succeed(&mut state, "Hello");

        state.set_input("again");
        state.begin_submission().unwrap();
        state.settle(Err(Error::Api {
            status: 429,
            detail: Some("Rate limited".to_string()),
        }));

        let view = View::from_state(&state);
        assert_eq!(view.error, Some("Rate limited"));
        assert_eq!(view.output, Some(OutputView::Text("Hello")));
        assert_eq!(
            view.to_string(),
            "Error: Rate limited\nHello\n[chat] Session ID: session-1"
        );
    }

    #[test]
    fn test_controls_disabled_while_loading() {
        let mut state = state();
        state.set_input("hello");
        state.begin_submission().unwrap();

        let view = View::from_state(&state);
        assert!(view.controls_disabled);
        assert_eq!(view.submit_label, "Processing...");
    }
}
