//! Interactive terminal session driving a [`ChatClient`].

use crate::api::HttpChatApi;
use crate::client::ChatClient;
use crate::media::ImageSaver;
use crate::models::{Config, Mode};
use crate::render::{SUBTITLE, TITLE};
use crate::state::{ClientState, Submission};
use crate::Result;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

const HELP: &str = "\
Type a prompt and press enter to send it.
  /chat      switch to chat mode
  /image     switch to image generation mode
  /mode      show the current mode
  /history   show this session's history from the backend
  /health    check the backend
  /session   show the session id
  /help      show this help
  /quit      exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit(String),
    SetMode(Mode),
    ShowMode,
    History,
    Health,
    Session,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if !trimmed.starts_with('/') {
            return Command::Submit(line.to_string());
        }

        match trimmed {
            "/chat" => Command::SetMode(Mode::Chat),
            "/image" => Command::SetMode(Mode::Image),
            "/mode" => Command::ShowMode,
            "/history" => Command::History,
            "/health" => Command::Health,
            "/session" => Command::Session,
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

pub struct App {
    client: ChatClient,
    image_saver: Option<ImageSaver>,
}

impl App {
    /// Build an app around an existing client, e.g. one backed by a mock API.
    pub fn with_client(client: ChatClient, image_dir: Option<PathBuf>) -> Self {
        let image_saver = image_dir.map(|dir| ImageSaver::new(dir, client.state().session_id()));
        Self {
            client,
            image_saver,
        }
    }

    /// Construct an app talking HTTP to the backend `config` resolves to.
    pub fn new(config: &Config, mode: Mode) -> Self {
        let state = ClientState::initialize(config.build_mode, config.api_base_url.as_deref());
        info!(
            "Using backend {} ({:?}), session {}",
            state.api_base_url(),
            config.build_mode,
            state.session_id()
        );

        let api = HttpChatApi::new(state.api_base_url().to_string());
        let mut client = ChatClient::new(Box::new(api), state);
        client.set_mode(mode);

        Self::with_client(client, config.image_dir.clone())
    }

    pub fn client(&self) -> &ChatClient {
        &self.client
    }

    /// Read lines until `/quit` or end of input.
    pub async fn run<R, W>(&mut self, reader: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "{} | {}", TITLE, SUBTITLE)?;
        writeln!(out, "Type /help for commands.")?;

        let mut lines = reader.lines();
        loop {
            let mode = self.client.state().mode();
            write!(out, "{} ({})> ", mode, mode.placeholder())?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                break;
            };

            match Command::parse(&line) {
                Command::Submit(text) => {
                    self.submit_prompt(&text, out).await?;
                }
                Command::SetMode(mode) => {
                    self.client.set_mode(mode);
                    writeln!(out, "{}", self.client.view())?;
                }
                Command::ShowMode => writeln!(out, "Mode: {}", self.client.state().mode())?,
                Command::History => self.print_history(out).await?,
                Command::Health => match self.client.health().await {
                    Ok(health) => writeln!(out, "Backend status: {}", health.status)?,
                    Err(e) => {
                        warn!("Health check failed: {}", e);
                        writeln!(out, "Error: {}", e.user_message())?
                    }
                },
                Command::Session => {
                    writeln!(out, "Session ID: {}", self.client.state().session_id())?
                }
                Command::Help => writeln!(out, "{}", HELP)?,
                Command::Quit => break,
                Command::Unknown(command) => {
                    writeln!(out, "Unknown command {}. Type /help for commands.", command)?
                }
            }
        }

        info!("Session {} ended", self.client.state().session_id());
        Ok(())
    }

    /// Submit `text` in the current mode and print the resulting view.
    pub async fn submit_prompt<W: Write>(&mut self, text: &str, out: &mut W) -> Result<Submission> {
        self.client.set_input(text);
        if !self.client.state().can_submit() {
            return Ok(Submission::Skipped);
        }

        writeln!(out, "Processing...")?;
        let submission = self.client.submit().await;

        if submission == Submission::Succeeded && self.client.state().mode() == Mode::Image {
            if let Some(saver) = self.image_saver.as_mut() {
                match saver.save(self.client.state().output()) {
                    Ok(Some(path)) => writeln!(out, "Saved image to {}", path.display())?,
                    Ok(None) => {}
                    Err(e) => {
                        warn!("Could not save image: {}", e);
                        writeln!(out, "Could not save image: {}", e)?;
                    }
                }
            }
        }

        writeln!(out, "{}", self.client.view())?;
        Ok(submission)
    }

    async fn print_history<W: Write>(&self, out: &mut W) -> Result<()> {
        match self.client.history().await {
            Ok(history) if history.history.is_empty() => {
                writeln!(out, "No history for {}", history.session_id)?
            }
            Ok(history) => {
                for entry in &history.history {
                    writeln!(
                        out,
                        "{} [{}] {} => {}",
                        entry.timestamp,
                        entry.mode,
                        entry.message,
                        crate::media::describe_image(&entry.response)
                    )?;
                }
            }
            Err(e) => {
                warn!("Could not load history: {}", e);
                writeln!(out, "Error: {}", e.user_message())?
            }
        }
        Ok(())
    }
}
