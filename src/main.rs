use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vizzy_chat::app::App;
use vizzy_chat::models::{BuildMode, Config, Mode};
use vizzy_chat::state::Submission;

#[derive(Debug, Parser)]
#[command(name = "vizzy-chat")]
#[command(about = "Chat and generate images with the Vizzy backend")]
struct CliArgs {
    /// Build environment: development uses http://localhost:8000.
    #[arg(long = "env", value_name = "ENV")]
    build_mode: Option<BuildMode>,

    /// Backend base URL used in production.
    #[arg(long, value_name = "URL")]
    api_base_url: Option<String>,

    /// Initial mode (chat or image).
    #[arg(long, default_value = "chat")]
    mode: Mode,

    /// Directory where inline (data URL) images are written.
    #[arg(long, value_name = "DIR")]
    image_dir: Option<PathBuf>,

    /// Send a single prompt and exit instead of starting a session.
    #[arg(value_name = "PROMPT")]
    prompt: Option<String>,
}

impl CliArgs {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(build_mode) = self.build_mode {
            config.build_mode = build_mode;
        }
        if let Some(url) = &self.api_base_url {
            config.api_base_url = Some(url.clone());
        }
        if let Some(dir) = &self.image_dir {
            config.image_dir = Some(dir.clone());
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vizzy_chat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => args.apply(config),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut app = App::new(&config, args.mode);
    let mut stdout = std::io::stdout();

    match &args.prompt {
        Some(prompt) => match app.submit_prompt(prompt, &mut stdout).await? {
            Submission::Succeeded => Ok(()),
            Submission::Skipped => {
                error!("Prompt is empty");
                std::process::exit(1);
            }
            Submission::Failed => std::process::exit(1),
        },
        None => {
            info!("Starting interactive session");
            app.run(BufReader::new(tokio::io::stdin()), &mut stdout)
                .await?;
            Ok(())
        }
    }
}
