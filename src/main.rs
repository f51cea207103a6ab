use anyhow::{Context, Result, bail};
use chatbox::config::Config;
use chatbox::ui::{ChatApp, ChatDocument};
use chatbox::{ChatWidget, HttpChatApi, SubmitOutcome, logging};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "chatbox")]
#[command(version)]
#[command(about = "Chat with a backend from the terminal", long_about = None)]
struct Cli {
    /// Chat endpoint URL (overrides config and CHATBOX_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive chat (default)
    Tui,
    /// Send one message and print the reply
    Send {
        message: String,
        /// Print the rendered history markup instead of the reply text
        #[arg(long)]
        html: bool,
    },
    /// Print the effective configuration
    Config,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(endpoint) = &cli.endpoint {
        config.set_endpoint(endpoint.clone());
    }
    Ok(config)
}

fn build_widget(config: &Config) -> ChatWidget<HttpChatApi> {
    ChatWidget::new(
        HttpChatApi::new(config.endpoint.clone()),
        ChatDocument::new(config.ui.welcome()),
    )
}

async fn run_tui(config: Config) -> Result<()> {
    logging::init_file(&config.log_path())?;
    info!(endpoint = %config.endpoint, "starting chatbox");

    let widget = build_widget(&config);
    ChatApp::new(widget, config.ui).run().await
}

async fn run_send(config: Config, message: &str, html: bool) -> Result<()> {
    logging::init_stderr()?;

    let widget = build_widget(&config);
    let outcome = widget.submit(message).await;

    let document = widget.document();
    if html {
        println!("{}", document.history_html());
    } else if let Some(row) = document.history().last() {
        println!("{}", row.entry().content());
    }

    match outcome {
        SubmitOutcome::Skipped(reason) => bail!("Nothing sent: {reason:?}"),
        outcome if outcome.is_failure() => bail!("Chat request failed: {outcome:?}"),
        _ => Ok(()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        None | Some(Commands::Tui) => run_tui(config).await,
        Some(Commands::Send { message, html }) => run_send(config, &message, html).await,
        Some(Commands::Config) => {
            let content = toml::to_string_pretty(&config).context("Failed to serialize config")?;
            println!("# {}", config.config_path().display());
            print!("{content}");
            Ok(())
        }
    }
}
