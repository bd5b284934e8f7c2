//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod say;


use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::cli::say::run_say;
use crate::core::config::data::path_display;
use crate::core::config::{Config, Overrides, Settings};
use crate::core::constants::ENDPOINT_ENV_VAR;
use crate::ui::chat_loop::run_chat;
use crate::utils::diagnostics;
use crate::utils::logging::TranscriptLog;

#[derive(Parser)]
#[command(name = "sidechat")]
#[command(about = "A terminal chat widget backed by a single chat endpoint")]
#[command(
    long_about = "Sidechat shows a chat button in the corner of your terminal. Open it to get \
a side panel where each message is sent to one backend chat endpoint and the reply is \
shown underneath.\n\n\
Environment Variables:\n\
  SIDECHAT_ENDPOINT  Chat endpoint URL (overrides the config file)\n\
  SIDECHAT_LOG       File that receives diagnostic traces (filter with RUST_LOG)\n\n\
Controls:\n\
  Ctrl+O            Open or close the chat panel\n\
  Esc               Close the chat panel\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a newline\n\
  Up/Down/PgUp/PgDn Scroll through the conversation\n\
  Ctrl+L            Pause or resume the transcript log\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Chat endpoint URL for this session
    #[arg(short = 'e', long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Append the conversation to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Use an alternate config file
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send one message without the TUI and print the exchange
    Say {
        /// The message to send
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key (can be multiple words for title)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Print the stored configuration and the effective settings
    Config,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    diagnostics::init()?;
    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => Config::get_config_path()?,
    };
    let overrides = Overrides {
        endpoint: args.endpoint,
        log_file: args.log,
    };
    debug!(config = %path_display(&config_path), "loading configuration");

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let settings = resolve_settings(&config_path, &overrides)?;
            let transcript = TranscriptLog::new(settings.log_file.clone())?;
            run_chat(settings, transcript).await
        }
        Commands::Say { prompt } => {
            let settings = resolve_settings(&config_path, &overrides)?;
            let transcript = TranscriptLog::new(settings.log_file.clone())?;
            run_say(prompt, &settings, transcript).await
        }
        Commands::Set { key, value } => {
            let mut config = Config::load_from_path(&config_path)?;
            let value = value.join(" ");
            config.set_key(&key, &value)?;
            config.save_to_path(&config_path)?;
            println!("✅ Set {key} to: {value}");
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load_from_path(&config_path)?;
            config.unset_key(&key)?;
            config.save_to_path(&config_path)?;
            println!("✅ Unset {key}");
            Ok(())
        }
        Commands::Config => {
            let config = Config::load_from_path(&config_path)?;
            println!("Config file: {}", path_display(&config_path));
            config.print_all();
            println!();
            config
                .resolve(&overrides, std::env::var(ENDPOINT_ENV_VAR).ok())?
                .print_all();
            Ok(())
        }
    }
}

fn resolve_settings(
    config_path: &std::path::Path,
    overrides: &Overrides,
) -> Result<Settings, Box<dyn Error>> {
    let config = Config::load_from_path(config_path)?;
    let settings = config.resolve(overrides, std::env::var(ENDPOINT_ENV_VAR).ok())?;
    Ok(settings)
}
