//! CLI module - command parsing and dispatch
//!
//! All CLI logic lives here. `main.rs` calls `cli::run()`.

pub mod ask;
pub mod config;
pub mod skills;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

use skillrelay::skills::DispatchMode;

#[derive(Parser)]
#[command(name = "skillrelay")]
#[command(version)]
#[command(about = "Agent task execution and skill routing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one message through the executor and print the answer
    Ask {
        /// Message text (multiple words become one text part each)
        #[arg(required = true)]
        text: Vec<String>,
        /// Style hint: uppercase, lowercase, snake_case
        #[arg(long)]
        style: Option<String>,
        /// Conversation identifier to record the message under
        #[arg(long)]
        context_id: Option<String>,
        /// Override the configured dispatch mode (routed, styled, unified)
        #[arg(long)]
        mode: Option<DispatchMode>,
        /// Print every event as a JSON line instead of the final text
        #[arg(long)]
        stream: bool,
    },
    /// List the skills a dispatch mode can reach
    Skills {
        /// Dispatch mode (defaults to the configured one)
        #[arg(long)]
        mode: Option<DispatchMode>,
    },
    /// Configuration utilities
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Validate the configuration file and effective values
    Check,
}

/// Entry point for the CLI, called from main().
pub async fn run() -> Result<()> {
    // A missing .env is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load config early so we can respect the logging settings; fall back to
    // defaults if the config file is missing or unreadable. `config check`
    // reports the load error itself.
    let logging_cfg = skillrelay::config::Config::load()
        .map(|c| c.logging)
        .unwrap_or_default();
    skillrelay::utils::logging::init_logging(&logging_cfg)?;

    match cli.command {
        None => {
            let mut cmd = Cli::command();
            cmd.print_help()?;
            println!();
        }
        Some(Commands::Ask {
            text,
            style,
            context_id,
            mode,
            stream,
        }) => {
            ask::cmd_ask(text, style, context_id, mode, stream).await?;
        }
        Some(Commands::Skills { mode }) => {
            skills::cmd_skills(mode)?;
        }
        Some(Commands::Config { action }) => {
            config::cmd_config(action).await?;
        }
        Some(Commands::Version) => {
            cmd_version();
        }
    }

    Ok(())
}

/// Display version information
fn cmd_version() {
    println!("skillrelay {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Agent task execution and skill routing");
}
