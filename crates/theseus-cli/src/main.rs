//! Theseus CLI entry point.
//!
//! Binary name: `theseus`
//!
//! Parses CLI arguments, initializes the session store and backend, then
//! dispatches to the interactive chat loop or one of the listing commands.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,theseus=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Shell completions don't need app state
    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "theseus", &mut std::io::stdout());
        return Ok(());
    }

    // Initialize application state (config, store, backend)
    let state = AppState::init().await?;

    match cli.command.unwrap_or(Commands::Chat {
        session: None,
        model: None,
    }) {
        Commands::Chat { session, model } => {
            cli::chat::run_chat_loop(&state, session, model).await?;
        }

        Commands::Sessions => {
            cli::sessions::list_sessions(&state, cli.json).await?;
        }

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
