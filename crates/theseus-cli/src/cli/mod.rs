//! CLI command definitions for the `theseus` binary.
//!
//! Uses clap derive macros. Running with no subcommand starts the
//! interactive chat loop.

pub mod chat;
pub mod sessions;
pub mod status;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Local-model chat with persistent sessions.
#[derive(Parser)]
#[command(name = "theseus", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session (the default).
    Chat {
        /// Resume a specific session by ID instead of the most recent.
        #[arg(long)]
        session: Option<String>,

        /// Model to chat with (must appear in the configured model table).
        #[arg(long, short = 'm')]
        model: Option<String>,
    },

    /// List saved sessions, most recent first.
    #[command(alias = "ls")]
    Sessions,

    /// Show data directory, backend, and GPU status.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
