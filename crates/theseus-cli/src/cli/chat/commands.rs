//! Slash command parsing and help text for the chat loop.
//!
//! Commands start with `/` and provide in-chat controls for session
//! switching, model selection, and context uploads.

use std::path::PathBuf;

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat session.
    Exit,
    /// Start a new session.
    New,
    /// List saved sessions.
    Sessions,
    /// Switch to a saved session by ID.
    Load(String),
    /// Switch the active model by name.
    Model(String),
    /// Attach a PDF or image as context for following turns.
    Attach(PathBuf),
    /// Drop the attached context.
    Detach,
    /// Show session, model, context, and VRAM status.
    Status,
    /// Unknown command or missing argument.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let arg = parts.get(1).map(|s| s.trim().to_string());

    let requires_arg = |name: &str, arg: Option<String>, build: fn(String) -> ChatCommand| {
        match arg {
            Some(value) if !value.is_empty() => Some(build(value)),
            _ => Some(ChatCommand::Unknown(format!("{name} requires an argument"))),
        }
    };

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/new" => Some(ChatCommand::New),
        "/sessions" | "/ls" => Some(ChatCommand::Sessions),
        "/load" => requires_arg("/load", arg, ChatCommand::Load),
        "/model" => requires_arg("/model", arg, ChatCommand::Model),
        "/attach" => requires_arg("/attach", arg, |path| ChatCommand::Attach(PathBuf::from(path))),
        "/detach" => Some(ChatCommand::Detach),
        "/status" => Some(ChatCommand::Status),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}      {}", style("/help").cyan(), "Show this help message");
    println!("  {}       {}", style("/new").cyan(), "Start a new session");
    println!("  {}  {}", style("/sessions").cyan(), "List saved sessions");
    println!("  {} {}", style("/load <id>").cyan(), "Switch to a saved session");
    println!("  {} {}", style("/model <m>").cyan(), "Switch the active model");
    println!("  {} {}", style("/attach <f>").cyan(), "Attach a PDF or image as context");
    println!("  {}    {}", style("/detach").cyan(), "Drop the attached context");
    println!("  {}    {}", style("/status").cyan(), "Show session and GPU status");
    println!("  {}     {}", style("/clear").cyan(), "Clear the screen");
    println!("  {}      {}", style("/exit").cyan(), "End the chat session");
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}
