//! Welcome banner display for chat sessions.

use console::style;

use theseus_types::gpu::VramStats;

use crate::cli::status::vram_bar;

/// Print the welcome banner at the start of a chat session.
///
/// Shows the active model, session identifier, and current VRAM usage,
/// with a hint about slash commands.
pub fn print_welcome_banner(model: &str, session_id: &str, vram: &VramStats) {
    println!();
    println!("  {} {}", "*", style("Theseus").cyan().bold());
    println!();
    println!("  {}    {}", style("Model:").bold(), style(model).dim());
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(session_id).dim()
    );
    println!(
        "  {}     {} {} / {} MB",
        style("VRAM:").bold(),
        vram_bar(vram),
        vram.used_mb,
        vram.total_mb
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
