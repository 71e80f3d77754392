//! `theseus sessions` -- list saved sessions.

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Table};
use console::style;

use theseus_core::session::SessionStore;

use crate::state::AppState;

/// Print all saved sessions, most recent first.
pub async fn list_sessions(state: &AppState, json: bool) -> anyhow::Result<()> {
    let sessions = state.orchestrator.store().list_sessions().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!();
        println!(
            "  {} No sessions yet. Run {} to start one.",
            style("*").dim(),
            style("theseus chat").cyan()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Session", "Label", "Messages"]);
    for session in &sessions {
        table.add_row(vec![
            Cell::new(session.id.as_str()),
            Cell::new(session.display_label()),
            Cell::new(session.message_count),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {}",
        style(format!("{} sessions", sessions.len())).dim()
    );
    println!();
    Ok(())
}
