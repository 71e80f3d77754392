//! `theseus status` -- runtime status dashboard.

use console::style;

use theseus_core::session::SessionStore;
use theseus_infra::gpu::probe_vram;
use theseus_types::gpu::VramStats;

use crate::state::AppState;

/// Width of the VRAM usage bar, in characters.
const VRAM_BAR_WIDTH: usize = 24;

/// Print data directory, backend reachability, session count, and VRAM.
pub async fn status(state: &AppState, json: bool) -> anyhow::Result<()> {
    let default_model = state.config.default_model();
    let backend_ok = state
        .orchestrator
        .backend()
        .check_availability(&default_model.name)
        .await;
    let sessions = state.orchestrator.store().list_sessions().await?;
    let vram = probe_vram().await;

    if json {
        let report = serde_json::json!({
            "data_dir": state.data_dir.display().to_string(),
            "base_url": state.config.base_url,
            "backend_ok": backend_ok.is_ok(),
            "backend_error": backend_ok.as_ref().err().map(|e| e.to_string()),
            "default_model": default_model.name,
            "session_count": sessions.len(),
            "vram_used_mb": vram.used_mb,
            "vram_total_mb": vram.total_mb,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let check_mark = |ok: bool| {
        if ok {
            format!("{}", style("ok").green())
        } else {
            format!("{}", style("unreachable").red())
        }
    };

    println!();
    println!("  {}", style("Theseus status").cyan().bold());
    println!();
    println!(
        "  {}  {}",
        style("Data dir:").bold(),
        style(state.data_dir.display()).dim()
    );
    println!(
        "  {}   {} ({})",
        style("Backend:").bold(),
        style(&state.config.base_url).dim(),
        check_mark(backend_ok.is_ok())
    );
    if let Err(err) = &backend_ok {
        println!("             {}", style(err).yellow());
    }
    println!(
        "  {}     {}",
        style("Model:").bold(),
        style(&default_model.name).dim()
    );
    println!(
        "  {}  {}",
        style("Sessions:").bold(),
        style(sessions.len()).dim()
    );
    println!(
        "  {}      {} {} / {} MB",
        style("VRAM:").bold(),
        vram_bar(&vram),
        vram.used_mb,
        vram.total_mb
    );
    println!();
    Ok(())
}

/// Render a fixed-width usage bar for VRAM.
pub fn vram_bar(vram: &VramStats) -> String {
    let filled = (vram.usage_ratio() * VRAM_BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(VRAM_BAR_WIDTH);
    format!(
        "[{}{}]",
        style("=".repeat(filled)).cyan(),
        " ".repeat(VRAM_BAR_WIDTH - filled)
    )
}
