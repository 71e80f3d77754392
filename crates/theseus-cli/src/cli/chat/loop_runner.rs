//! Main chat loop orchestration.
//!
//! Coordinates the conversation lifecycle: session boot (resume the most
//! recent session or create one), welcome banner, input loop with streaming
//! responses, slash commands, context attach/detach, and model switching.

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use console::style;
use tracing::{info, warn};

use theseus_core::chat::TurnError;
use theseus_core::context::ContextExtractor;
use theseus_core::session::{boot, SessionState, SessionStore};
use theseus_infra::gpu::probe_vram;
use theseus_types::chat::{MessageRole, SessionId};
use theseus_types::context::{ContextBlob, Upload, UploadKind};
use theseus_types::llm::ModelProfile;

use crate::cli::status::vram_bar;
use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

/// Context attached via `/attach`, kept until `/detach` or exit.
struct AttachedContext {
    blob: ContextBlob,
    name: String,
}

/// Run the interactive chat loop.
pub async fn run_chat_loop(
    state: &AppState,
    resume: Option<String>,
    model_override: Option<String>,
) -> anyhow::Result<()> {
    let mut model = select_model(state, model_override);

    // Non-fatal: the user may start Ollama after launching the chat.
    if let Err(err) = state
        .orchestrator
        .backend()
        .check_availability(&model.name)
        .await
    {
        eprintln!("\n  {} {err}", style("!").yellow().bold());
    }

    // Boot policy: an explicit --session wins; otherwise resume the most
    // recent session or create a fresh one.
    let mut session = match resume {
        Some(raw) => {
            let id: SessionId = raw.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let messages = state.orchestrator.store().load_session(&id).await?;
            SessionState { id, messages }
        }
        None => boot(state.orchestrator.store()).await?,
    };

    let vram = probe_vram().await;
    print_welcome_banner(&model.name, session.id.as_str(), &vram);

    let renderer = ChatRenderer::new();
    replay_history(&renderer, &session);

    let mut context: Option<AttachedContext> = None;

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session saved.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!(
                    "\n  {}",
                    style("Press Ctrl+D to exit, or keep chatting.").dim()
                );
                continue;
            }
            InputEvent::Message(text) => {
                if text.is_empty() {
                    continue;
                }

                if let Some(cmd) = commands::parse(&text) {
                    match cmd {
                        ChatCommand::Help => commands::print_help(),
                        ChatCommand::Clear => chat_input.clear(),
                        ChatCommand::Exit => {
                            println!("\n  {}", style("Session saved.").dim());
                            break;
                        }
                        ChatCommand::New => match state.orchestrator.store().create_session().await
                        {
                            Ok(id) => {
                                println!(
                                    "\n  {} New session {}\n",
                                    style("*").cyan().bold(),
                                    style(id.as_str()).dim()
                                );
                                session = SessionState::new(id);
                            }
                            Err(err) => {
                                eprintln!("\n  {} {err}\n", style("!").red().bold());
                            }
                        },
                        ChatCommand::Sessions => {
                            print_sessions_inline(state, &session.id).await;
                        }
                        ChatCommand::Load(raw) => {
                            switch_session(state, &renderer, &mut session, &raw).await;
                        }
                        ChatCommand::Model(name) => match state.config.find_model(&name) {
                            Some(profile) => {
                                println!(
                                    "\n  {} Engine switched to {}\n",
                                    style("*").cyan().bold(),
                                    style(&profile.name).dim()
                                );
                                model = profile;
                            }
                            None => {
                                println!(
                                    "\n  {} Unknown model '{}'. Configured: {}\n",
                                    style("?").yellow().bold(),
                                    name,
                                    state
                                        .config
                                        .models
                                        .iter()
                                        .map(|m| m.name.as_str())
                                        .collect::<Vec<_>>()
                                        .join(", ")
                                );
                            }
                        },
                        ChatCommand::Attach(path) => {
                            context = attach_context(state, &model, &path).await.or(context);
                        }
                        ChatCommand::Detach => {
                            match context.take() {
                                Some(attached) => println!(
                                    "\n  {} Dropped context {}\n",
                                    style("*").cyan().bold(),
                                    style(&attached.name).dim()
                                ),
                                None => println!(
                                    "\n  {} No context attached.\n",
                                    style("?").yellow().bold()
                                ),
                            }
                        }
                        ChatCommand::Status => {
                            print_status_inline(&session, &model, context.as_ref()).await;
                        }
                        ChatCommand::Unknown(cmd_name) => {
                            println!(
                                "\n  {} Unknown command: {}. Type /help for available commands.\n",
                                style("?").yellow().bold(),
                                style(cmd_name).dim()
                            );
                        }
                    }
                    continue;
                }

                run_turn(state, &renderer, &mut session, &model, context.as_ref(), &text).await;
            }
        }
    }

    Ok(())
}

/// Resolve the active model from an override or the config default.
fn select_model(state: &AppState, model_override: Option<String>) -> ModelProfile {
    match model_override {
        Some(name) => state.config.find_model(&name).unwrap_or_else(|| {
            warn!(model = %name, "model not in configured table");
            eprintln!(
                "\n  {} Model '{}' is not in the configured table; assuming text-only.",
                style("!").yellow().bold(),
                name
            );
            ModelProfile::text(name)
        }),
        None => state.config.default_model(),
    }
}

/// Print the loaded transcript when resuming a session.
fn replay_history(renderer: &ChatRenderer, session: &SessionState) {
    for msg in &session.messages {
        match msg.role {
            MessageRole::User => {
                println!("  {} {}", style("You >").green().bold(), msg.content);
            }
            MessageRole::Assistant => {
                print!("\n  {} ", style("Theseus").cyan().bold());
                println!("{}", renderer.render_final(&msg.content).trim_end());
            }
            MessageRole::System => {}
        }
        println!();
    }
}

/// One user turn: spinner, streaming render, stats footer, error display.
async fn run_turn(
    state: &AppState,
    renderer: &ChatRenderer,
    session: &mut SessionState,
    model: &ModelProfile,
    context: Option<&AttachedContext>,
    text: &str,
) {
    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(
        indicatif::ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let start = Instant::now();
    let mut first_token = false;

    let result = state
        .orchestrator
        .submit_turn(session, text, context.map(|c| &c.blob), model, |delta| {
            if !first_token {
                spinner.finish_and_clear();
                first_token = true;
                print!("\n  {} ", style("Theseus").cyan().bold());
                let _ = std::io::stdout().flush();
            }
            renderer.print_streaming_token(delta);
        })
        .await;

    match result {
        Ok(outcome) => {
            if !first_token {
                spinner.finish_and_clear();
            }
            let response_ms = start.elapsed().as_millis() as u64;
            println!();
            renderer.print_stats_footer(
                outcome.usage.map(|u| u.output_tokens),
                response_ms,
                &model.name,
            );
            println!();
        }
        Err(TurnError::Backend(err)) => {
            spinner.finish_and_clear();
            eprintln!("\n  {} {err}", style("!").red().bold());
            eprintln!(
                "  {}",
                style("Your message was saved; try again or /exit.").dim()
            );
        }
        Err(TurnError::Store(err)) => {
            spinner.finish_and_clear();
            eprintln!("\n  {} {err}", style("!").red().bold());
        }
    }
}

/// Read and extract an upload; returns the attached context on success.
async fn attach_context(
    state: &AppState,
    model: &ModelProfile,
    path: &Path,
) -> Option<AttachedContext> {
    let kind = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(UploadKind::from_extension);
    let Some(kind) = kind else {
        println!(
            "\n  {} Unsupported file type (expected pdf, jpg, or png).\n",
            style("?").yellow().bold()
        );
        return None;
    };

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            println!(
                "\n  {} Could not read {}: {err}\n",
                style("!").red().bold(),
                path.display()
            );
            return None;
        }
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match state
        .extractor
        .extract(Upload {
            name: name.clone(),
            kind,
            bytes,
        })
        .await
    {
        Ok(report) => {
            if report.used_ocr() {
                println!(
                    "\n  {} Scan detected -- OCR engaged. {}",
                    style("!").yellow().bold(),
                    style(&report.detail).dim()
                );
            } else {
                println!(
                    "\n  {} Context ready: {}",
                    style("*").green().bold(),
                    style(&report.detail).dim()
                );
            }
            if matches!(report.blob, ContextBlob::Image(_)) && !model.supports_images() {
                println!(
                    "  {} {} is text-only; switch with /model to use the image.",
                    style("!").yellow().bold(),
                    model.name
                );
            }
            println!();
            Some(AttachedContext {
                blob: report.blob,
                name,
            })
        }
        Err(err) => {
            warn!(error = %err, upload = %name, "context extraction failed");
            println!(
                "\n  {} {err} -- continuing without context.\n",
                style("!").yellow().bold()
            );
            None
        }
    }
}

/// Compact in-chat session listing; the active session is marked.
async fn print_sessions_inline(state: &AppState, current: &SessionId) {
    match state.orchestrator.store().list_sessions().await {
        Ok(sessions) => {
            println!();
            for session in &sessions {
                let marker = if session.id == *current { ">" } else { " " };
                println!(
                    "  {} {}  {}",
                    style(marker).cyan().bold(),
                    style(session.id.as_str()).dim(),
                    session.display_label()
                );
            }
            println!();
        }
        Err(err) => {
            eprintln!("\n  {} {err}\n", style("!").red().bold());
        }
    }
}

/// Switch the active session by identifier.
async fn switch_session(
    state: &AppState,
    renderer: &ChatRenderer,
    session: &mut SessionState,
    raw: &str,
) {
    let id: SessionId = match raw.parse() {
        Ok(id) => id,
        Err(err) => {
            println!("\n  {} {err}\n", style("?").yellow().bold());
            return;
        }
    };

    match state.orchestrator.store().load_session(&id).await {
        Ok(messages) => {
            info!(session = %id, "session loaded");
            println!(
                "\n  {} Switched to {}\n",
                style("*").cyan().bold(),
                style(id.as_str()).dim()
            );
            *session = SessionState { id, messages };
            replay_history(renderer, session);
        }
        Err(err) => {
            println!("\n  {} {err}\n", style("!").red().bold());
        }
    }
}

/// In-chat status: session, model, context, VRAM.
async fn print_status_inline(
    session: &SessionState,
    model: &ModelProfile,
    context: Option<&AttachedContext>,
) {
    let vram = probe_vram().await;
    println!();
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(session.id.as_str()).dim()
    );
    println!(
        "  {} {}",
        style("Messages:").bold(),
        style(session.messages.len()).dim()
    );
    println!(
        "  {}    {} ({})",
        style("Model:").bold(),
        style(&model.name).dim(),
        model.kind
    );
    match context {
        Some(attached) => println!(
            "  {}  {}",
            style("Context:").bold(),
            style(&attached.name).dim()
        ),
        None => println!("  {}  {}", style("Context:").bold(), style("none").dim()),
    }
    println!(
        "  {}     {} {} / {} MB",
        style("VRAM:").bold(),
        vram_bar(&vram),
        vram.used_mb,
        vram.total_mb
    );
    println!();
}
