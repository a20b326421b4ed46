//! Chatdeck host
//!
//! Runs a short conversation against the simulated backend and writes the
//! resulting chat as JSON and PDF. Each command-line argument is sent as one
//! message; without arguments a single demo prompt is used.

use chatdeck::catalog::{self, Preset};
use chatdeck::platform::{DirectorySink, MemoryClipboard};
use chatdeck::{ExportFormat, Session, SessionConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_PROMPT: &str = "Give me three ideas for a weekend project in Rust.";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatdeck=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = SessionConfig::from_env()?;
    tracing::info!(
        typing_ms = %config.typing_delay.as_millis(),
        generation_ms = %config.generation_delay.as_millis(),
        export_dir = %config.export_dir.display(),
        preset = config.preset.map_or("default", Preset::name),
        "Configuration loaded"
    );
    for (category, templates) in catalog::templates_by_category() {
        let ids: Vec<&str> = templates.iter().map(|t| t.id).collect();
        tracing::debug!(category, templates = ?ids, "Templates available");
    }

    let session = Session::from_config(&config, Arc::new(MemoryClipboard::new()));

    let mut prompts: Vec<String> = std::env::args().skip(1).collect();
    if prompts.is_empty() {
        prompts.push(session.compose_with_template("brainstorming", DEMO_PROMPT)?);
    }

    session.new_chat(None).await?;

    for prompt in &prompts {
        let reply = session.send_message(prompt).await?;
        tracing::info!(reply_id = %reply.id, chars = reply.content.len(), "Reply received");
    }

    let sink = DirectorySink::new(&config.export_dir);
    for format in [ExportFormat::Json, ExportFormat::Pdf] {
        let receipt = session.export_active(format, &sink).await?;
        println!("{}", receipt.location);
    }

    Ok(())
}
