//! Serve command: start the web chat server.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::rag::ConversationStore;
use crate::server::{self, AppState};
use anyhow::Result;
use std::sync::Arc;

/// Run the HTTP server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    profile: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Serve, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'ragdesk doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);

    let orchestrator = Orchestrator::new(settings.clone())?;
    let history = Arc::new(ConversationStore::new());
    let pipeline = orchestrator.answer_pipeline(profile.as_deref(), None, history)?;
    let profile_name = pipeline.profile().name.clone();
    let indexed = orchestrator.vector_store().document_count().await?;

    let state = AppState::new(
        pipeline,
        orchestrator.transcriber()?,
        orchestrator.normalizer(),
    )
    .with_audio_filename(&settings.transcription.filename_hint)
    .with_max_upload_bytes(settings.server.max_upload_bytes);

    Output::header("Ragdesk Server");
    println!();
    Output::success(&format!("Chat page at http://{}", addr));
    Output::kv("Profile", &profile_name);
    Output::kv("Model", &settings.completion.model);
    Output::kv("Indexed chunks", &indexed.to_string());
    if indexed == 0 {
        Output::warning("Nothing indexed yet. Use 'ragdesk ingest <path>' to add documents.");
    }
    println!();
    println!("Endpoints:");
    Output::kv("Chat page", "GET  /");
    Output::kv("Ask", "POST /get_response");
    Output::kv("Transcribe", "POST /upload-audio");
    Output::kv("Reset history", "POST /reset");
    Output::kv("Health", "GET  /health");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    server::serve(&addr, Arc::new(state)).await?;

    Ok(())
}
