//! Ingest command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ingest command.
pub async fn run_ingest(path: &str, force: bool, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ingest, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'ragdesk doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    let path = Settings::expand_path(path);

    let spinner = Output::spinner(&format!("Indexing {}...", path.display()));
    let results = orchestrator.ingest_path(&path, force).await;
    spinner.finish_and_clear();

    let results = match results {
        Ok(results) => results,
        Err(e) => {
            Output::error(&format!("Ingestion failed: {}", e));
            return Err(e.into());
        }
    };

    let mut indexed = 0;
    let mut skipped = 0;
    for result in &results {
        if result.skipped {
            skipped += 1;
            Output::info(&format!("{} (already indexed, use --force)", result.source));
        } else {
            indexed += result.chunks_indexed;
            Output::success(&format!(
                "{} ({} chunks)",
                result.source, result.chunks_indexed
            ));
        }
    }

    println!();
    Output::kv("Files", &results.len().to_string());
    Output::kv("Chunks indexed", &indexed.to_string());
    if skipped > 0 {
        Output::kv("Skipped", &skipped.to_string());
    }

    Ok(())
}
