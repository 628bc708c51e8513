//! Transcribe command: run a local audio file through speech-to-text.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::path::Path;

/// Run the transcribe command.
pub async fn run_transcribe(file: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Transcribe, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'ragdesk doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let path = Settings::expand_path(file);
    let audio = tokio::fs::read(&path).await?;
    let hint = filename_hint(&path, &settings.transcription.filename_hint);

    let orchestrator = Orchestrator::new(settings)?;
    let transcriber = orchestrator.transcriber()?;
    let normalizer = orchestrator.normalizer();

    let spinner = Output::spinner(&format!("Transcribing {}...", path.display()));
    let result = transcriber.transcribe(audio, &hint).await;
    spinner.finish_and_clear();

    match result {
        Ok(text) => {
            println!("{}", normalizer.normalize(&text));
        }
        Err(e) => {
            Output::error(&format!("Transcription failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

/// Use the file's own name so the API can detect its codec.
fn filename_hint(path: &Path, fallback: &str) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|n| Path::new(n).extension().is_some())
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_hint() {
        assert_eq!(filename_hint(Path::new("/tmp/q.mp3"), "transcript.wav"), "q.mp3");
        assert_eq!(
            filename_hint(Path::new("/tmp/recording"), "transcript.wav"),
            "transcript.wav"
        );
    }
}
