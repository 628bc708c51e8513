//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::rag::ConversationStore;
use anyhow::Result;
use std::sync::Arc;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    profile: Option<String>,
    model: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'ragdesk doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    let pipeline = orchestrator.answer_pipeline(
        profile.as_deref(),
        model.as_deref(),
        Arc::new(ConversationStore::new()),
    )?;

    let spinner = Output::spinner("Searching knowledge base...");

    match pipeline.answer(question).await {
        Ok(answer) => {
            spinner.finish_and_clear();

            println!("\n{}\n", answer.response);

            if !answer.documents.is_empty() {
                Output::header("Sources");
                for doc in &answer.documents {
                    Output::document(doc.source.as_deref(), doc.score, &doc.content);
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
