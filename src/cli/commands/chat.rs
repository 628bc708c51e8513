//! Interactive chat over the answer pipeline.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::rag::ConversationStore;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

/// What the REPL should do with a line of input.
#[derive(Debug, PartialEq)]
enum ChatInput<'a> {
    Skip,
    Exit,
    Clear,
    Question(&'a str),
}

fn classify(line: &str) -> ChatInput<'_> {
    let line = line.trim();
    if line.is_empty() {
        ChatInput::Skip
    } else if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        ChatInput::Exit
    } else if line.eq_ignore_ascii_case("clear") {
        ChatInput::Clear
    } else {
        ChatInput::Question(line)
    }
}

/// Run the interactive chat command.
pub async fn run_chat(
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
    let history = Arc::new(ConversationStore::new());
    let pipeline =
        orchestrator.answer_pipeline(profile.as_deref(), model.as_deref(), history.clone())?;

    println!("\n{}", style("Ragdesk Chat").bold().cyan());
    println!(
        "{}",
        style(format!("Profile: {}", pipeline.profile().name)).dim()
    );
    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit. Use 'clear' to reset conversation.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match classify(&line) {
            ChatInput::Skip => continue,
            ChatInput::Exit => {
                Output::info("Goodbye!");
                break;
            }
            ChatInput::Clear => {
                history.clear().await;
                Output::info("Conversation history cleared.");
            }
            ChatInput::Question(question) => match pipeline.answer(question).await {
                Ok(answer) => {
                    println!("\n{} {}\n", style("Ragdesk:").cyan().bold(), answer.response);
                }
                Err(e) => {
                    Output::error(&format!("Error: {}", e));
                }
            },
        }
    }

    Ok(())
}
