//! Init command - interactive first-run setup.

use crate::cli::Output;
use crate::config::{Prompts, Settings};
use console::style;
use std::io::{self, Write};

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Ragdesk Setup");
    println!();
    println!("Welcome to Ragdesk! Let's make sure everything is configured correctly.\n");

    // Step 1: API key
    println!("{}", style("Step 1: Checking API configuration").bold().cyan());
    println!();

    if !crate::openai::is_api_key_configured() {
        Output::warning("OPENAI_API_KEY is not set.");
        println!();
        println!("  Ragdesk needs an OpenAI API key for embeddings, answers and transcription.");
        println!(
            "  Get your API key from: {}",
            style("https://platform.openai.com/api-keys").underlined()
        );
        println!();
        println!("  Export it in your shell, or put it in a .env file next to where you run ragdesk:");
        println!("  {}", style("OPENAI_API_KEY=sk-...").green());
        println!();

        if !prompt_continue("Continue without API key?")? {
            println!();
            Output::info("Setup cancelled. Set your API key and run 'ragdesk init' again.");
            return Ok(());
        }
    } else {
        Output::success("OpenAI API key is configured!");
    }

    println!();

    // Step 2: Directories
    println!("{}", style("Step 2: Setting up directories").bold().cyan());
    println!();

    let data_dir = settings.data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        Output::success(&format!("Created data directory: {}", data_dir.display()));
    } else {
        Output::info(&format!("Data directory exists: {}", data_dir.display()));
    }

    println!();

    // Step 3: Config file
    println!("{}", style("Step 3: Configuration file").bold().cyan());
    println!();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else if prompt_continue("Create default configuration file?")? {
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
        println!();
        println!("  Edit your config with: {}", style("ragdesk config edit").green());
    } else {
        Output::info("Skipped config file creation. Using defaults.");
    }

    println!();
    Output::kv("Answer profiles", &Prompts::profile_names().join(", "));
    Output::kv("Active profile", &settings.rag.profile);

    println!();
    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} Check system status", style("ragdesk doctor").cyan());
    println!("  {} Index your documents", style("ragdesk ingest <dir>").cyan());
    println!("  {} Start the chat page", style("ragdesk serve").cyan());
    println!();
    println!("For more help: {}", style("ragdesk --help").cyan());

    Ok(())
}

/// Prompt user for yes/no confirmation.
fn prompt_continue(message: &str) -> io::Result<bool> {
    print!("{} ", style("?").cyan());
    print!("{} ", message);
    print!("{} ", style("[y/N]").dim());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("nope"));
    }
}
