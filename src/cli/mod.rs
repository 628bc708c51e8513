//! CLI module for Ragdesk.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Ragdesk - retrieval-augmented Q&A desk with voice input
///
/// Indexes office documents, answers questions over them through a web chat
/// page or the terminal, and transcribes spoken questions.
#[derive(Parser, Debug)]
#[command(name = "ragdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "RAGDESK_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Ragdesk and verify configuration
    Init,

    /// Check system requirements and configuration
    Doctor,

    /// Start the web chat server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Answer profile (registrar, global_affairs)
        #[arg(long)]
        profile: Option<String>,
    },

    /// Index a text/markdown file or a directory of them
    Ingest {
        /// File or directory to index
        path: String,

        /// Re-index sources that are already indexed
        #[arg(short, long)]
        force: bool,
    },

    /// Ask a single question
    Ask {
        /// The question to ask
        question: String,

        /// Answer profile (registrar, global_affairs)
        #[arg(long)]
        profile: Option<String>,

        /// LLM model to use for response generation
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Start an interactive chat session
    Chat {
        /// Answer profile (registrar, global_affairs)
        #[arg(long)]
        profile: Option<String>,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Transcribe an audio file
    Transcribe {
        /// Path to the audio file
        file: String,
    },

    /// List indexed sources
    List,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["ragdesk", "-vv", "serve", "--port", "8080"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Serve { host, port, profile } => {
                assert!(host.is_none());
                assert_eq!(port, Some(8080));
                assert!(profile.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_ask_with_profile() {
        let cli =
            Cli::try_parse_from(["ragdesk", "ask", "選課時間?", "--profile", "global_affairs"])
                .unwrap();
        match cli.command {
            Commands::Ask { question, profile, model } => {
                assert_eq!(question, "選課時間?");
                assert_eq!(profile.as_deref(), Some("global_affairs"));
                assert!(model.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
