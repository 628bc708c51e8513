//! Ragdesk - Retrieval-Augmented Q&A Desk
//!
//! A web chat desk that answers questions over an indexed document collection
//! and accepts spoken questions through speech-to-text.
//!
//! # Overview
//!
//! Ragdesk allows you to:
//! - Index text and markdown documents into a local vector store
//! - Answer questions grounded in the most relevant documents
//! - Keep a shared conversation history that later answers can build on
//! - Transcribe recorded audio into text
//! - Normalize answers and transcripts to Traditional Chinese
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Settings and prompt profiles
//! - `chunking` - Splitting documents for indexing
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector database abstraction
//! - `retrieval` - Top-k similarity search over the store
//! - `completion` - Chat completion
//! - `transcription` - Speech-to-text
//! - `normalize` - Script normalization
//! - `rag` - Context assembly, post-processing, history and the answer pipeline
//! - `server` - HTTP surface and chat page
//! - `orchestrator` - Wiring and ingestion
//!
//! # Example
//!
//! ```rust,no_run
//! use ragdesk::config::Settings;
//! use ragdesk::orchestrator::Orchestrator;
//! use ragdesk::rag::ConversationStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let pipeline = orchestrator.answer_pipeline(None, None, Arc::new(ConversationStore::new()))?;
//!     let answer = pipeline.answer("怎麼申請成績單？").await?;
//!     println!("{}", answer.response);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod completion;
pub mod config;
pub mod embedding;
pub mod error;
pub mod normalize;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod retrieval;
pub mod server;
pub mod transcription;
pub mod vector_store;

#[cfg(test)]
mod testing;

pub use error::{RagdeskError, Result};
