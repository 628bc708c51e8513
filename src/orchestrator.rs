//! Wiring for Ragdesk.
//!
//! Builds the collaborators from settings, hands out the answer pipeline, and
//! coordinates document ingestion (read → chunk → embed → store).

use crate::chunking::TextChunker;
use crate::completion::{Completer, OpenAICompleter};
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{RagdeskError, Result};
use crate::normalize::{self, Normalizer};
use crate::rag::{AnswerPipeline, AnswerProfile, ConversationStore};
use crate::retrieval::{Retriever, VectorRetriever};
use crate::transcription::{Transcriber, WhisperTranscriber};
use crate::vector_store::{Document, MemoryVectorStore, SqliteVectorStore, VectorStore};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// File extensions picked up when ingesting a directory.
const INGEST_EXTENSIONS: &[&str] = &["txt", "md", "markdown"];

/// Outcome of ingesting a single file.
#[derive(Debug, Clone)]
pub struct IngestResult {
    pub source: String,
    pub chunks_indexed: usize,
    /// True when the file was already indexed and left alone.
    pub skipped: bool,
}

/// Owns the long-lived collaborators.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
}

impl Orchestrator {
    /// Create an orchestrator from settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let embedder: Arc<dyn Embedder> = Arc::new(OpenAIEmbedder::from_settings(
            &settings.embedding,
            &settings.openai,
        )?);

        let vector_store: Arc<dyn VectorStore> = match settings.vector_store.provider.as_str() {
            "sqlite" => Arc::new(SqliteVectorStore::new(&settings.sqlite_path())?),
            "memory" => Arc::new(MemoryVectorStore::new()),
            other => {
                return Err(RagdeskError::Config(format!(
                    "Unknown vector store provider: {}",
                    other
                )))
            }
        };

        Ok(Self::with_components(settings, prompts, embedder, vector_store))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            settings,
            prompts,
            embedder,
            vector_store,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get a reference to the vector store.
    pub fn vector_store(&self) -> Arc<dyn VectorStore> {
        self.vector_store.clone()
    }

    /// Get a reference to the embedder.
    pub fn embedder(&self) -> Arc<dyn Embedder> {
        self.embedder.clone()
    }

    /// Retriever over the configured store.
    pub fn retriever(&self) -> Arc<dyn Retriever> {
        Arc::new(
            VectorRetriever::new(self.vector_store(), self.embedder())
                .with_min_score(self.settings.retrieval.min_score),
        )
    }

    /// Normalizer for the configured script target.
    pub fn normalizer(&self) -> Arc<dyn Normalizer> {
        normalize::for_target(self.settings.normalize.script)
    }

    /// Whisper transcriber from settings.
    pub fn transcriber(&self) -> Result<Arc<dyn Transcriber>> {
        Ok(Arc::new(WhisperTranscriber::from_settings(
            &self.settings.transcription,
            &self.settings.openai,
        )?))
    }

    /// Resolve a profile by name, falling back to the configured one.
    pub fn profile(&self, name: Option<&str>) -> Result<AnswerProfile> {
        let name = name.unwrap_or(&self.settings.rag.profile);
        AnswerProfile::resolve(name, &self.prompts, &self.settings.rag)
    }

    /// Build an answer pipeline.
    ///
    /// `profile` and `model` override the configured values.
    pub fn answer_pipeline(
        &self,
        profile: Option<&str>,
        model: Option<&str>,
        history: Arc<ConversationStore>,
    ) -> Result<AnswerPipeline> {
        let mut completer =
            OpenAICompleter::from_settings(&self.settings.completion, &self.settings.openai)?;
        if let Some(model) = model {
            completer = completer.with_model(model);
        }
        let completer: Arc<dyn Completer> = Arc::new(completer);

        Ok(AnswerPipeline::new(
            self.retriever(),
            completer,
            self.normalizer(),
            history,
            self.profile(profile)?,
        ))
    }

    /// Ingest a file or every text file under a directory.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn ingest_path(&self, path: &Path, force: bool) -> Result<Vec<IngestResult>> {
        let files = collect_files(path)?;
        if files.is_empty() {
            return Err(RagdeskError::InvalidInput(format!(
                "No ingestible files ({}) found at {}",
                INGEST_EXTENSIONS.join(", "),
                path.display()
            )));
        }

        info!("Ingesting {} file(s)", files.len());

        let concurrency = self.settings.ingest.max_concurrent.max(1);
        let results: Vec<Result<IngestResult>> = stream::iter(files)
            .map(|file| async move { self.ingest_file(&file, force).await })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let mut results = results.into_iter().collect::<Result<Vec<_>>>()?;
        results.sort_by(|a, b| a.source.cmp(&b.source));
        Ok(results)
    }

    /// Ingest a single text file.
    #[instrument(skip(self), fields(file = %file.display()))]
    pub async fn ingest_file(&self, file: &Path, force: bool) -> Result<IngestResult> {
        let source = file.display().to_string();

        let already_indexed = self.vector_store.is_source_indexed(&source).await?;
        if already_indexed && !force {
            info!("Already indexed, skipping");
            return Ok(IngestResult {
                source,
                chunks_indexed: 0,
                skipped: true,
            });
        }

        let text = tokio::fs::read_to_string(file).await?;
        let chunker = TextChunker::new(
            self.settings.ingest.chunk_chars,
            self.settings.ingest.overlap_chars,
        );
        let chunks = chunker.chunk(&text);

        if chunks.is_empty() {
            warn!("File has no text content");
            return Ok(IngestResult {
                source,
                chunks_indexed: 0,
                skipped: false,
            });
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let title = file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();

        let documents: Vec<Document> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| {
                Document::new(source.clone(), title.clone(), chunk.content, embedding, chunk.order)
            })
            .collect();

        // Replace stale chunks only once the new ones are ready
        if already_indexed {
            let removed = self.vector_store.delete_by_source(&source).await?;
            info!("Re-indexing, removed {} stale chunks", removed);
        }

        let count = self.vector_store.upsert_batch(&documents).await?;
        info!("Indexed {} chunks", count);

        Ok(IngestResult {
            source,
            chunks_indexed: count,
            skipped: false,
        })
    }
}

fn is_ingestible(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| INGEST_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}

/// Collect ingestible files under `path`, sorted for stable ordering.
fn collect_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(RagdeskError::InvalidInput(format!(
            "Path not found: {}",
            path.display()
        )));
    }

    let mut files = Vec::new();
    let mut pending = vec![path.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let entry_path = entry?.path();
            if entry_path.is_dir() {
                pending.push(entry_path);
            } else if is_ingestible(&entry_path) {
                files.push(entry_path);
            }
        }
    }
    files.sort();
    Ok(files)
}
