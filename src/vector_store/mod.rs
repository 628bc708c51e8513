//! Vector store abstraction for Ragdesk.
//!
//! Provides a trait-based interface for different vector database backends.
//! Similarity is plain cosine over stored embeddings; ranking is whatever the
//! backend returns and callers treat that order as final.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chunk of text stored in the vector database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID.
    pub id: Uuid,
    /// Where the chunk came from (usually a file path).
    pub source: String,
    /// Human-readable title of the source.
    pub title: String,
    /// Text content of this chunk.
    pub content: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// Order of this chunk within its source.
    pub chunk_order: i32,
    /// When this document was indexed.
    pub indexed_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document.
    pub fn new(
        source: String,
        title: String,
        content: String,
        embedding: Vec<f32>,
        chunk_order: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            title,
            content,
            embedding,
            chunk_order,
            indexed_at: Utc::now(),
        }
    }
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched document.
    pub document: Document,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Summary information about an indexed source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedSource {
    pub source: String,
    pub title: String,
    /// Number of indexed chunks.
    pub chunk_count: u32,
    /// When the source was last indexed.
    pub indexed_at: DateTime<Utc>,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Store a document with its embedding.
    async fn upsert(&self, doc: &Document) -> Result<()>;

    /// Bulk upsert documents.
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize>;

    /// Search for similar documents.
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>>;

    /// Search with a minimum similarity threshold.
    async fn search_with_threshold(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>>;

    /// Delete documents by source.
    async fn delete_by_source(&self, source: &str) -> Result<usize>;

    /// List all indexed sources, most recently indexed first.
    async fn list_sources(&self) -> Result<Vec<IndexedSource>>;

    /// Check if a source is indexed.
    async fn is_source_indexed(&self, source: &str) -> Result<bool>;

    /// Get all documents for a source, in chunk order.
    async fn get_by_source(&self, source: &str) -> Result<Vec<Document>>;

    /// Get total document count.
    async fn document_count(&self) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Score, filter and rank documents against a query embedding.
pub(crate) fn rank(
    docs: impl IntoIterator<Item = Document>,
    query_embedding: &[f32],
    limit: usize,
    min_score: f32,
) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = docs
        .into_iter()
        .map(|doc| {
            let score = cosine_similarity(query_embedding, &doc.embedding);
            SearchResult { document: doc, score }
        })
        .filter(|r| r.score >= min_score)
        .collect();

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(limit);
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);

        assert_eq!(cosine_similarity(&a, &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_rank_orders_filters_and_truncates() {
        let docs = vec![
            Document::new("a.txt".into(), "a".into(), "far".into(), vec![0.0, 1.0], 0),
            Document::new("a.txt".into(), "a".into(), "near".into(), vec![1.0, 0.1], 1),
            Document::new("a.txt".into(), "a".into(), "exact".into(), vec![1.0, 0.0], 2),
        ];

        let results = rank(docs, &[1.0, 0.0], 5, 0.5);
        let contents: Vec<_> = results.iter().map(|r| r.document.content.as_str()).collect();
        assert_eq!(contents, vec!["exact", "near"]);

        let docs = vec![
            Document::new("b.txt".into(), "b".into(), "one".into(), vec![1.0, 0.0], 0),
            Document::new("b.txt".into(), "b".into(), "two".into(), vec![1.0, 0.2], 1),
        ];
        assert_eq!(rank(docs, &[1.0, 0.0], 1, 0.0).len(), 1);
    }
}
