//! Similarity search over the document store.
//!
//! `Retriever` is the seam the answer pipeline depends on: given a query and a
//! result count it returns documents in relevance order. The order is trusted
//! verbatim downstream.

use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::{SearchResult, VectorStore};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

/// A document returned by a similarity search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedDocument {
    /// Text content passed to the model.
    pub content: String,
    /// Where the content came from, if known.
    pub source: Option<String>,
    /// Similarity score reported by the store.
    pub score: f32,
}

impl RetrievedDocument {
    /// A document with content only.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: None,
            score: 0.0,
        }
    }
}

impl From<SearchResult> for RetrievedDocument {
    fn from(result: SearchResult) -> Self {
        Self {
            content: result.document.content,
            source: Some(result.document.source),
            score: result.score,
        }
    }
}

/// Trait for similarity search.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return up to `k` documents relevant to `query`, most relevant first.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedDocument>>;
}

/// Retriever backed by an embedder and a vector store.
pub struct VectorRetriever {
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    min_score: f32,
}

impl VectorRetriever {
    /// Create a new retriever.
    pub fn new(vector_store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            vector_store,
            embedder,
            min_score: f32::MIN,
        }
    }

    /// Set the minimum similarity score threshold.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }
}

#[async_trait]
impl Retriever for VectorRetriever {
    #[instrument(skip(self), fields(k = k))]
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedDocument>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;

        let results = self
            .vector_store
            .search_with_threshold(&query_embedding, k, self.min_score)
            .await?;

        debug!("Retrieved {} documents", results.len());
        Ok(results.into_iter().map(RetrievedDocument::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::{Document, MemoryVectorStore};

    /// Embeds by keyword presence so tests need no network.
    struct KeywordEmbedder;

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![
                if text.contains("exam") { 1.0 } else { 0.0 },
                if text.contains("visa") { 1.0 } else { 0.0 },
                0.1,
            ])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }

        fn model(&self) -> &str {
            "keyword"
        }
    }

    #[tokio::test]
    async fn test_vector_retriever_ranks_by_similarity() {
        let store = Arc::new(MemoryVectorStore::new());
        let embedder = Arc::new(KeywordEmbedder);

        for (i, text) in ["visa renewal steps", "final exam schedule", "campus map"]
            .iter()
            .enumerate()
        {
            let embedding = embedder.embed(text).await.unwrap();
            store
                .upsert(&Document::new(
                    "faq.txt".into(),
                    "faq".into(),
                    text.to_string(),
                    embedding,
                    i as i32,
                ))
                .await
                .unwrap();
        }

        let retriever = VectorRetriever::new(store, embedder);
        let docs = retriever.search("when is the exam", 2).await.unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].content, "final exam schedule");
        assert_eq!(docs[0].source.as_deref(), Some("faq.txt"));
        assert!(docs[0].score >= docs[1].score);

        assert!(retriever.search("anything", 0).await.unwrap().is_empty());
    }
}
