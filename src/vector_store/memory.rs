//! In-memory vector store implementation.
//!
//! Useful for testing and small datasets.

use super::{rank, Document, IndexedSource, SearchResult, VectorStore};
use crate::error::{RagdeskError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory vector store.
pub struct MemoryVectorStore {
    documents: RwLock<HashMap<String, Document>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Document>>> {
        self.documents
            .read()
            .map_err(|e| RagdeskError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Document>>> {
        self.documents
            .write()
            .map_err(|e| RagdeskError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert(&self, doc: &Document) -> Result<()> {
        self.write()?.insert(doc.id.to_string(), doc.clone());
        Ok(())
    }

    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize> {
        let mut store = self.write()?;
        for doc in docs {
            store.insert(doc.id.to_string(), doc.clone());
        }
        Ok(docs.len())
    }

    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        self.search_with_threshold(query_embedding, limit, f32::MIN).await
    }

    async fn search_with_threshold(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>> {
        let docs = self.read()?;
        Ok(rank(docs.values().cloned(), query_embedding, limit, min_score))
    }

    async fn delete_by_source(&self, source: &str) -> Result<usize> {
        let mut docs = self.write()?;
        let initial_len = docs.len();
        docs.retain(|_, doc| doc.source != source);
        Ok(initial_len - docs.len())
    }

    async fn list_sources(&self) -> Result<Vec<IndexedSource>> {
        let docs = self.read()?;

        let mut source_map: HashMap<String, IndexedSource> = HashMap::new();

        for doc in docs.values() {
            let entry = source_map
                .entry(doc.source.clone())
                .or_insert_with(|| IndexedSource {
                    source: doc.source.clone(),
                    title: doc.title.clone(),
                    chunk_count: 0,
                    indexed_at: doc.indexed_at,
                });

            entry.chunk_count += 1;
            if doc.indexed_at > entry.indexed_at {
                entry.indexed_at = doc.indexed_at;
            }
        }

        let mut sources: Vec<IndexedSource> = source_map.into_values().collect();
        sources.sort_by(|a, b| b.indexed_at.cmp(&a.indexed_at));

        Ok(sources)
    }

    async fn is_source_indexed(&self, source: &str) -> Result<bool> {
        Ok(self.read()?.values().any(|d| d.source == source))
    }

    async fn get_by_source(&self, source: &str) -> Result<Vec<Document>> {
        let docs = self.read()?;
        let mut result: Vec<Document> = docs
            .values()
            .filter(|d| d.source == source)
            .cloned()
            .collect();
        result.sort_by_key(|d| d.chunk_order);
        Ok(result)
    }

    async fn document_count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_vector_store() {
        let store = MemoryVectorStore::new();

        let doc1 = Document::new(
            "handbook.md".to_string(),
            "Handbook".to_string(),
            "Course withdrawal deadline".to_string(),
            vec![1.0, 0.0, 0.0],
            0,
        );

        let doc2 = Document::new(
            "handbook.md".to_string(),
            "Handbook".to_string(),
            "Transcript requests".to_string(),
            vec![0.0, 1.0, 0.0],
            1,
        );

        store.upsert_batch(&[doc2, doc1]).await.unwrap();

        assert_eq!(store.document_count().await.unwrap(), 2);

        let results = store.search(&[1.0, 0.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].score > results[1].score);
        assert_eq!(results[0].document.content, "Course withdrawal deadline");

        let sources = store.list_sources().await.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].chunk_count, 2);

        let chunks = store.get_by_source("handbook.md").await.unwrap();
        assert_eq!(chunks[0].chunk_order, 0);

        assert_eq!(store.delete_by_source("handbook.md").await.unwrap(), 2);
        assert!(!store.is_source_indexed("handbook.md").await.unwrap());
    }
}
