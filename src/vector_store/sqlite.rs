//! SQLite-based vector store implementation.
//!
//! Embeddings are stored as little-endian `f32` blobs and scored with cosine
//! similarity in Rust. That is a full scan per query, which is fine for the
//! office-handbook sized corpora this service targets.

use super::{rank, Document, IndexedSource, SearchResult, VectorStore};
use crate::error::{RagdeskError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS documents (
        id TEXT PRIMARY KEY,
        source TEXT NOT NULL,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        embedding BLOB NOT NULL,
        chunk_order INTEGER NOT NULL,
        indexed_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_documents_source ON documents(source);
    CREATE INDEX IF NOT EXISTS idx_documents_indexed_at ON documents(indexed_at);
"#;

const UPSERT: &str = r#"
    INSERT OR REPLACE INTO documents
    (id, source, title, content, embedding, chunk_order, indexed_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

const SELECT_COLUMNS: &str =
    "SELECT id, source, title, content, embedding, chunk_order, indexed_at FROM documents";

/// SQLite-based vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Open (or create) a SQLite vector store at `path`.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite vector store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite vector store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RagdeskError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn parse_timestamp(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }

    fn row_to_document(row: &Row<'_>) -> rusqlite::Result<Document> {
        let id_str: String = row.get(0)?;
        let embedding_bytes: Vec<u8> = row.get(4)?;
        let indexed_at_str: String = row.get(6)?;

        Ok(Document {
            id: uuid::Uuid::parse_str(&id_str).unwrap_or_default(),
            source: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            embedding: Self::bytes_to_embedding(&embedding_bytes),
            chunk_order: row.get(5)?,
            indexed_at: Self::parse_timestamp(&indexed_at_str),
        })
    }

    fn row_to_source(row: &Row<'_>) -> rusqlite::Result<IndexedSource> {
        let indexed_at_str: String = row.get(3)?;
        Ok(IndexedSource {
            source: row.get(0)?,
            title: row.get(1)?,
            chunk_count: row.get(2)?,
            indexed_at: Self::parse_timestamp(&indexed_at_str),
        })
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, doc))]
    async fn upsert(&self, doc: &Document) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            UPSERT,
            params![
                doc.id.to_string(),
                doc.source,
                doc.title,
                doc.content,
                Self::embedding_to_bytes(&doc.embedding),
                doc.chunk_order,
                doc.indexed_at.to_rfc3339(),
            ],
        )?;

        debug!("Upserted document {}", doc.id);
        Ok(())
    }

    #[instrument(skip(self, docs))]
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;

        for doc in docs {
            tx.execute(
                UPSERT,
                params![
                    doc.id.to_string(),
                    doc.source,
                    doc.title,
                    doc.content,
                    Self::embedding_to_bytes(&doc.embedding),
                    doc.chunk_order,
                    doc.indexed_at.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        info!("Batch upserted {} documents", docs.len());
        Ok(docs.len())
    }

    #[instrument(skip(self, query_embedding))]
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        self.search_with_threshold(query_embedding, limit, f32::MIN).await
    }

    #[instrument(skip(self, query_embedding))]
    async fn search_with_threshold(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(SELECT_COLUMNS)?;

        let docs: Vec<Document> = stmt
            .query_map([], Self::row_to_document)?
            .filter_map(|d| d.ok())
            .collect();

        let results = rank(docs, query_embedding, limit, min_score);
        debug!("Found {} matching documents", results.len());
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn delete_by_source(&self, source: &str) -> Result<usize> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM documents WHERE source = ?1", params![source])?;

        info!("Deleted {} documents for {}", deleted, source);
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn list_sources(&self) -> Result<Vec<IndexedSource>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT source, MAX(title), COUNT(*) as chunk_count, MAX(indexed_at) as indexed_at
            FROM documents
            GROUP BY source
            ORDER BY indexed_at DESC
            "#,
        )?;

        let sources = stmt
            .query_map([], Self::row_to_source)?
            .filter_map(|s| s.ok())
            .collect();
        Ok(sources)
    }

    async fn is_source_indexed(&self, source: &str) -> Result<bool> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE source = ?1",
            params![source],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn get_by_source(&self, source: &str) -> Result<Vec<Document>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE source = ?1 ORDER BY chunk_order",
            SELECT_COLUMNS
        ))?;

        let result: Vec<Document> = stmt
            .query_map(params![source], Self::row_to_document)?
            .filter_map(|d| d.ok())
            .collect();
        debug!("Found {} documents for {}", result.len(), source);
        Ok(result)
    }

    async fn document_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_vector_store() {
        let store = SqliteVectorStore::in_memory().unwrap();

        let doc = Document::new(
            "docs/registration.md".to_string(),
            "registration".to_string(),
            "Add/drop runs through the second week.".to_string(),
            vec![1.0, 0.0, 0.0],
            0,
        );

        store.upsert(&doc).await.unwrap();

        let sources = store.list_sources().await.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].source, "docs/registration.md");
        assert_eq!(sources[0].chunk_count, 1);

        let results = store.search(&[1.0, 0.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!((results[0].score - 1.0).abs() < 0.001);
        assert_eq!(results[0].document.embedding, vec![1.0, 0.0, 0.0]);

        assert!(store.is_source_indexed("docs/registration.md").await.unwrap());

        let deleted = store.delete_by_source("docs/registration.md").await.unwrap();
        assert_eq!(deleted, 1);

        assert!(store.list_sources().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_threshold_and_chunk_order() {
        let store = SqliteVectorStore::in_memory().unwrap();
        let docs = vec![
            Document::new("a".into(), "A".into(), "second".into(), vec![0.0, 1.0], 1),
            Document::new("a".into(), "A".into(), "first".into(), vec![1.0, 0.0], 0),
        ];
        assert_eq!(store.upsert_batch(&docs).await.unwrap(), 2);

        let results = store
            .search_with_threshold(&[1.0, 0.0], 10, 0.5)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.content, "first");

        let ordered = store.get_by_source("a").await.unwrap();
        let contents: Vec<_> = ordered.iter().map(|d| d.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert_eq!(store.document_count().await.unwrap(), 2);
    }
}
