#![forbid(unsafe_code)]

use super::{DOCUMENT_NAME, DocumentStore, decode_document, encode_document};
use crate::StoreError;
use dash_core::model::Category;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Same JSON document, kept as one row of an embedded SQLite database.
#[derive(Debug)]
pub struct SqliteDocumentStore {
    storage_dir: PathBuf,
    conn: Connection,
}

impl SqliteDocumentStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;
        let db_path = storage_dir.join("dashboard.db");
        let conn = Connection::open(db_path)?;
        let store = Self { storage_dir, conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;

            CREATE TABLE IF NOT EXISTS documents (
              name TEXT PRIMARY KEY,
              body TEXT NOT NULL,
              updated_at_ms INTEGER NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Raw stored text, or `None` before the first save.
    pub fn raw_document(&self) -> Result<Option<String>, StoreError> {
        let body = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE name = ?1",
                params![DOCUMENT_NAME],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(body)
    }
}

fn now_ms() -> i64 {
    let ms = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    i64::try_from(ms).unwrap_or(i64::MAX)
}

impl DocumentStore for SqliteDocumentStore {
    fn load(&self) -> Result<Vec<Category>, StoreError> {
        let Some(body) = self.raw_document()? else {
            tracing::debug!("document row missing, starting empty");
            return Ok(Vec::new());
        };
        let categories = decode_document(&body)?;
        tracing::debug!(categories = categories.len(), "document loaded");
        Ok(categories)
    }

    fn save(&mut self, categories: &[Category]) -> Result<(), StoreError> {
        let body = encode_document(categories)?;
        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO documents (name, body, updated_at_ms) VALUES (?1, ?2, ?3)
            ON CONFLICT(name) DO UPDATE SET
              body = excluded.body,
              updated_at_ms = excluded.updated_at_ms
            "#,
            params![DOCUMENT_NAME, body, now_ms()],
        )?;
        tx.commit()?;
        tracing::debug!(
            categories = categories.len(),
            bytes = body.len(),
            "document saved"
        );
        Ok(())
    }
}
