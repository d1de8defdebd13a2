#![forbid(unsafe_code)]

use super::{DOCUMENT_NAME, DocumentStore, decode_document, encode_document};
use crate::StoreError;
use dash_core::model::Category;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Keeps the collection as a pretty-printed JSON array in `<dir>/categories.json`.
#[derive(Debug)]
pub struct JsonFileStore {
    storage_dir: PathBuf,
    path: PathBuf,
}

impl JsonFileStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;
        let path = storage_dir.join(DOCUMENT_NAME);
        Ok(Self { storage_dir, path })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn document_path(&self) -> &Path {
        &self.path
    }

    /// Uniquely named scratch file in the storage directory, one per save.
    fn temp_file(&self) -> std::io::Result<NamedTempFile> {
        tempfile::Builder::new()
            .prefix(&format!(".{DOCUMENT_NAME}."))
            .suffix(".tmp")
            .tempfile_in(&self.storage_dir)
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Category>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "document missing, starting empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };
        let categories = decode_document(&raw)?;
        tracing::debug!(
            path = %self.path.display(),
            categories = categories.len(),
            "document loaded"
        );
        Ok(categories)
    }

    fn save(&mut self, categories: &[Category]) -> Result<(), StoreError> {
        let body = encode_document(categories)?;
        // Write-then-rename: readers see the old or the new document, never a torn one.
        // Dropping the temp file on an early return deletes it.
        let mut temp = self.temp_file()?;
        temp.write_all(body.as_bytes())?;
        temp.flush()?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|err| err.error)?;
        tracing::debug!(
            path = %self.path.display(),
            categories = categories.len(),
            bytes = body.len(),
            "document saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn category(id: &str) -> Category {
        Category {
            id: id.to_string(),
            name: id.to_uppercase(),
            description: Some("desc".to_string()),
            widgets: Vec::new(),
            extra: Map::new(),
        }
    }

    #[test]
    fn missing_and_blank_documents_load_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = JsonFileStore::open(dir.path()).expect("open store");
        assert!(store.load().expect("load").is_empty());

        std::fs::write(store.document_path(), "  \n").expect("write blank");
        assert!(store.load().expect("load").is_empty());
    }

    #[test]
    fn save_writes_two_space_pretty_json_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut store = JsonFileStore::open(dir.path().join("nested")).expect("open store");
        store.save(&[category("sales")]).expect("save");

        let raw = std::fs::read_to_string(store.document_path()).expect("read");
        assert!(raw.starts_with("[\n  {\n    \"id\": \"sales\""), "got: {raw}");
        let leftovers = std::fs::read_dir(store.storage_dir())
            .expect("read dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
        assert_eq!(store.load().expect("load"), vec![category("sales")]);
    }

    #[test]
    fn concurrent_savers_never_tear_the_document() {
        let dir = tempfile::tempdir().expect("temp dir");
        let documents: Vec<Vec<Category>> = (0..4)
            .map(|n| (0..50).map(|i| category(&format!("writer{n}-{i}"))).collect())
            .collect();

        std::thread::scope(|scope| {
            for document in &documents {
                let path = dir.path();
                scope.spawn(move || {
                    let mut store = JsonFileStore::open(path).expect("open store");
                    for _ in 0..100 {
                        store.save(document).expect("concurrent save");
                        let loaded = store.load().expect("concurrent load");
                        assert_eq!(loaded.len(), 50);
                    }
                });
            }
        });

        let store = JsonFileStore::open(dir.path()).expect("open store");
        let last = store.load().expect("final load");
        assert!(documents.contains(&last));
        let leftovers = std::fs::read_dir(dir.path())
            .expect("read dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn save_into_vanished_directory_fails_without_a_document() {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = dir.path().join("data");
        let mut store = JsonFileStore::open(&storage).expect("open store");
        std::fs::remove_dir(&storage).expect("remove storage dir");

        let err = store.save(&[category("sales")]).expect_err("save must fail");
        assert!(matches!(err, StoreError::Io(_)));
        assert!(err.is_store_unavailable());
        assert!(!store.document_path().exists());
    }

    #[test]
    fn undecodable_document_is_a_store_fault() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = JsonFileStore::open(dir.path()).expect("open store");
        std::fs::write(store.document_path(), "{ not json").expect("write garbage");
        let err = store.load().expect_err("corrupt document");
        assert!(matches!(err, StoreError::Corrupt(_)));
        assert!(err.is_store_unavailable());
    }
}
