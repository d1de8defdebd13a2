#![forbid(unsafe_code)]

mod json_file;
mod sqlite;

use crate::StoreError;
use dash_core::model::Category;

pub use json_file::JsonFileStore;
pub use sqlite::SqliteDocumentStore;

/// Logical table name of the category collection.
pub const DOCUMENT_NAME: &str = "categories.json";

/// Whole-document access to the category collection. There is no partial
/// read or append: every save replaces the full ordered sequence.
pub trait DocumentStore {
    fn load(&self) -> Result<Vec<Category>, StoreError>;
    fn save(&mut self, categories: &[Category]) -> Result<(), StoreError>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for Box<S> {
    fn load(&self) -> Result<Vec<Category>, StoreError> {
        (**self).load()
    }

    fn save(&mut self, categories: &[Category]) -> Result<(), StoreError> {
        (**self).save(categories)
    }
}

fn decode_document(raw: &str) -> Result<Vec<Category>, StoreError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(raw)?)
}

fn encode_document(categories: &[Category]) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(categories)?)
}
