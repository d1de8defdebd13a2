#![forbid(unsafe_code)]

mod categories;
mod widgets;

use crate::StoreError;
use crate::store::DocumentStore;
use dash_core::model::Category;
use dash_core::validate::Entity;

/// Sole reader and mutator of the category collection.
///
/// Every call loads the full document; mutations finish all checks before the
/// single `save`, so a failed call leaves the store untouched. Nothing is
/// cached between calls and there is no locking: two overlapping
/// read-modify-write cycles resolve as last writer wins.
#[derive(Debug)]
pub struct Repository<S> {
    store: S,
}

impl<S: DocumentStore> Repository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.store.load()
    }

    pub fn get_category(&self, id: &str) -> Result<Category, StoreError> {
        self.store
            .load()?
            .into_iter()
            .find(|category| category.id == id)
            .ok_or(StoreError::NotFound(Entity::Category))
    }
}

fn category_index(categories: &[Category], id: &str) -> Result<usize, StoreError> {
    categories
        .iter()
        .position(|category| category.id == id)
        .ok_or(StoreError::NotFound(Entity::Category))
}
