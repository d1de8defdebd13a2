#![forbid(unsafe_code)]

use super::Repository;
use crate::StoreError;
use crate::store::DocumentStore;
use dash_core::model::Category;
use dash_core::validate::{Entity, validate_category_payload};
use serde_json::Value;

impl<S: DocumentStore> Repository<S> {
    /// Appends a category whose id is the slug of `name`.
    ///
    /// Keys other than `name`, `description` and `widgets` are stored verbatim;
    /// a supplied `id` is replaced by the derived one.
    pub fn create_category(&mut self, raw: &Value) -> Result<Category, StoreError> {
        let payload = validate_category_payload(raw)?;
        let id = payload.slug();

        let mut categories = self.store.load()?;
        if categories.iter().any(|category| category.id == id) {
            return Err(StoreError::AlreadyExists(Entity::Category));
        }

        let category = Category {
            id,
            name: payload.name,
            description: Some(payload.description),
            widgets: payload.widgets,
            extra: payload.extra,
        };
        categories.push(category.clone());
        self.store.save(&categories)?;

        tracing::info!(
            category_id = %category.id,
            widgets = category.widgets.len(),
            "category created"
        );
        Ok(category)
    }
}
