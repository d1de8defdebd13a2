#![forbid(unsafe_code)]

use super::{Repository, category_index};
use crate::StoreError;
use crate::store::DocumentStore;
use dash_core::model::{Category, Widget};
use dash_core::validate::{Entity, validate_widget_payload};
use serde_json::{Map, Value};

fn widget_index(category: &Category, widget_id: &str) -> Result<usize, StoreError> {
    category
        .widget_position(widget_id)
        .ok_or(StoreError::NotFound(Entity::Widget))
}

impl<S: DocumentStore> Repository<S> {
    /// Appends a widget to `category_id`. Its id is the slug of the title and
    /// must be unused within that category only.
    pub fn create_widget(&mut self, category_id: &str, raw: &Value) -> Result<Widget, StoreError> {
        let payload = validate_widget_payload(raw)?;

        let mut categories = self.store.load()?;
        let index = category_index(&categories, category_id)?;
        let widget_id = payload.slug();
        let category = &mut categories[index];
        if category.widget(&widget_id).is_some() {
            return Err(StoreError::AlreadyExists(Entity::Widget));
        }

        let widget = Widget {
            id: widget_id,
            title: payload.title,
            kind: payload.kind,
            data: payload.data.unwrap_or_default(),
            extra: Map::new(),
        };
        category.widgets.push(widget.clone());
        self.store.save(&categories)?;

        tracing::info!(
            category_id,
            widget_id = %widget.id,
            kind = widget.kind.as_str(),
            "widget created"
        );
        Ok(widget)
    }

    /// Replaces `title` and `type`; replaces `data` only when supplied.
    /// The id and the position in the category are never changed.
    pub fn update_widget(
        &mut self,
        category_id: &str,
        widget_id: &str,
        raw: &Value,
    ) -> Result<Widget, StoreError> {
        let payload = validate_widget_payload(raw)?;

        let mut categories = self.store.load()?;
        let index = category_index(&categories, category_id)?;
        let position = widget_index(&categories[index], widget_id)?;

        let widget = &mut categories[index].widgets[position];
        widget.title = payload.title;
        widget.kind = payload.kind;
        if let Some(data) = payload.data {
            widget.data = data;
        }
        let updated = widget.clone();
        self.store.save(&categories)?;

        tracing::info!(category_id, widget_id, position, "widget updated");
        Ok(updated)
    }

    /// Removes the widget by id; the remaining widgets keep their order.
    pub fn delete_widget(&mut self, category_id: &str, widget_id: &str) -> Result<(), StoreError> {
        let mut categories = self.store.load()?;
        let index = category_index(&categories, category_id)?;
        let position = widget_index(&categories[index], widget_id)?;

        categories[index].widgets.remove(position);
        self.store.save(&categories)?;

        tracing::info!(category_id, widget_id, "widget deleted");
        Ok(())
    }
}
