#![forbid(unsafe_code)]

mod repository;
mod store;

pub use dash_core::model::{BreakdownItem, Category, DonutData, Widget, WidgetType};
pub use dash_core::validate::{Entity, ValidationError};
pub use repository::Repository;
pub use store::{DOCUMENT_NAME, DocumentStore, JsonFileStore, SqliteDocumentStore};

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    Corrupt(serde_json::Error),
    Invalid(ValidationError),
    NotFound(Entity),
    AlreadyExists(Entity),
}

/// Coarse outcome class a transport maps onto its own status codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    BadInput,
    NotFound,
    Internal,
}

impl StoreError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Invalid(_) | Self::AlreadyExists(_) => ErrorClass::BadInput,
            Self::NotFound(_) => ErrorClass::NotFound,
            Self::Io(_) | Self::Sql(_) | Self::Corrupt(_) => ErrorClass::Internal,
        }
    }

    /// True when the backing store could not be read or written.
    pub fn is_store_unavailable(&self) -> bool {
        self.class() == ErrorClass::Internal
    }

    /// Message safe to hand back to the caller; `None` for store faults.
    pub fn client_message(&self) -> Option<&'static str> {
        match self {
            Self::Invalid(err) => Some(err.message()),
            Self::NotFound(Entity::Category) => Some("Category not found"),
            Self::NotFound(Entity::Widget) => Some("Widget not found"),
            Self::AlreadyExists(Entity::Category) => Some("Category already exists"),
            Self::AlreadyExists(Entity::Widget) => {
                Some("Widget with this title already exists in this category")
            }
            Self::Io(_) | Self::Sql(_) | Self::Corrupt(_) => None,
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::Corrupt(err) => write!(f, "corrupt document: {err}"),
            Self::Invalid(err) => write!(f, "invalid input: {err}"),
            Self::NotFound(entity) => write!(f, "{} not found", entity.as_str()),
            Self::AlreadyExists(entity) => write!(f, "{} already exists", entity.as_str()),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Sql(err) => Some(err),
            Self::Corrupt(err) => Some(err),
            Self::Invalid(err) => Some(err),
            Self::NotFound(_) | Self::AlreadyExists(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Corrupt(value)
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}
