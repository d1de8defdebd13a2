#![forbid(unsafe_code)]

use dash_storage::{ErrorClass, StoreError};
use serde_json::{Value, json};

/// Transport-level result of one repository call.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Outcome {
    pub(crate) status: u16,
    pub(crate) body: Value,
}

impl Outcome {
    pub(crate) fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    /// Client-class failures carry the specific message; store faults are
    /// reported only as `fallback`.
    pub(crate) fn from_error(err: &StoreError, fallback: &str) -> Self {
        let status = status_for(err.class());
        let message = err.client_message().unwrap_or(fallback);
        Self {
            status,
            body: json!({ "error": message }),
        }
    }

    pub(crate) fn into_value(self) -> Value {
        json!({ "status": self.status, "body": self.body })
    }
}

pub(crate) fn status_for(class: ErrorClass) -> u16 {
    match class {
        ErrorClass::BadInput => 400,
        ErrorClass::NotFound => 404,
        ErrorClass::Internal => 500,
    }
}
