#![forbid(unsafe_code)]

use crate::jsonrpc::{INVALID_PARAMS, JsonRpcRequest, METHOD_NOT_FOUND, reply_err, reply_ok};
use crate::response::Outcome;
use dash_storage::{DocumentStore, ErrorClass, Repository, StoreError};
use serde_json::{Value, json};

pub(crate) type DynRepository = Repository<Box<dyn DocumentStore>>;

pub(crate) struct DashServer {
    repo: DynRepository,
}

/// Missing or mistyped request parameter; answered as a JSON-RPC error.
struct ParamError(String);

fn params_object(params: Option<&Value>) -> Result<&serde_json::Map<String, Value>, ParamError> {
    params
        .and_then(Value::as_object)
        .ok_or_else(|| ParamError("params must be an object".to_string()))
}

fn require_str<'a>(
    obj: &'a serde_json::Map<String, Value>,
    key: &str,
) -> Result<&'a str, ParamError> {
    obj.get(key)
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ParamError(format!("{key} must be a non-empty string")))
}

/// Logs a repository failure at a level matching its class and turns it
/// into the `{status, body}` outcome.
fn failure(method: &str, err: &StoreError, fallback: &str) -> Outcome {
    match err.class() {
        ErrorClass::Internal => tracing::error!(method, error = %err, "store unavailable"),
        ErrorClass::BadInput | ErrorClass::NotFound => {
            tracing::warn!(method, error = %err, "request rejected")
        }
    }
    Outcome::from_error(err, fallback)
}

impl DashServer {
    pub(crate) fn new(repo: DynRepository) -> Self {
        Self { repo }
    }

    /// Runs one request. Notifications (no `id` key) are still executed but
    /// produce no reply.
    pub(crate) fn handle(&mut self, request: JsonRpcRequest) -> Option<Value> {
        let JsonRpcRequest { method, id, params } = request;
        tracing::debug!(method = %method, notification = id.is_none(), "request");

        let reply = if method == "ping" {
            Ok(json!({}))
        } else {
            match self.dispatch(&method, params.as_ref()) {
                Some(Ok(outcome)) => Ok(outcome.into_value()),
                Some(Err(ParamError(message))) => {
                    tracing::warn!(method = %method, reason = %message, "invalid params");
                    Err((INVALID_PARAMS, message))
                }
                None => Err((METHOD_NOT_FOUND, format!("Method not found: {method}"))),
            }
        };

        let id = id?;
        Some(match reply {
            Ok(result) => reply_ok(id, result),
            Err((code, message)) => reply_err(id, code, &message),
        })
    }

    fn dispatch(
        &mut self,
        method: &str,
        params: Option<&Value>,
    ) -> Option<Result<Outcome, ParamError>> {
        let result = match method {
            "categories/list" => Ok(self.list_categories()),
            "categories/get" => self.get_category(params),
            "categories/create" => self.create_category(params),
            "widgets/create" => self.create_widget(params),
            "widgets/update" => self.update_widget(params),
            "widgets/delete" => self.delete_widget(params),
            _ => return None,
        };
        Some(result)
    }

    fn list_categories(&mut self) -> Outcome {
        match self.repo.list_categories() {
            Ok(categories) => Outcome::ok(json!(categories)),
            Err(err) => failure("categories/list", &err, "Failed to read data"),
        }
    }

    fn get_category(&mut self, params: Option<&Value>) -> Result<Outcome, ParamError> {
        let obj = params_object(params)?;
        let id = require_str(obj, "id")?;
        Ok(match self.repo.get_category(id) {
            Ok(category) => Outcome::ok(json!(category)),
            Err(err) => failure("categories/get", &err, "Failed to read data"),
        })
    }

    fn create_category(&mut self, params: Option<&Value>) -> Result<Outcome, ParamError> {
        let body = params.unwrap_or(&Value::Null);
        Ok(match self.repo.create_category(body) {
            Ok(_) => Outcome::ok(json!({ "success": true })),
            Err(err) => failure("categories/create", &err, "Failed to write data"),
        })
    }

    fn create_widget(&mut self, params: Option<&Value>) -> Result<Outcome, ParamError> {
        let obj = params_object(params)?;
        let category_id = require_str(obj, "categoryId")?;
        let body = obj.get("widget").unwrap_or(&Value::Null);
        Ok(match self.repo.create_widget(category_id, body) {
            Ok(widget) => Outcome::ok(json!({ "success": true, "widget": widget })),
            Err(err) => failure("widgets/create", &err, "Failed to add widget"),
        })
    }

    fn update_widget(&mut self, params: Option<&Value>) -> Result<Outcome, ParamError> {
        let obj = params_object(params)?;
        let category_id = require_str(obj, "categoryId")?;
        let widget_id = require_str(obj, "widgetId")?;
        let body = obj.get("widget").unwrap_or(&Value::Null);
        Ok(match self.repo.update_widget(category_id, widget_id, body) {
            Ok(widget) => Outcome::ok(json!({ "success": true, "widget": widget })),
            Err(err) => failure("widgets/update", &err, "Failed to update widget"),
        })
    }

    fn delete_widget(&mut self, params: Option<&Value>) -> Result<Outcome, ParamError> {
        let obj = params_object(params)?;
        let category_id = require_str(obj, "categoryId")?;
        let widget_id = require_str(obj, "widgetId")?;
        Ok(match self.repo.delete_widget(category_id, widget_id) {
            Ok(()) => Outcome::ok(json!({
                "success": true,
                "message": "Widget deleted successfully"
            })),
            Err(err) => failure("widgets/delete", &err, "Failed to delete widget"),
        })
    }
}
