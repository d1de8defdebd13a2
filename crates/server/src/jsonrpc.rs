#![forbid(unsafe_code)]

use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

pub(crate) const PARSE_ERROR: i64 = -32700;
pub(crate) const INVALID_REQUEST: i64 = -32600;
pub(crate) const METHOD_NOT_FOUND: i64 = -32601;
pub(crate) const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcRequest {
    pub(crate) method: String,
    /// `None` only when the key is absent; an explicit `"id": null` is
    /// `Some(Value::Null)` and still gets a reply.
    #[serde(default, deserialize_with = "explicit_id")]
    pub(crate) id: Option<Value>,
    #[serde(default)]
    pub(crate) params: Option<Value>,
}

fn explicit_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

pub(crate) fn reply_ok(id: Value, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

pub(crate) fn reply_err(id: Value, code: i64, message: &str) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
}

/// Decodes one line of input. Malformed input yields the error reply to send.
pub(crate) fn parse_line(line: &[u8]) -> Result<JsonRpcRequest, Value> {
    let value: Value = serde_json::from_slice(line)
        .map_err(|err| reply_err(Value::Null, PARSE_ERROR, &format!("Parse error: {err}")))?;
    if !value.is_object() {
        return Err(reply_err(Value::Null, INVALID_REQUEST, "Invalid Request"));
    }
    let id = value.get("id").cloned().unwrap_or(Value::Null);
    serde_json::from_value(value)
        .map_err(|err| reply_err(id, INVALID_REQUEST, &format!("Invalid Request: {err}")))
}
