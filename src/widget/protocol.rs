/// Widget host message structures
///
/// The widget shell talks to the extension with line-delimited JSON-RPC 2.0
/// over stdin/stdout.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Methods the widget host answers
pub mod methods {
    /// Timeline entries for every habit, or one when `habitId` is given
    pub const TIMELINE: &str = "widget/timeline";
    /// Check a habit in for today or the given `date`
    pub const CHECK_IN: &str = "widget/checkin";
    /// Handle a deep link tapped inside the widget
    pub const OPEN_URL: &str = "widget/openUrl";
}

/// JSON-RPC 2.0 request message
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0")
    #[allow(dead_code)]
    pub jsonrpc: String,
    /// Unique identifier for this request
    pub id: Value,
    /// The method to call (e.g., "widget/timeline")
    pub method: String,
    /// Parameters for the method call
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 response message
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Request ID that we're responding to
    pub id: Value,
    /// Successful result (if no error occurred)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error information (if something went wrong)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error information
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Parameters of `widget/timeline`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineParams {
    #[serde(default)]
    pub habit_id: Option<String>,
}

/// Parameters of `widget/checkin`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInParams {
    pub habit_id: String,
    /// Day as `yyyy-MM-dd`; today when absent
    #[serde(default)]
    pub date: Option<String>,
}

/// Parameters of `widget/openUrl`
#[derive(Debug, Deserialize)]
pub struct OpenUrlParams {
    pub url: String,
}

// JSON-RPC error codes (standard codes)
pub mod error_codes {
    /// Invalid JSON was received
    pub const PARSE_ERROR: i32 = -32700;
    /// The requested method doesn't exist
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Method exists but parameters are wrong
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal JSON-RPC error
    pub const INTERNAL_ERROR: i32 = -32603;

    // Application-specific error codes
    /// Database or storage operation failed
    pub const STORAGE_ERROR: i32 = -32004;
}

impl JsonRpcResponse {
    /// Create a successful response
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: Value, code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data,
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Map storage errors to JSON-RPC error codes
pub fn storage_error_to_json_rpc_code(error: &crate::storage::StorageError) -> i32 {
    use crate::storage::StorageError;

    match error {
        StorageError::Query(_) | StorageError::Connection(_) | StorageError::Migration(_) => {
            error_codes::STORAGE_ERROR
        }
        StorageError::Serialization(_) => error_codes::INTERNAL_ERROR,
    }
}
