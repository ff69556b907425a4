/// Widget host loop
///
/// Reads JSON-RPC requests line by line, dispatches them to the
/// `WidgetExtension`, and writes one response line per request. Every
/// request re-reads shared storage, so the host can stay up while the app
/// writes alongside it.

use chrono::{Local, NaiveDate};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use super::protocol::*;
use super::WidgetExtension;
use crate::domain::HabitId;
use crate::storage::{SharedStorage, StorageError};
use crate::AppError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Serves widget requests over a line-delimited JSON-RPC stream
pub struct WidgetHost<S: SharedStorage> {
    extension: WidgetExtension<S>,
}

impl<S: SharedStorage> WidgetHost<S> {
    pub fn new(extension: WidgetExtension<S>) -> Self {
        Self { extension }
    }

    pub fn extension(&self) -> &WidgetExtension<S> {
        &self.extension
    }

    /// Serve requests on stdin/stdout until stdin closes
    pub async fn run(&mut self) -> Result<(), AppError> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve requests from `reader`, writing responses to `writer`
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<(), AppError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Widget host waiting for requests...");
        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("Widget host shutting down (input closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line) {
                        let response_str = serde_json::to_string(&response)?;

                        writer.write_all(response_str.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read request: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    pub fn process_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    json!(null),
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        Some(self.handle_request(request))
    }

    fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();
        let result = match request.method.as_str() {
            methods::TIMELINE => self.handle_timeline(request.params),
            methods::CHECK_IN => self.handle_check_in(request.params),
            methods::OPEN_URL => self.handle_open_url(request.params),
            _ => Err(RpcFailure::new(
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
            )),
        };

        match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(failure) => JsonRpcResponse::error(id, failure.code, failure.message, None),
        }
    }

    fn handle_timeline(&self, params: Option<Value>) -> Result<Value, RpcFailure> {
        let params: TimelineParams = match params {
            Some(value) => parse_params(value)?,
            None => TimelineParams::default(),
        };
        let habit_id = params.habit_id.as_deref().map(parse_habit_id).transpose()?;

        let today = Local::now().date_naive();
        let entries = self.extension.timeline(habit_id.as_ref(), today)?;
        Ok(json!({ "date": today, "entries": entries }))
    }

    fn handle_check_in(&self, params: Option<Value>) -> Result<Value, RpcFailure> {
        let params: CheckInParams = parse_params(params.unwrap_or(Value::Null))?;
        let habit_id = parse_habit_id(&params.habit_id)?;
        let date = match params.date.as_deref() {
            Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
                RpcFailure::new(
                    error_codes::INVALID_PARAMS,
                    format!("Invalid date '{}', expected yyyy-MM-dd", raw),
                )
            })?,
            None => Local::now().date_naive(),
        };

        let outcome = self.extension.check_in(&habit_id, date)?;
        let entry = self.extension.entry(&habit_id, date)?;
        Ok(json!({ "result": outcome, "entry": entry }))
    }

    fn handle_open_url(&self, params: Option<Value>) -> Result<Value, RpcFailure> {
        let params: OpenUrlParams = parse_params(params.unwrap_or(Value::Null))?;
        let action = self
            .extension
            .open_url(&params.url, Local::now().date_naive())?;
        Ok(json!(action))
    }
}

struct RpcFailure {
    code: i32,
    message: String,
}

impl RpcFailure {
    fn new(code: i32, message: String) -> Self {
        Self { code, message }
    }
}

impl From<StorageError> for RpcFailure {
    fn from(e: StorageError) -> Self {
        error!("Storage failure while serving widget: {}", e);
        Self::new(storage_error_to_json_rpc_code(&e), e.to_string())
    }
}

fn parse_params<T: DeserializeOwned>(value: Value) -> Result<T, RpcFailure> {
    serde_json::from_value(value).map_err(|e| {
        RpcFailure::new(error_codes::INVALID_PARAMS, format!("Invalid parameters: {}", e))
    })
}

fn parse_habit_id(raw: &str) -> Result<HabitId, RpcFailure> {
    HabitId::from_string(raw).map_err(|_| {
        RpcFailure::new(
            error_codes::INVALID_PARAMS,
            format!("Invalid habit ID format: {}", raw),
        )
    })
}
