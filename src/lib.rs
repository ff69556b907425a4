//! Habit grid: a habit tracker whose data is shared between an app and a
//! home-screen widget running in a separate process
//!
//! Both sides read and write the same durable `habits` / `habitLogs`
//! collections. The app keeps an in-memory [`HabitStore`]; the widget uses
//! [`WidgetExtension`], which re-reads storage on every call.

use thiserror::Error;

pub mod config;
pub mod deeplink;
pub mod domain;
pub mod refresh;
pub mod storage;
pub mod store;
pub mod theme;
pub mod transfer;
pub mod widget;

// Re-export public modules and types
pub use config::Config;
pub use deeplink::{DeepLink, DeepLinkAction};
pub use domain::*;
pub use refresh::{RecordingSignal, RefreshSignal, TracingSignal};
pub use storage::{SharedStorage, Snapshot, SqliteStorage, StorageError};
pub use store::{HabitStore, HeatmapCell, StoreEvent};
pub use theme::{Appearance, Color, MAX_LEVEL};
pub use transfer::{ImportError, ImportSummary};
pub use widget::{WidgetEntry, WidgetExtension, WidgetHost, WidgetUrlAction};

/// Errors surfaced to the binary
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Habit not found: {0}")]
    HabitNotFound(String),

    #[error("{0}")]
    Rejected(String),
}
