//! SQLite implementation of the shared storage namespace
//!
//! The database file plays the role of the app-group preference store: the
//! app and the widget process each open it with their own connection.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

use crate::domain::{Habit, HabitLog};
use crate::storage::codec::{decode_collection, encode_collection, repair_snapshot};
use crate::storage::{
    migrations, SharedStorage, Snapshot, StorageError, HABITS_KEY, HABIT_LOGS_KEY,
};

/// How long a writer waits for the other process to release the file
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed key-value store holding the encoded collections
pub struct SqliteStorage {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStorage {
    /// Open (or create) the shared database at `db_path`
    ///
    /// Runs any pending migrations and switches the file to WAL mode so the
    /// app and widget processes can hold it open at the same time.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| StorageError::Connection(format!("Failed to set busy timeout: {}", e)))?;

        let mode: String = conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .map_err(|e| StorageError::Connection(format!("Failed to enable WAL: {}", e)))?;
        tracing::debug!("Journal mode for {:?}: {}", db_path, mode);

        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite storage initialized at: {:?}", db_path);

        Ok(Self {
            conn,
            path: Some(db_path.to_path_buf()),
        })
    }

    /// A private in-memory store, mostly for tests
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        migrations::initialize_database(&conn)?;
        Ok(Self { conn, path: None })
    }

    /// Path of the database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn read_value(tx: &Transaction<'_>, key: &str) -> Result<Option<String>, StorageError> {
        let value = tx
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_value(tx: &Transaction<'_>, key: &str, value: &str) -> Result<(), StorageError> {
        tx.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Store a raw value under `key`, bypassing encoding
    ///
    /// Used to simulate data written by other app versions.
    pub fn put_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        Self::write_value(&tx, key, value)?;
        tx.commit()?;
        Ok(())
    }
}

impl SharedStorage for SqliteStorage {
    fn load(&self) -> Result<Snapshot, StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        let habits_raw = Self::read_value(&tx, HABITS_KEY)?;
        let logs_raw = Self::read_value(&tx, HABIT_LOGS_KEY)?;
        tx.finish()?;

        let snapshot = repair_snapshot(Snapshot {
            habits: decode_collection(HABITS_KEY, habits_raw.as_deref()),
            logs: decode_collection(HABIT_LOGS_KEY, logs_raw.as_deref()),
        });

        tracing::debug!(
            "Loaded {} habits and {} logs",
            snapshot.habits.len(),
            snapshot.logs.len()
        );
        Ok(snapshot)
    }

    fn save(&self, habits: &[Habit], logs: &[HabitLog]) -> Result<(), StorageError> {
        let habits_raw = encode_collection(habits)?;
        let logs_raw = encode_collection(logs)?;

        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        Self::write_value(&tx, HABITS_KEY, &habits_raw)?;
        Self::write_value(&tx, HABIT_LOGS_KEY, &logs_raw)?;
        tx.commit()?;

        tracing::debug!("Saved {} habits and {} logs", habits.len(), logs.len());
        Ok(())
    }

    fn synchronize(&self) -> Result<(), StorageError> {
        // Returns (busy, log frames, checkpointed frames); only the side effect matters
        self.conn
            .query_row("PRAGMA wal_checkpoint(PASSIVE)", [], |_| Ok(()))?;
        Ok(())
    }
}
