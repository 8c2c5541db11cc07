//! Key-value access contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the string-keyed get/set/remove/keys surface every other
//!   component persists through.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - `set` is last-write-wins; there is no transactional grouping across
//!   keys, and callers are expected to run single-threaded.
//! - `keys` returns a stable ascending order.

use crate::store::migrations::latest_version;
use crate::store::{StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Synchronous string-keyed mapping shared by every taskdesk component.
pub trait KeyValueStore {
    /// Returns the raw stored value for `key`, or `None` when absent.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Returns every stored key in ascending order.
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Returns whether `key` is currently present.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// SQLite-backed key-value store over the `kv` table.
pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStore<'conn> {
    /// Wraps a connection after verifying it is initialized for key-value
    /// access.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version does not match
    ///   the latest migration known to this binary.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the `kv`
    ///   table shape is not usable.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let expected_version = latest_version();
        let actual_version =
            conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        ensure_table(conn, "kv")?;
        ensure_column(conn, "kv", "key")?;
        ensure_column(conn, "kv", "value")?;

        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKvStore<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key ASC;")?;
        let mut rows = stmt.query([])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get::<_, String>(0)?);
        }
        Ok(keys)
    }
}

fn ensure_table(conn: &Connection, table: &'static str) -> StoreResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    if exists == 0 {
        return Err(StoreError::MissingRequiredTable(table));
    }
    Ok(())
}

fn ensure_column(conn: &Connection, table: &'static str, column: &'static str) -> StoreResult<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get("name")?;
        if name == column {
            return Ok(());
        }
    }
    Err(StoreError::MissingRequiredColumn { table, column })
}
