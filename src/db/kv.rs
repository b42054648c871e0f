//! Key-value persistence used for the progress record.

use rusqlite::{params, Connection};

use super::{try_lock, DbPool, StoreError};

/// Durable string store scoped to the local learner.
pub trait KeyValueStore: Send + Sync {
  fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
  fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

pub fn get_value(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
  let mut stmt = conn.prepare("SELECT value FROM kv_store WHERE key = ?1")?;
  let mut rows = stmt.query(params![key])?;
  if let Some(row) = rows.next()? {
    Ok(Some(row.get(0)?))
  } else {
    Ok(None)
  }
}

pub fn set_value(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
    params![key, value],
  )?;
  Ok(())
}

/// [`KeyValueStore`] backed by the application's SQLite connection
#[derive(Clone)]
pub struct SqliteStore {
  pool: DbPool,
}

impl SqliteStore {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }
}

impl KeyValueStore for SqliteStore {
  fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    let conn = try_lock(&self.pool)?;
    Ok(get_value(&conn, key)?)
  }

  fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
    let conn = try_lock(&self.pool)?;
    Ok(set_value(&conn, key, value)?)
  }
}
