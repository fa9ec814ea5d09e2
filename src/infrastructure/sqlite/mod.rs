pub mod collection_repo;
pub mod migrations;
pub mod vector_store;

use crate::domain::error::DomainError;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// One connection shared by the collection repository and the vector store so
/// that cascading deletes and inserts see the same database.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Opens (creating if needed) the database file and applies migrations.
/// `":memory:"` opens a private in-memory database.
pub fn open_connection(path: &Path) -> Result<SharedConnection, DomainError> {
    let in_memory = path == Path::new(":memory:");
    let conn = if in_memory {
        Connection::open_in_memory()
    } else {
        Connection::open(path)
    }
    .map_err(|e| DomainError::Database(format!("DB error: {e}")))?;

    if !in_memory {
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;
    }
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(|e| DomainError::Database(format!("Foreign key pragma error: {e}")))?;

    migrations::run_migrations(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

pub(crate) fn lock(conn: &SharedConnection) -> Result<std::sync::MutexGuard<'_, Connection>, DomainError> {
    conn.lock().map_err(|e| DomainError::Database(e.to_string()))
}
