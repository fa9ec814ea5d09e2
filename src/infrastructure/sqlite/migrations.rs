use crate::domain::error::DomainError;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS collections (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            embedding_model TEXT NOT NULL,
            dimension INTEGER NOT NULL DEFAULT 0,
            distance TEXT NOT NULL DEFAULT 'l2',
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS entries (
            collection_id TEXT NOT NULL REFERENCES collections(id) ON DELETE CASCADE,
            id TEXT NOT NULL,
            seq INTEGER NOT NULL,
            uri TEXT,
            document TEXT,
            metadata TEXT,
            embedding BLOB NOT NULL,
            created_at TEXT NOT NULL,
            PRIMARY KEY (collection_id, id)
        );

        CREATE INDEX IF NOT EXISTS idx_entries_seq ON entries(collection_id, seq);
        ",
    )
    .map_err(|e| DomainError::Database(format!("Migration failed: {e}")))
}
