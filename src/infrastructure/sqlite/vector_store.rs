use super::{lock, SharedConnection};
use crate::domain::entities::entry::StoredEntry;
use crate::domain::error::DomainError;
use crate::domain::ports::vector_store::VectorStore;
use crate::domain::values::distance::DistanceMetric;
use rusqlite::{params, OptionalExtension};
use std::collections::HashSet;

/// Exhaustive-scan vector store over the `entries` table.
pub struct SqliteVectorStore {
    conn: SharedConnection,
}

impl SqliteVectorStore {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    fn serialize_vector(v: &[f32]) -> Vec<u8> {
        v.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_vector(bytes: &[u8]) -> Vec<f32> {
        bytes.chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    fn row_to_entry(row: &rusqlite::Row) -> Result<StoredEntry, rusqlite::Error> {
        let metadata_str: Option<String> = row.get(3)?;
        let blob: Vec<u8> = row.get(4)?;
        Ok(StoredEntry {
            id: row.get(0)?,
            uri: row.get(1)?,
            document: row.get(2)?,
            metadata: metadata_str.and_then(|s| serde_json::from_str(&s).ok()),
            embedding: Self::deserialize_vector(&blob),
        })
    }
}

impl VectorStore for SqliteVectorStore {
    fn add(&self, collection_id: &str, entries: &[StoredEntry]) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for entry in entries {
            if !seen.insert(entry.id.as_str()) {
                return Err(DomainError::DuplicateId(entry.id.clone()));
            }
        }

        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;
        let next_seq: i64 = tx.query_row(
            "SELECT COALESCE(MAX(seq), -1) + 1 FROM entries WHERE collection_id = ?1",
            params![collection_id],
            |r| r.get(0),
        )?;
        {
            let mut exists = tx.prepare("SELECT 1 FROM entries WHERE collection_id = ?1 AND id = ?2")?;
            let mut insert = tx.prepare(
                "INSERT INTO entries (collection_id, id, seq, uri, document, metadata, embedding, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            let now = chrono::Utc::now().to_rfc3339();
            for (offset, entry) in entries.iter().enumerate() {
                if exists.exists(params![collection_id, entry.id])? {
                    // Dropping the transaction rolls back rows inserted so far.
                    return Err(DomainError::DuplicateId(entry.id.clone()));
                }
                let metadata = entry
                    .metadata
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()
                    .map_err(|e| DomainError::InvalidInput(format!("Bad metadata: {e}")))?;
                insert
                    .execute(params![
                        collection_id,
                        entry.id,
                        next_seq + offset as i64,
                        entry.uri,
                        entry.document,
                        metadata,
                        Self::serialize_vector(&entry.embedding),
                        now,
                    ])
                    .map_err(|e| DomainError::Database(format!("Failed to store entry: {e}")))?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn existing_ids(&self, collection_id: &str, ids: &[String]) -> Result<Vec<String>, DomainError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare("SELECT 1 FROM entries WHERE collection_id = ?1 AND id = ?2")?;
        let mut found = Vec::new();
        for id in ids {
            if stmt.exists(params![collection_id, id])? {
                found.push(id.clone());
            }
        }
        Ok(found)
    }

    fn search(
        &self,
        collection_id: &str,
        vector: &[f32],
        metric: DistanceMetric,
        limit: usize,
    ) -> Result<Vec<(String, f64)>, DomainError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare("SELECT id, embedding FROM entries WHERE collection_id = ?1")?;
        let rows = stmt
            .query_map(params![collection_id], |row| {
                let id: String = row.get(0)?;
                let blob: Vec<u8> = row.get(1)?;
                Ok((id, blob))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut results: Vec<(String, f64)> = Vec::with_capacity(rows.len());
        for (id, blob) in rows {
            let stored = Self::deserialize_vector(&blob);
            if stored.len() != vector.len() {
                return Err(DomainError::Embedding(format!(
                    "Query vector has dimension {} but entry '{id}' has {}",
                    vector.len(),
                    stored.len()
                )));
            }
            results.push((id, metric.distance(vector, &stored)));
        }

        results.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        results.truncate(limit);
        Ok(results)
    }

    fn get(&self, collection_id: &str, ids: &[String]) -> Result<Vec<StoredEntry>, DomainError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT id, uri, document, metadata, embedding FROM entries WHERE collection_id = ?1 AND id = ?2",
        )?;
        let mut entries = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(entry) = stmt
                .query_row(params![collection_id, id], Self::row_to_entry)
                .optional()?
            {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    fn count(&self, collection_id: &str) -> Result<usize, DomainError> {
        let conn = lock(&self.conn)?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE collection_id = ?1",
            params![collection_id],
            |r| r.get(0),
        )?;
        Ok(count as usize)
    }

    fn list_ids(&self, collection_id: &str, limit: usize) -> Result<Vec<String>, DomainError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT id FROM entries WHERE collection_id = ?1 ORDER BY seq LIMIT ?2",
        )?;
        let ids = stmt
            .query_map(params![collection_id, limit as i64], |r| r.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }
}
