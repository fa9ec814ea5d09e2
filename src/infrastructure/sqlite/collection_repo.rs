use super::{lock, SharedConnection};
use crate::domain::entities::collection::CollectionInfo;
use crate::domain::error::DomainError;
use crate::domain::ports::collection_repository::CollectionRepository;
use crate::domain::values::collection_name::CollectionName;
use chrono::DateTime;
use rusqlite::{params, ErrorCode, OptionalExtension};

const SELECT_COLS: &str = "id, name, embedding_model, dimension, distance, created_at";

pub struct SqliteCollectionRepo {
    conn: SharedConnection,
}

impl SqliteCollectionRepo {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    fn row_to_info(row: &rusqlite::Row) -> Result<CollectionInfo, rusqlite::Error> {
        let name: String = row.get(1)?;
        let dimension: i64 = row.get(3)?;
        let distance_str: String = row.get(4)?;
        let created_str: String = row.get(5)?;

        Ok(CollectionInfo {
            id: row.get(0)?,
            name: CollectionName::new(name.clone())
                .map_err(|_| rusqlite::Error::InvalidParameterName(name))?,
            embedding_model: row.get(2)?,
            dimension: dimension.max(0) as usize,
            distance: distance_str.parse().unwrap_or_else(|_| {
                tracing::warn!(distance = %distance_str, "Invalid distance metric in collection row, defaulting to l2");
                Default::default()
            }),
            created_at: DateTime::parse_from_rfc3339(&created_str)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .unwrap_or_else(|_| {
                    tracing::warn!(created_at = %created_str, "Invalid timestamp in collection row, using now");
                    chrono::Utc::now()
                }),
        })
    }
}

impl CollectionRepository for SqliteCollectionRepo {
    fn insert(&self, info: &CollectionInfo) -> Result<(), DomainError> {
        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT INTO collections (id, name, embedding_model, dimension, distance, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                info.id,
                info.name.as_str(),
                info.embedding_model,
                info.dimension as i64,
                info.distance.to_string(),
                info.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
                DomainError::AlreadyExists(format!("Collection '{}' already exists", info.name))
            }
            other => DomainError::Database(format!("Failed to create collection: {other}")),
        })?;
        Ok(())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<CollectionInfo>, DomainError> {
        let conn = lock(&self.conn)?;
        conn.query_row(
            &format!("SELECT {SELECT_COLS} FROM collections WHERE name = ?1"),
            params![name],
            Self::row_to_info,
        )
        .optional()
        .map_err(|e| DomainError::Database(format!("Failed to load collection: {e}")))
    }

    fn delete_by_name(&self, name: &str) -> Result<bool, DomainError> {
        let conn = lock(&self.conn)?;
        let removed = conn
            .execute("DELETE FROM collections WHERE name = ?1", params![name])
            .map_err(|e| DomainError::Database(format!("Failed to delete collection: {e}")))?;
        Ok(removed > 0)
    }

    fn list(&self) -> Result<Vec<CollectionInfo>, DomainError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLS} FROM collections ORDER BY created_at, name"
        ))?;
        let rows = stmt
            .query_map([], Self::row_to_info)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn set_dimension(&self, id: &str, dimension: usize) -> Result<(), DomainError> {
        let conn = lock(&self.conn)?;
        conn.execute(
            "UPDATE collections SET dimension = ?1 WHERE id = ?2",
            params![dimension as i64, id],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::distance::DistanceMetric;
    use crate::infrastructure::sqlite::open_connection;
    use std::path::Path;

    #[test]
    fn test_unparsable_created_at_falls_back_to_now() {
        let repo = SqliteCollectionRepo::new(open_connection(Path::new(":memory:")).unwrap());
        let info = CollectionInfo::new(CollectionName::default(), "test".into(), 4, DistanceMetric::L2);
        repo.insert(&info).unwrap();
        lock(&repo.conn)
            .unwrap()
            .execute("UPDATE collections SET created_at = 'yesterday-ish'", [])
            .unwrap();

        let before = chrono::Utc::now();
        let found = repo.find_by_name(info.name.as_str()).unwrap().unwrap();
        assert_eq!(found.id, info.id);
        assert!(found.created_at >= before);
    }
}
