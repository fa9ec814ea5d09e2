use crate::domain::values::collection_name::CollectionName;
use crate::domain::values::distance::DistanceMetric;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted description of a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub id: String,
    pub name: CollectionName,
    /// Model identifier of the embedding function the collection was created with.
    pub embedding_model: String,
    /// Vector length recorded at creation. Zero when the embedder could not
    /// report one up front.
    pub dimension: usize,
    pub distance: DistanceMetric,
    pub created_at: DateTime<Utc>,
}

impl CollectionInfo {
    pub fn new(
        name: CollectionName,
        embedding_model: String,
        dimension: usize,
        distance: DistanceMetric,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            embedding_model,
            dimension,
            distance,
            created_at: Utc::now(),
        }
    }
}
