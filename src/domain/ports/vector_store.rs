use crate::domain::entities::entry::StoredEntry;
use crate::domain::error::DomainError;
use crate::domain::values::distance::DistanceMetric;

pub trait VectorStore: Send + Sync {
    /// Inserts all entries or none. Any id already present in the collection
    /// fails the whole call with `DuplicateId`.
    fn add(&self, collection_id: &str, entries: &[StoredEntry]) -> Result<(), DomainError>;

    /// Subset of `ids` already stored in the collection.
    fn existing_ids(&self, collection_id: &str, ids: &[String]) -> Result<Vec<String>, DomainError>;

    /// Up to `limit` `(id, distance)` pairs ordered by ascending distance, ties
    /// broken by id.
    fn search(
        &self,
        collection_id: &str,
        vector: &[f32],
        metric: DistanceMetric,
        limit: usize,
    ) -> Result<Vec<(String, f64)>, DomainError>;

    /// Entries for `ids` in the order given. Unknown ids are skipped.
    fn get(&self, collection_id: &str, ids: &[String]) -> Result<Vec<StoredEntry>, DomainError>;

    fn count(&self, collection_id: &str) -> Result<usize, DomainError>;

    /// Ids in insertion order, for peeking at a collection.
    fn list_ids(&self, collection_id: &str, limit: usize) -> Result<Vec<String>, DomainError>;
}
