use crate::domain::entities::collection::CollectionInfo;
use crate::domain::error::DomainError;

pub trait CollectionRepository: Send + Sync {
    /// Fails with `AlreadyExists` when the name is taken.
    fn insert(&self, info: &CollectionInfo) -> Result<(), DomainError>;
    fn find_by_name(&self, name: &str) -> Result<Option<CollectionInfo>, DomainError>;
    /// Removes the collection and every entry in it. Returns false if absent.
    fn delete_by_name(&self, name: &str) -> Result<bool, DomainError>;
    fn list(&self) -> Result<Vec<CollectionInfo>, DomainError>;
    fn set_dimension(&self, id: &str, dimension: usize) -> Result<(), DomainError>;
}
