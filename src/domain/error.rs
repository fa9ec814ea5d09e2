use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Duplicate entry id: {0}")]
    DuplicateId(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Batch at offset {offset} ({size} items) failed: {reason}")]
    PartialBatch {
        offset: usize,
        size: usize,
        reason: String,
    },
}

/// Coarse classification callers use to decide between retry and abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AlreadyExists,
    NotFound,
    InvalidInput,
    BackendFailure,
    PartialBatchFailure,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::InvalidInput(_) | DomainError::DuplicateId(_) => ErrorKind::InvalidInput,
            DomainError::Database(_) | DomainError::Embedding(_) | DomainError::Decode(_) => {
                ErrorKind::BackendFailure
            }
            DomainError::PartialBatch { .. } => ErrorKind::PartialBatchFailure,
        }
    }
}

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        DomainError::Database(e.to_string())
    }
}

impl From<&str> for DomainError {
    fn from(s: &str) -> Self {
        DomainError::InvalidInput(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_variants_classify_as_backend_failure() {
        assert_eq!(DomainError::Database("x".into()).kind(), ErrorKind::BackendFailure);
        assert_eq!(DomainError::Embedding("x".into()).kind(), ErrorKind::BackendFailure);
        assert_eq!(DomainError::Decode("x".into()).kind(), ErrorKind::BackendFailure);
    }

    #[test]
    fn test_duplicate_id_is_invalid_input() {
        assert_eq!(DomainError::DuplicateId("a".into()).kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_partial_batch_message_names_offset() {
        let err = DomainError::PartialBatch {
            offset: 20,
            size: 10,
            reason: "boom".into(),
        };
        assert_eq!(err.kind(), ErrorKind::PartialBatchFailure);
        assert!(err.to_string().contains("offset 20"));
    }
}
