use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_COLLECTION: &str = "multimodal_collection";

/// A validated collection name: 1-63 characters of `[A-Za-z0-9._-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionName(String);

impl CollectionName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.is_empty() || name.len() > 63 {
            return Err(DomainError::InvalidInput(format!(
                "Collection name must be 1-63 characters, got {}",
                name.len()
            )));
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        {
            return Err(DomainError::InvalidInput(format!(
                "Collection name '{name}' contains invalid character '{c}'"
            )));
        }
        Ok(CollectionName(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CollectionName {
    fn default() -> Self {
        CollectionName(DEFAULT_COLLECTION.to_string())
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
