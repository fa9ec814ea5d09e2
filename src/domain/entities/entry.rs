use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};

/// A record to be added to a collection. The embedding is derived on insert:
/// from the resolved image when `uri` is set, otherwise from `document`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    pub id: String,
    pub uri: Option<String>,
    pub document: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl NewEntry {
    pub fn from_uri(id: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uri: Some(uri.into()),
            document: None,
            metadata: None,
        }
    }

    pub fn from_document(id: impl Into<String>, document: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uri: None,
            document: Some(document.into()),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::InvalidInput("Entry id must not be empty".into()));
        }
        if self.uri.is_none() && self.document.is_none() {
            return Err(DomainError::InvalidInput(format!(
                "Entry '{}' needs a uri or a document",
                self.id
            )));
        }
        if let Some(meta) = &self.metadata {
            if !meta.is_object() {
                return Err(DomainError::InvalidInput(format!(
                    "Metadata for entry '{}' must be a JSON object",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

/// A stored record together with its embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEntry {
    pub id: String,
    pub uri: Option<String>,
    pub document: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub embedding: Vec<f32>,
}
