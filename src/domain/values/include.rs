use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Optional result-set fields a caller may ask for. Identifiers are always
/// returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncludeField {
    Distances,
    Documents,
    Uris,
    Metadatas,
    Data,
}

impl fmt::Display for IncludeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncludeField::Distances => write!(f, "distances"),
            IncludeField::Documents => write!(f, "documents"),
            IncludeField::Uris => write!(f, "uris"),
            IncludeField::Metadatas => write!(f, "metadatas"),
            IncludeField::Data => write!(f, "data"),
        }
    }
}

impl FromStr for IncludeField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "distances" | "distance" => Ok(IncludeField::Distances),
            "documents" | "document" => Ok(IncludeField::Documents),
            "uris" | "uri" => Ok(IncludeField::Uris),
            "metadatas" | "metadata" => Ok(IncludeField::Metadatas),
            "data" => Ok(IncludeField::Data),
            _ => Err(format!("Unknown include field: {s}")),
        }
    }
}

/// The set of fields requested for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Include {
    pub distances: bool,
    pub documents: bool,
    pub uris: bool,
    pub metadatas: bool,
    pub data: bool,
}

impl Include {
    pub fn none() -> Self {
        Self {
            distances: false,
            documents: false,
            uris: false,
            metadatas: false,
            data: false,
        }
    }

    pub fn all() -> Self {
        Self {
            distances: true,
            documents: true,
            uris: true,
            metadatas: true,
            data: true,
        }
    }

    pub fn from_fields(fields: &[IncludeField]) -> Self {
        fields.iter().fold(Self::none(), |inc, f| inc.with(*f))
    }

    pub fn with(mut self, field: IncludeField) -> Self {
        match field {
            IncludeField::Distances => self.distances = true,
            IncludeField::Documents => self.documents = true,
            IncludeField::Uris => self.uris = true,
            IncludeField::Metadatas => self.metadatas = true,
            IncludeField::Data => self.data = true,
        }
        self
    }

    pub fn contains(&self, field: IncludeField) -> bool {
        match field {
            IncludeField::Distances => self.distances,
            IncludeField::Documents => self.documents,
            IncludeField::Uris => self.uris,
            IncludeField::Metadatas => self.metadatas,
            IncludeField::Data => self.data,
        }
    }
}

impl Default for Include {
    /// Distances and URIs: what the presenter needs.
    fn default() -> Self {
        Self::none()
            .with(IncludeField::Distances)
            .with(IncludeField::Uris)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_requests_distances_and_uris_only() {
        let inc = Include::default();
        assert!(inc.distances && inc.uris);
        assert!(!inc.documents && !inc.metadatas && !inc.data);
    }

    #[test]
    fn test_from_fields() {
        let inc = Include::from_fields(&[IncludeField::Documents, IncludeField::Data]);
        assert!(inc.contains(IncludeField::Documents));
        assert!(inc.contains(IncludeField::Data));
        assert!(!inc.contains(IncludeField::Distances));
    }
}
