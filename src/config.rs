use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingFunction;
use crate::infrastructure::embeddings::clip_http::ClipHttpProvider;
use crate::infrastructure::embeddings::hashing::{HashingEmbedder, DEFAULT_DIMENSION};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_DB_PATH: &str = "my_vectordb";
pub const DB_FILE_NAME: &str = "imgsearch.db";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmbeddingProviderKind {
    #[default]
    Hashing,
    Clip,
}

impl FromStr for EmbeddingProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hashing" | "local" => Ok(Self::Hashing),
            "clip" | "jina" => Ok(Self::Clip),
            _ => Err(format!("Unknown embedding provider: '{s}'. Use 'hashing' or 'clip'")),
        }
    }
}

/// Runtime configuration, read from `IMGSEARCH_*` environment variables.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding the database file.
    pub db_path: PathBuf,
    pub provider: EmbeddingProviderKind,
    pub api_key: String,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub dimension: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            provider: EmbeddingProviderKind::default(),
            api_key: String::new(),
            model: None,
            base_url: None,
            dimension: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, DomainError> {
        let provider = match std::env::var("IMGSEARCH_EMBEDDING_PROVIDER") {
            Ok(p) => p.parse().map_err(DomainError::InvalidInput)?,
            Err(_) => EmbeddingProviderKind::default(),
        };
        let dimension = match std::env::var("IMGSEARCH_EMBEDDING_DIM") {
            Ok(d) => Some(d.parse().map_err(|_| {
                DomainError::InvalidInput(format!("IMGSEARCH_EMBEDDING_DIM must be a number, got '{d}'"))
            })?),
            Err(_) => None,
        };

        Ok(Self {
            db_path: std::env::var("IMGSEARCH_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH)),
            provider,
            api_key: std::env::var("IMGSEARCH_EMBEDDING_API_KEY").unwrap_or_default(),
            model: std::env::var("IMGSEARCH_EMBEDDING_MODEL").ok(),
            base_url: std::env::var("IMGSEARCH_EMBEDDING_BASE_URL").ok(),
            dimension,
        })
    }

    pub fn db_file(&self) -> PathBuf {
        self.db_path.join(DB_FILE_NAME)
    }

    pub fn build_embedder(&self) -> Arc<dyn EmbeddingFunction> {
        match self.provider {
            EmbeddingProviderKind::Hashing => {
                Arc::new(HashingEmbedder::new(self.dimension.unwrap_or(DEFAULT_DIMENSION)))
            }
            EmbeddingProviderKind::Clip => Arc::new(ClipHttpProvider::new(
                self.api_key.clone(),
                self.model.clone(),
                self.base_url.clone(),
                self.dimension,
            )),
        }
    }
}
