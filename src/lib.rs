pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::collections::{CollectionHandle, CollectionManager};
use crate::application::ingest::{BatchIngestor, IngestOptions, IngestReport};
use crate::application::present::ResultPresenter;
use crate::application::query::{ImageQueryStrategy, QueryService};
use crate::config::Settings;
use crate::domain::entities::collection::CollectionInfo;
use crate::domain::error::DomainError;
use crate::domain::ports::collection_repository::CollectionRepository;
use crate::domain::ports::data_loader::DataLoader;
use crate::domain::ports::embedding_port::EmbeddingFunction;
use crate::domain::ports::vector_store::VectorStore;
use crate::domain::values::collection_name::CollectionName;
use crate::domain::values::distance::DistanceMetric;
use crate::infrastructure::loaders::image_file::ImageFileLoader;
use crate::infrastructure::sqlite::collection_repo::SqliteCollectionRepo;
use crate::infrastructure::sqlite::open_connection;
use crate::infrastructure::sqlite::vector_store::SqliteVectorStore;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Everything one process needs to ingest and query: the database connection
/// and the embedding function and data loader collections are bound to.
///
/// Built explicitly and passed by reference; dropping it closes the database.
pub struct Session {
    manager: CollectionManager,
    embedder: Arc<dyn EmbeddingFunction>,
    loader: Arc<dyn DataLoader>,
}

impl Session {
    /// Opens the database under `settings.db_path`, creating the directory if
    /// needed, with the embedder the settings select.
    pub fn open(settings: &Settings) -> Result<Self, DomainError> {
        std::fs::create_dir_all(&settings.db_path).map_err(|e| {
            DomainError::Database(format!(
                "Cannot create database directory {}: {e}",
                settings.db_path.display()
            ))
        })?;
        Self::with_providers(
            &settings.db_file(),
            settings.build_embedder(),
            Arc::new(ImageFileLoader::new()),
        )
    }

    /// `db_file` may be `":memory:"` for a throwaway database.
    pub fn with_providers(
        db_file: &Path,
        embedder: Arc<dyn EmbeddingFunction>,
        loader: Arc<dyn DataLoader>,
    ) -> Result<Self, DomainError> {
        let conn = open_connection(db_file)?;
        let repo: Arc<dyn CollectionRepository> = Arc::new(SqliteCollectionRepo::new(conn.clone()));
        let store: Arc<dyn VectorStore> = Arc::new(SqliteVectorStore::new(conn));
        info!(db = %db_file.display(), model = %embedder.model(), "Session opened");

        Ok(Self {
            manager: CollectionManager::new(repo, store),
            embedder,
            loader,
        })
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingFunction> {
        &self.embedder
    }

    pub fn loader(&self) -> &Arc<dyn DataLoader> {
        &self.loader
    }

    pub fn create_collection(
        &self,
        name: &CollectionName,
        distance: DistanceMetric,
    ) -> Result<Arc<CollectionHandle>, DomainError> {
        self.manager
            .create(name, self.embedder.clone(), self.loader.clone(), distance)
            .map(Arc::new)
    }

    pub fn open_collection(&self, name: &CollectionName) -> Result<Arc<CollectionHandle>, DomainError> {
        self.manager
            .open(name, self.embedder.clone(), self.loader.clone())
            .map(Arc::new)
    }

    pub fn get_or_create_collection(
        &self,
        name: &CollectionName,
        distance: DistanceMetric,
    ) -> Result<Arc<CollectionHandle>, DomainError> {
        self.manager
            .get_or_create(name, self.embedder.clone(), self.loader.clone(), distance)
            .map(Arc::new)
    }

    pub fn delete_collection(&self, name: &CollectionName) -> Result<(), DomainError> {
        self.manager.delete(name)
    }

    pub fn list_collections(&self) -> Result<Vec<CollectionInfo>, DomainError> {
        self.manager.list()
    }

    /// Adds every image in `dir` to the named collection, creating it if
    /// needed.
    pub async fn ingest(
        &self,
        name: &CollectionName,
        dir: &Path,
        options: IngestOptions,
    ) -> Result<IngestReport, DomainError> {
        if !dir.is_dir() {
            return Err(DomainError::InvalidInput(format!(
                "{} is not a valid directory",
                dir.display()
            )));
        }
        if options.batch_size == 0 {
            return Err(DomainError::InvalidInput("Batch size must be at least 1".into()));
        }
        let collection = self.get_or_create_collection(name, DistanceMetric::default())?;
        BatchIngestor::new(collection, options).ingest_directory(dir).await
    }

    pub fn query_service(&self, collection: Arc<CollectionHandle>, strategy: ImageQueryStrategy) -> QueryService {
        QueryService::new(collection).with_strategy(strategy)
    }

    pub fn presenter(&self) -> ResultPresenter {
        ResultPresenter::new(self.loader.clone())
    }

    /// Explicit teardown; equivalent to dropping the session.
    pub fn close(self) {
        info!("Session closed");
    }
}
