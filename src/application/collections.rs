use crate::domain::entities::collection::CollectionInfo;
use crate::domain::entities::entry::{NewEntry, StoredEntry};
use crate::domain::entities::result_set::ResultSet;
use crate::domain::error::DomainError;
use crate::domain::ports::collection_repository::CollectionRepository;
use crate::domain::ports::data_loader::DataLoader;
use crate::domain::ports::embedding_port::{EmbeddingFunction, EmbeddingInput};
use crate::domain::ports::vector_store::VectorStore;
use crate::domain::values::collection_name::CollectionName;
use crate::domain::values::distance::DistanceMetric;
use crate::domain::values::include::Include;
use crate::domain::values::query::{QueryInput, QueryRequest};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Creates, opens and deletes named collections.
pub struct CollectionManager {
    repo: Arc<dyn CollectionRepository>,
    store: Arc<dyn VectorStore>,
}

impl CollectionManager {
    pub fn new(repo: Arc<dyn CollectionRepository>, store: Arc<dyn VectorStore>) -> Self {
        Self { repo, store }
    }

    /// Fails with `AlreadyExists` when `name` is taken.
    pub fn create(
        &self,
        name: &CollectionName,
        embedder: Arc<dyn EmbeddingFunction>,
        loader: Arc<dyn DataLoader>,
        distance: DistanceMetric,
    ) -> Result<CollectionHandle, DomainError> {
        let info = CollectionInfo::new(
            name.clone(),
            embedder.model().to_string(),
            embedder.dimension(),
            distance,
        );
        self.repo.insert(&info)?;
        info!(
            collection = %name,
            model = %info.embedding_model,
            dimension = info.dimension,
            distance = %distance,
            "Created collection"
        );
        Ok(self.handle(info, embedder, loader))
    }

    /// Fails with `NotFound` when `name` is absent.
    ///
    /// The embedding function must be the one the collection was created
    /// with. A differing model or dimension is logged, not rejected.
    pub fn open(
        &self,
        name: &CollectionName,
        embedder: Arc<dyn EmbeddingFunction>,
        loader: Arc<dyn DataLoader>,
    ) -> Result<CollectionHandle, DomainError> {
        let info = self
            .repo
            .find_by_name(name.as_str())?
            .ok_or_else(|| DomainError::NotFound(format!("Collection '{name}' does not exist")))?;

        if info.embedding_model != embedder.model() {
            warn!(
                collection = %name,
                stored = %info.embedding_model,
                supplied = %embedder.model(),
                "Collection was created with a different embedding model"
            );
        }
        if info.dimension > 0 && embedder.dimension() > 0 && info.dimension != embedder.dimension() {
            warn!(
                collection = %name,
                stored = info.dimension,
                supplied = embedder.dimension(),
                "Embedding dimension differs from the collection's; queries and inserts will fail"
            );
        }
        debug!(collection = %name, "Opened collection");
        Ok(self.handle(info, embedder, loader))
    }

    pub fn get_or_create(
        &self,
        name: &CollectionName,
        embedder: Arc<dyn EmbeddingFunction>,
        loader: Arc<dyn DataLoader>,
        distance: DistanceMetric,
    ) -> Result<CollectionHandle, DomainError> {
        match self.open(name, embedder.clone(), loader.clone()) {
            Ok(handle) => Ok(handle),
            Err(DomainError::NotFound(_)) => {
                match self.create(name, embedder.clone(), loader.clone(), distance) {
                    // Another writer created it between the two calls.
                    Err(DomainError::AlreadyExists(_)) => self.open(name, embedder, loader),
                    other => other,
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Irreversibly removes the collection and all of its entries.
    pub fn delete(&self, name: &CollectionName) -> Result<(), DomainError> {
        if !self.repo.delete_by_name(name.as_str())? {
            return Err(DomainError::NotFound(format!("Collection '{name}' does not exist")));
        }
        info!(collection = %name, "Deleted collection");
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<CollectionInfo>, DomainError> {
        self.repo.list()
    }

    fn handle(
        &self,
        info: CollectionInfo,
        embedder: Arc<dyn EmbeddingFunction>,
        loader: Arc<dyn DataLoader>,
    ) -> CollectionHandle {
        CollectionHandle {
            dimension: AtomicUsize::new(info.dimension),
            info,
            embedder,
            loader,
            store: self.store.clone(),
            repo: self.repo.clone(),
        }
    }
}

/// An open collection bound to one embedding function and one data loader.
pub struct CollectionHandle {
    info: CollectionInfo,
    dimension: AtomicUsize,
    embedder: Arc<dyn EmbeddingFunction>,
    loader: Arc<dyn DataLoader>,
    store: Arc<dyn VectorStore>,
    repo: Arc<dyn CollectionRepository>,
}

impl std::fmt::Debug for CollectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionHandle")
            .field("info", &self.info)
            .field("model", &self.embedder.model())
            .finish_non_exhaustive()
    }
}

impl CollectionHandle {
    pub fn name(&self) -> &CollectionName {
        &self.info.name
    }

    pub fn info(&self) -> &CollectionInfo {
        &self.info
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingFunction> {
        &self.embedder
    }

    pub fn loader(&self) -> &Arc<dyn DataLoader> {
        &self.loader
    }

    pub fn count(&self) -> Result<usize, DomainError> {
        self.store.count(&self.info.id)
    }

    /// Adds every entry or none of them. Ids must be new to the collection
    /// and distinct within the call; duplicates fail with `DuplicateId`.
    /// Returns the number of entries written.
    pub async fn add(&self, entries: Vec<NewEntry>) -> Result<usize, DomainError> {
        if entries.is_empty() {
            return Ok(0);
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            entry.validate()?;
            if !seen.insert(entry.id.as_str()) {
                return Err(DomainError::DuplicateId(entry.id.clone()));
            }
        }
        let ids: Vec<String> = entries.iter().map(|e| e.id.clone()).collect();
        if let Some(existing) = self.store.existing_ids(&self.info.id, &ids)?.into_iter().next() {
            return Err(DomainError::DuplicateId(existing));
        }

        let inputs = entries
            .iter()
            .map(|entry| match (&entry.uri, &entry.document) {
                (Some(uri), _) => self.loader.load(uri).map(EmbeddingInput::Image),
                (None, Some(doc)) => Ok(EmbeddingInput::Text(doc.clone())),
                (None, None) => Err(DomainError::InvalidInput(format!(
                    "Entry '{}' needs a uri or a document",
                    entry.id
                ))),
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        let vectors = self.embedder.embed(&inputs).await?;
        if vectors.len() != entries.len() {
            return Err(DomainError::Embedding(format!(
                "Embedding function returned {} vectors for {} inputs",
                vectors.len(),
                entries.len()
            )));
        }
        for v in &vectors {
            self.check_dimension(v.len())?;
        }

        let stored: Vec<StoredEntry> = entries
            .into_iter()
            .zip(vectors)
            .map(|(entry, embedding)| StoredEntry {
                id: entry.id,
                uri: entry.uri,
                document: entry.document,
                metadata: entry.metadata,
                embedding,
            })
            .collect();
        self.store.add(&self.info.id, &stored)?;
        debug!(collection = %self.info.name, count = stored.len(), "Added entries");
        Ok(stored.len())
    }

    /// Nearest neighbours of `request.input`, at most `request.n` rows.
    pub async fn query(&self, request: QueryRequest) -> Result<ResultSet, DomainError> {
        let vector = match request.input {
            QueryInput::Text(text) => {
                if text.trim().is_empty() {
                    return Err(DomainError::InvalidInput("Query text must not be empty".into()));
                }
                self.embed_one(EmbeddingInput::Text(text)).await?
            }
            QueryInput::Image(img) => {
                if img.width() == 0 || img.height() == 0 {
                    return Err(DomainError::InvalidInput("Query image is empty".into()));
                }
                self.embed_one(EmbeddingInput::Image(img)).await?
            }
            QueryInput::Embedding(v) => v,
        };
        self.check_query_dimension(vector.len())?;

        let hits = self.store.search(
            &self.info.id,
            &vector,
            self.info.distance,
            request.n.value(),
        )?;
        let (ids, distances): (Vec<String>, Vec<f64>) = hits.into_iter().unzip();
        let mut results = self.get(&ids, &request.include)?;
        if request.include.distances {
            results.distances = Some(distances);
        }
        Ok(results)
    }

    /// Entries for `ids` in the given order. `include.distances` is ignored
    /// because there is no query to measure against.
    pub fn get(&self, ids: &[String], include: &Include) -> Result<ResultSet, DomainError> {
        let mut results = ResultSet::empty(include);
        results.distances = None;

        let needs_rows = include.documents || include.uris || include.metadatas || include.data;
        let by_id: HashMap<String, StoredEntry> = if needs_rows {
            self.store
                .get(&self.info.id, ids)?
                .into_iter()
                .map(|e| (e.id.clone(), e))
                .collect()
        } else {
            HashMap::new()
        };

        for id in ids {
            let entry = by_id.get(id);
            if let Some(col) = results.documents.as_mut() {
                col.push(entry.and_then(|e| e.document.clone()));
            }
            if let Some(col) = results.uris.as_mut() {
                col.push(entry.and_then(|e| e.uri.clone()));
            }
            if let Some(col) = results.metadatas.as_mut() {
                col.push(entry.and_then(|e| e.metadata.clone()));
            }
            if let Some(col) = results.data.as_mut() {
                col.push(entry.and_then(|e| e.uri.as_deref()).and_then(|uri| {
                    self.loader
                        .load(uri)
                        .map_err(|e| warn!(id = %id, uri = %uri, error = %e, "Could not resolve entry data"))
                        .ok()
                }));
            }
            results.ids.push(id.clone());
        }
        Ok(results)
    }

    /// The first `limit` entries in insertion order.
    pub fn peek(&self, limit: usize, include: &Include) -> Result<ResultSet, DomainError> {
        let ids = self.store.list_ids(&self.info.id, limit)?;
        self.get(&ids, include)
    }

    async fn embed_one(&self, input: EmbeddingInput) -> Result<Vec<f32>, DomainError> {
        self.embedder
            .embed(std::slice::from_ref(&input))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::Embedding("Embedding function returned no vector".into()))
    }

    /// Records the dimension on first insert if the collection was created
    /// without one; rejects vectors of any other length afterwards.
    fn check_dimension(&self, len: usize) -> Result<(), DomainError> {
        if len == 0 {
            return Err(DomainError::Embedding("Embedding function returned an empty vector".into()));
        }
        match self.dimension.compare_exchange(0, len, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(_) => {
                self.repo.set_dimension(&self.info.id, len)?;
                info!(collection = %self.info.name, dimension = len, "Recorded collection dimension");
                Ok(())
            }
            Err(expected) if expected == len => Ok(()),
            Err(expected) => Err(DomainError::Embedding(format!(
                "Vector dimension {len} does not match collection dimension {expected}"
            ))),
        }
    }

    fn check_query_dimension(&self, len: usize) -> Result<(), DomainError> {
        let expected = self.dimension.load(Ordering::SeqCst);
        if expected > 0 && len != expected {
            return Err(DomainError::InvalidInput(format!(
                "Query vector dimension {len} does not match collection dimension {expected}"
            )));
        }
        Ok(())
    }
}
