use crate::application::collections::CollectionHandle;
use crate::domain::entities::entry::NewEntry;
use crate::domain::error::{DomainError, ErrorKind};
use crate::domain::values::image_extension::ImageExtension;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use walkdir::WalkDir;

pub const DEFAULT_BATCH_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Maximum entries submitted per `add` call.
    pub batch_size: usize,
    /// Attach `file_name` and `source_dir` metadata to each entry.
    pub record_metadata: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            record_metadata: false,
        }
    }
}

/// A batch that could not be added. The rest of the run is unaffected.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    /// Index of the batch's first file in the discovered list.
    pub offset: usize,
    pub size: usize,
    pub reason: String,
    #[serde(skip)]
    pub cause: Option<ErrorKind>,
}

impl BatchFailure {
    pub fn to_error(&self) -> DomainError {
        DomainError::PartialBatch {
            offset: self.offset,
            size: self.size,
            reason: self.reason.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub collection: String,
    pub discovered: usize,
    pub attempted: usize,
    pub added: usize,
    pub failed_batches: Vec<BatchFailure>,
}

impl IngestReport {
    pub fn is_complete(&self) -> bool {
        self.failed_batches.is_empty() && self.added == self.discovered
    }
}

/// Supported image files directly inside `dir`, sorted by file name.
/// Subdirectories are not descended into. Paths that are not valid UTF-8
/// are skipped with a warning.
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>, DomainError> {
    if !dir.is_dir() {
        return Err(DomainError::InvalidInput(format!(
            "{} is not a valid directory",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || !ImageExtension::is_supported(entry.path()) {
            continue;
        }
        // URIs are strings; a lossy name would not resolve back to the file.
        if entry.path().to_str().is_none() {
            warn!(path = %entry.path().display(), "Skipping file whose name is not valid UTF-8");
            continue;
        }
        files.push(entry.into_path());
    }
    Ok(files)
}

/// Adds every image in a directory to a collection in bounded batches.
pub struct BatchIngestor {
    collection: Arc<CollectionHandle>,
    options: IngestOptions,
}

impl BatchIngestor {
    pub fn new(collection: Arc<CollectionHandle>, options: IngestOptions) -> Self {
        Self { collection, options }
    }

    pub async fn ingest_directory(&self, dir: &Path) -> Result<IngestReport, DomainError> {
        if self.options.batch_size == 0 {
            return Err(DomainError::InvalidInput("Batch size must be at least 1".into()));
        }
        let files = discover_images(dir)?;
        let mut report = IngestReport {
            collection: self.collection.name().to_string(),
            discovered: files.len(),
            ..Default::default()
        };

        if files.is_empty() {
            warn!(dir = %dir.display(), "No image files found");
            return Ok(report);
        }

        let entries: Vec<NewEntry> = files.iter().map(|path| self.entry_for(dir, path)).collect();
        let batches = entries.len().div_ceil(self.options.batch_size);
        info!(
            collection = %self.collection.name(),
            files = entries.len(),
            batches,
            batch_size = self.options.batch_size,
            "Adding images to collection"
        );

        for (index, batch) in entries.chunks(self.options.batch_size).enumerate() {
            let offset = index * self.options.batch_size;
            report.attempted += batch.len();
            match self.collection.add(batch.to_vec()).await {
                Ok(added) => {
                    report.added += added;
                    info!(
                        batch = index + 1,
                        of = batches,
                        done = offset + batch.len(),
                        total = entries.len(),
                        "Batch added"
                    );
                }
                Err(e) => {
                    error!(offset, size = batch.len(), error = %e, "Batch failed, continuing");
                    report.failed_batches.push(BatchFailure {
                        offset,
                        size: batch.len(),
                        reason: e.to_string(),
                        cause: Some(e.kind()),
                    });
                }
            }
        }

        info!(
            discovered = report.discovered,
            attempted = report.attempted,
            added = report.added,
            failed_batches = report.failed_batches.len(),
            "Ingestion complete"
        );
        Ok(report)
    }

    fn entry_for(&self, dir: &Path, path: &Path) -> NewEntry {
        let entry = NewEntry::from_uri(uuid::Uuid::new_v4().to_string(), path.to_string_lossy());
        if !self.options.record_metadata {
            return entry;
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        entry.with_metadata(serde_json::json!({
            "file_name": file_name,
            "source_dir": dir.to_string_lossy(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.PNG", "a.jpg", "a.txt", "c.webp", "noext"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let found: Vec<String> = discover_images(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(found, vec!["a.jpg", "b.PNG", "c.webp"]);
    }

    #[test]
    fn test_discover_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("deep.png"), b"x").unwrap();
        assert!(discover_images(dir.path()).unwrap().is_empty());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_discover_skips_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.png"), b"x").unwrap();
        fs::write(dir.path().join(OsStr::from_bytes(b"\xffodd.png")), b"x").unwrap();

        let found = discover_images(dir.path()).unwrap();
        assert_eq!(found, vec![dir.path().join("a.png")]);
    }

    #[test]
    fn test_missing_directory_is_invalid_input() {
        let err = discover_images(Path::new("/no/such/dir")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_batch_failure_converts_to_partial_batch() {
        let failure = BatchFailure {
            offset: 10,
            size: 3,
            reason: "decode".into(),
            cause: Some(ErrorKind::BackendFailure),
        };
        assert_eq!(failure.to_error().kind(), ErrorKind::PartialBatchFailure);
    }
}
