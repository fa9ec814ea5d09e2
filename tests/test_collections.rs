mod common;

use common::{session_at, setup};
use imgsearch::domain::entities::entry::NewEntry;
use imgsearch::domain::error::{DomainError, ErrorKind};
use imgsearch::domain::ports::embedding_port::{EmbeddingFunction, EmbeddingInput};
use imgsearch::domain::values::collection_name::CollectionName;
use imgsearch::domain::values::distance::DistanceMetric;
use imgsearch::infrastructure::loaders::image_file::ImageFileLoader;
use imgsearch::Session;
use std::sync::Arc;

/// Reports no dimension up front, like a remote model the client does not know.
struct UnsizedEmbedder;

#[async_trait::async_trait]
impl EmbeddingFunction for UnsizedEmbedder {
    async fn embed(&self, inputs: &[EmbeddingInput]) -> Result<Vec<Vec<f32>>, DomainError> {
        Ok(inputs.iter().map(|_| vec![0.6, 0.8, 0.0]).collect())
    }

    fn model(&self) -> &str {
        "unsized"
    }

    fn dimension(&self) -> usize {
        0
    }
}

fn name(s: &str) -> CollectionName {
    CollectionName::new(s).unwrap()
}

#[test]
fn test_create_then_open() {
    let (session, _dir) = setup();
    let created = session.create_collection(&name("photos"), DistanceMetric::L2).unwrap();
    assert_eq!(created.count().unwrap(), 0);
    assert_eq!(created.info().dimension, common::DIM);

    let opened = session.open_collection(&name("photos")).unwrap();
    assert_eq!(opened.info().id, created.info().id);
}

#[test]
fn test_create_existing_fails_already_exists() {
    let (session, _dir) = setup();
    session.create_collection(&name("photos"), DistanceMetric::L2).unwrap();
    let err = session
        .create_collection(&name("photos"), DistanceMetric::Cosine)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
}

#[test]
fn test_open_missing_fails_not_found() {
    let (session, _dir) = setup();
    let err = session.open_collection(&name("nothing")).unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[test]
fn test_get_or_create_is_idempotent() {
    let (session, _dir) = setup();
    let a = session.get_or_create_collection(&name("photos"), DistanceMetric::L2).unwrap();
    let b = session.get_or_create_collection(&name("photos"), DistanceMetric::L2).unwrap();
    assert_eq!(a.info().id, b.info().id);
    assert_eq!(session.list_collections().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_then_open_fails_not_found() {
    let (session, _dir) = setup();
    let handle = session.create_collection(&name("photos"), DistanceMetric::L2).unwrap();
    handle
        .add(vec![imgsearch::domain::entities::entry::NewEntry::from_document("d1", "harbor at dusk")])
        .await
        .unwrap();

    session.delete_collection(&name("photos")).unwrap();
    let err = session.open_collection(&name("photos")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    // Recreating starts empty: entries went with the collection.
    let fresh = session.create_collection(&name("photos"), DistanceMetric::L2).unwrap();
    assert_eq!(fresh.count().unwrap(), 0);
}

#[test]
fn test_delete_missing_fails_not_found() {
    let (session, _dir) = setup();
    let err = session.delete_collection(&name("ghost")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_collections_persist_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("persist.db");
    {
        let session = session_at(&db, common::DIM);
        session.create_collection(&name("kept"), DistanceMetric::Cosine).unwrap();
        session.close();
    }
    let session = session_at(&db, common::DIM);
    let handle = session.open_collection(&name("kept")).unwrap();
    assert_eq!(handle.info().distance, DistanceMetric::Cosine);
}

#[test]
fn test_open_with_different_embedder_is_allowed() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("mismatch.db");
    session_at(&db, 64)
        .create_collection(&name("photos"), DistanceMetric::L2)
        .unwrap();

    // Mismatch is logged, not rejected.
    let other = session_at(&db, 32);
    let handle = other.open_collection(&name("photos")).unwrap();
    assert_eq!(handle.info().dimension, 64);
}

#[tokio::test]
async fn test_first_insert_records_unknown_dimension() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::with_providers(
        &dir.path().join("unsized.db"),
        Arc::new(UnsizedEmbedder),
        Arc::new(ImageFileLoader::new()),
    )
    .unwrap();
    let handle = session
        .create_collection(&name("docs"), DistanceMetric::Cosine)
        .unwrap();
    assert_eq!(handle.info().dimension, 0);

    let added = handle
        .add(vec![
            NewEntry::from_document("a", "red brick"),
            NewEntry::from_document("b", "blue sea"),
        ])
        .await
        .unwrap();
    assert_eq!(added, 2);

    let stored = &session.list_collections().unwrap()[0];
    assert_eq!(stored.dimension, 3);
    assert_eq!(session.open_collection(&name("docs")).unwrap().info().dimension, 3);
}
