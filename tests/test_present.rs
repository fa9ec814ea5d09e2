mod common;

use common::{image_dir, setup, write_image};
use imgsearch::application::query::QueryService;
use imgsearch::domain::entities::entry::NewEntry;
use imgsearch::domain::values::collection_name::CollectionName;
use imgsearch::domain::values::distance::DistanceMetric;
use imgsearch::domain::values::include::{Include, IncludeField};

#[tokio::test]
async fn test_missing_file_yields_empty_gallery() {
    let (session, _db) = setup();
    let images = image_dir();
    let path = write_image(images.path(), "only.png", [90, 90, 90]);

    let handle = session
        .create_collection(&CollectionName::default(), DistanceMetric::L2)
        .unwrap();
    handle
        .add(vec![NewEntry::from_uri("only", path.to_string_lossy())])
        .await
        .unwrap();
    std::fs::remove_file(&path).unwrap();

    let results = QueryService::new(handle)
        .query_by_text("anything", 1, Include::default())
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert!(session.presenter().present(&results).is_empty());
}

#[tokio::test]
async fn test_gallery_follows_ranking() {
    let (session, _db) = setup();
    let images = image_dir();
    write_image(images.path(), "dark.png", [10, 10, 10]);
    write_image(images.path(), "mid.png", [128, 128, 128]);
    write_image(images.path(), "light.png", [245, 245, 245]);

    let name = CollectionName::default();
    session.ingest(&name, images.path(), Default::default()).await.unwrap();
    let service = QueryService::new(session.open_collection(&name).unwrap());

    let results = service
        .query_by_image(images.path().join("dark.png"), 3, Include::default())
        .await
        .unwrap();
    let gallery = session.presenter().present(&results);
    assert_eq!(gallery.len(), 3);
    assert_eq!(gallery[0].id, results.ids[0]);
    assert!(gallery.windows(2).all(|w| w[0].distance <= w[1].distance));
    assert!(gallery[0].caption.ends_with("(distance: 0.0000)"));
    assert!(gallery[0].caption.starts_with(&gallery[0].id));
    assert_eq!(gallery[0].image.dimensions(), (16, 16));
}

#[tokio::test]
async fn test_results_without_uris_are_not_presented() {
    let (session, _db) = setup();
    let images = image_dir();
    write_image(images.path(), "a.png", [1, 1, 1]);
    let name = CollectionName::default();
    session.ingest(&name, images.path(), Default::default()).await.unwrap();

    let results = QueryService::new(session.open_collection(&name).unwrap())
        .query_by_text("a", 1, Include::from_fields(&[IncludeField::Distances]))
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert!(session.presenter().present(&results).is_empty());
}
