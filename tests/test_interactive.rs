mod common;

use common::{image_dir, setup, write_image};
use imgsearch::application::interactive::{QueryForm, QueryMode};
use imgsearch::application::query::QueryService;
use imgsearch::cli::interactive::run_interactive;
use imgsearch::domain::values::collection_name::CollectionName;
use std::path::PathBuf;

async fn service_with_images(session: &imgsearch::Session) -> (QueryService, tempfile::TempDir) {
    let images = image_dir();
    write_image(images.path(), "red.png", [220, 20, 20]);
    write_image(images.path(), "green.png", [20, 220, 20]);
    let name = CollectionName::default();
    session.ingest(&name, images.path(), Default::default()).await.unwrap();
    (QueryService::new(session.open_collection(&name).unwrap()), images)
}

#[tokio::test]
async fn test_form_text_submit_fills_gallery() {
    let (session, _db) = setup();
    let (service, _images) = service_with_images(&session).await;

    let mut form = QueryForm::new();
    form.text = "building".into();
    form.set_result_count(10).unwrap();
    let gallery = form.submit(&service, &session.presenter()).await;
    assert_eq!(gallery.len(), 2);
}

#[tokio::test]
async fn test_form_image_mode_uses_image_field() {
    let (session, _db) = setup();
    let (service, images) = service_with_images(&session).await;

    let mut form = QueryForm::new();
    form.mode = QueryMode::Image;
    form.text = "ignored in image mode".into();
    form.image_path = Some(images.path().join("green.png"));
    form.set_result_count(1).unwrap();
    let gallery = form.submit(&service, &session.presenter()).await;
    assert_eq!(gallery.len(), 1);
    assert!(gallery[0].caption.contains("(distance: 0.0000)"));
}

#[tokio::test]
async fn test_form_failures_show_empty_gallery() {
    let (session, _db) = setup();
    let (service, _images) = service_with_images(&session).await;
    let presenter = session.presenter();

    let mut form = QueryForm::new();
    form.mode = QueryMode::Image;
    assert!(form.submit(&service, &presenter).await.is_empty());

    form.image_path = Some(PathBuf::from("/no/such/query.png"));
    assert!(form.submit(&service, &presenter).await.is_empty());

    form.mode = QueryMode::Text;
    form.text = String::new();
    assert!(form.submit(&service, &presenter).await.is_empty());
}

#[tokio::test]
async fn test_terminal_session() {
    let (session, _db) = setup();
    let (service, _images) = service_with_images(&session).await;
    let presenter = session.presenter();
    let gallery = tempfile::tempdir().unwrap();

    let input: &[u8] = b"n 11\ntext building\nn 1\ngo\nbogus\nquit\nn 3\n";
    let mut out = Vec::new();
    run_interactive(&service, &presenter, input, &mut out, Some(gallery.path()))
        .await
        .unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("between 1 and 10"));
    assert!(text.contains(" 1. "));
    assert!(text.contains("(distance: "));
    assert!(!text.contains(" 2. "));
    assert!(text.contains("Unknown command: 'bogus'"));
    assert_eq!(std::fs::read_dir(gallery.path()).unwrap().count(), 1);
}
