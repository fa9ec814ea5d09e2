//! Shared test helpers.
#![allow(dead_code)]

use image::{Rgb, RgbImage};
use imgsearch::infrastructure::embeddings::hashing::HashingEmbedder;
use imgsearch::infrastructure::loaders::image_file::ImageFileLoader;
use imgsearch::Session;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const DIM: usize = 64;

/// A session over a fresh database file. Keep the `TempDir` alive for the
/// duration of the test.
pub fn setup() -> (Session, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let session = session_at(&dir.path().join("test.db"), DIM);
    (session, dir)
}

pub fn session_at(db_file: &Path, dim: usize) -> Session {
    Session::with_providers(
        db_file,
        Arc::new(HashingEmbedder::new(dim)),
        Arc::new(ImageFileLoader::new()),
    )
    .unwrap()
}

/// Writes a solid-colour image; the format follows the extension.
pub fn write_image(dir: &Path, name: &str, rgb: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    let mut img = RgbImage::from_pixel(16, 16, Rgb(rgb));
    // A little structure so different colours do not collapse after resizing.
    img.put_pixel(0, 0, Rgb([255 - rgb[0], 255 - rgb[1], 255 - rgb[2]]));
    img.save(&path).unwrap();
    path
}

/// Writes a file with an image extension that cannot be decoded.
pub fn write_corrupt(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"not really an image").unwrap();
    path
}

pub fn image_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}
