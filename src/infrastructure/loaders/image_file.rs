use crate::domain::error::DomainError;
use crate::domain::ports::data_loader::DataLoader;
use image::RgbImage;
use std::path::{Path, PathBuf};

/// Loads images from the local filesystem. Accepts plain paths and
/// `file://` URIs; everything is converted to RGB8.
#[derive(Debug, Default, Clone)]
pub struct ImageFileLoader;

impl ImageFileLoader {
    pub fn new() -> Self {
        Self
    }

    fn uri_to_path(uri: &str) -> Result<PathBuf, DomainError> {
        let path = match uri.strip_prefix("file://") {
            Some(rest) => rest,
            None if uri.contains("://") => {
                return Err(DomainError::InvalidInput(format!(
                    "Unsupported URI scheme: {uri}"
                )))
            }
            None => uri,
        };
        if path.is_empty() {
            return Err(DomainError::InvalidInput("Empty image URI".into()));
        }
        Ok(PathBuf::from(path))
    }

    /// Decodes `path` and normalises it to three channels.
    pub fn load_path(path: &Path) -> Result<RgbImage, DomainError> {
        let img = image::open(path)
            .map_err(|e| DomainError::Decode(format!("{}: {e}", path.display())))?;
        Ok(img.to_rgb8())
    }
}

impl DataLoader for ImageFileLoader {
    fn load(&self, uri: &str) -> Result<RgbImage, DomainError> {
        let path = Self::uri_to_path(uri)?;
        Self::load_path(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_rgba_is_normalized_to_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alpha.png");
        RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 128])).save(&path).unwrap();

        let uri = format!("file://{}", path.display());
        let img = ImageFileLoader::new().load(&uri).unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn test_missing_file_is_backend_failure() {
        let err = ImageFileLoader::new().load("/definitely/not/here.png").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BackendFailure);
    }

    #[test]
    fn test_remote_scheme_rejected() {
        let err = ImageFileLoader::new().load("https://example.com/a.png").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
