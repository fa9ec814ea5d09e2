use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// File extensions accepted by the ingestor. Matching is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageExtension {
    Png,
    Jpg,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    Webp,
}

impl ImageExtension {
    pub const ALL: [ImageExtension; 7] = [
        ImageExtension::Png,
        ImageExtension::Jpg,
        ImageExtension::Jpeg,
        ImageExtension::Gif,
        ImageExtension::Bmp,
        ImageExtension::Tiff,
        ImageExtension::Webp,
    ];

    /// Extension of `path` if it is on the allow-list.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    pub fn is_supported(path: &Path) -> bool {
        Self::from_path(path).is_some()
    }
}

impl fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageExtension::Png => write!(f, "png"),
            ImageExtension::Jpg => write!(f, "jpg"),
            ImageExtension::Jpeg => write!(f, "jpeg"),
            ImageExtension::Gif => write!(f, "gif"),
            ImageExtension::Bmp => write!(f, "bmp"),
            ImageExtension::Tiff => write!(f, "tiff"),
            ImageExtension::Webp => write!(f, "webp"),
        }
    }
}

impl FromStr for ImageExtension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(ImageExtension::Png),
            "jpg" => Ok(ImageExtension::Jpg),
            "jpeg" => Ok(ImageExtension::Jpeg),
            "gif" => Ok(ImageExtension::Gif),
            "bmp" => Ok(ImageExtension::Bmp),
            "tiff" => Ok(ImageExtension::Tiff),
            "webp" => Ok(ImageExtension::Webp),
            _ => Err(format!("Unsupported image extension: {s}")),
        }
    }
}
