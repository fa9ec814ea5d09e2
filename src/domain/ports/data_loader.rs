use crate::domain::error::DomainError;
use image::RgbImage;

/// Resolves a stored content reference to decoded, 3-channel pixels.
pub trait DataLoader: Send + Sync {
    fn load(&self, uri: &str) -> Result<RgbImage, DomainError>;
}
