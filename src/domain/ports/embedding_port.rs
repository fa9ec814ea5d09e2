use crate::domain::error::DomainError;
use image::RgbImage;

/// One item to embed. Text and images map into the same vector space.
#[derive(Debug, Clone)]
pub enum EmbeddingInput {
    Text(String),
    Image(RgbImage),
}

#[async_trait::async_trait]
pub trait EmbeddingFunction: Send + Sync {
    /// Returns exactly one vector per input, in input order.
    async fn embed(&self, inputs: &[EmbeddingInput]) -> Result<Vec<Vec<f32>>, DomainError>;

    /// Identifier recorded on collections created with this function.
    fn model(&self) -> &str;

    fn dimension(&self) -> usize;
}
