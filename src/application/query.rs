use crate::application::collections::CollectionHandle;
use crate::domain::entities::result_set::ResultSet;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingInput;
use crate::domain::values::include::Include;
use crate::domain::values::query::{QueryInput, QueryRequest};
use crate::domain::values::result_count::ResultCount;
use image::{DynamicImage, RgbImage};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// How image queries reach the store. Both rank identically because they run
/// the same embedding function and distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageQueryStrategy {
    /// Hand the pixels to the collection and let it embed them.
    QueryImage,
    /// Embed here and query by vector.
    #[default]
    QueryEmbedding,
}

impl FromStr for ImageQueryStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" | "query-image" => Ok(Self::QueryImage),
            "embedding" | "query-embedding" => Ok(Self::QueryEmbedding),
            _ => Err(format!("Unknown image query strategy: '{s}'. Use 'image' or 'embedding'")),
        }
    }
}

/// An image to query with: already-decoded pixels, or a path resolved through
/// the collection's data loader.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Pixels(DynamicImage),
    Path(PathBuf),
}

impl From<DynamicImage> for ImageSource {
    fn from(img: DynamicImage) -> Self {
        ImageSource::Pixels(img)
    }
}

impl From<RgbImage> for ImageSource {
    fn from(img: RgbImage) -> Self {
        ImageSource::Pixels(DynamicImage::ImageRgb8(img))
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

pub struct QueryService {
    collection: Arc<CollectionHandle>,
    strategy: ImageQueryStrategy,
}

impl QueryService {
    pub fn new(collection: Arc<CollectionHandle>) -> Self {
        Self {
            collection,
            strategy: ImageQueryStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: ImageQueryStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn collection(&self) -> &Arc<CollectionHandle> {
        &self.collection
    }

    pub async fn query_by_text(
        &self,
        text: &str,
        n: usize,
        include: Include,
    ) -> Result<ResultSet, DomainError> {
        let n = ResultCount::new(n)?;
        debug!(collection = %self.collection.name(), n = n.value(), "Text query");
        self.collection
            .query(QueryRequest::new(QueryInput::Text(text.to_string()), n).include(include))
            .await
    }

    pub async fn query_by_image(
        &self,
        image: impl Into<ImageSource>,
        n: usize,
        include: Include,
    ) -> Result<ResultSet, DomainError> {
        let n = ResultCount::new(n)?;
        let pixels = self.resolve(image.into())?;
        debug!(
            collection = %self.collection.name(),
            n = n.value(),
            strategy = ?self.strategy,
            width = pixels.width(),
            height = pixels.height(),
            "Image query"
        );

        let input = match self.strategy {
            ImageQueryStrategy::QueryImage => QueryInput::Image(pixels),
            ImageQueryStrategy::QueryEmbedding => {
                let vectors = self
                    .collection
                    .embedder()
                    .embed(&[EmbeddingInput::Image(pixels)])
                    .await?;
                let vector = vectors.into_iter().next().ok_or_else(|| {
                    DomainError::Embedding("Embedding function returned no vector".into())
                })?;
                QueryInput::Embedding(vector)
            }
        };
        self.collection
            .query(QueryRequest::new(input, n).include(include))
            .await
    }

    fn resolve(&self, source: ImageSource) -> Result<RgbImage, DomainError> {
        let img = match source {
            ImageSource::Pixels(img) => img.to_rgb8(),
            ImageSource::Path(path) => self.collection.loader().load(&path.to_string_lossy())?,
        };
        if img.width() == 0 || img.height() == 0 {
            return Err(DomainError::InvalidInput("Query image is empty".into()));
        }
        Ok(img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parse() {
        assert_eq!("image".parse::<ImageQueryStrategy>().unwrap(), ImageQueryStrategy::QueryImage);
        assert_eq!(
            "Query-Embedding".parse::<ImageQueryStrategy>().unwrap(),
            ImageQueryStrategy::QueryEmbedding
        );
        assert!("vector".parse::<ImageQueryStrategy>().is_err());
    }
}
