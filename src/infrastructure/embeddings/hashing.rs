//! Deterministic, dependency-free embedder for offline use and tests.
//!
//! Text is embedded with signed feature hashing over lowercase word tokens.
//! Images are reduced to a coarse colour grid plus a luminance histogram, and
//! each feature is hashed into the same buckets. Outputs are L2-normalised.
//! The two modalities share a dimension but are not semantically aligned. Use
//! a real multimodal model when text-to-image relevance matters.

use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingFunction, EmbeddingInput};
use image::imageops::FilterType;
use image::RgbImage;

pub const DEFAULT_DIMENSION: usize = 512;
const GRID: u32 = 8;
const HISTOGRAM_BINS: usize = 16;
const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

pub struct HashingEmbedder {
    dimension: usize,
    model: String,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        let dimension = dimension.max(1);
        Self {
            dimension,
            model: format!("hashing-{dimension}"),
        }
    }

    fn fnv1a(bytes: &[u8]) -> u64 {
        bytes.iter().fold(FNV_OFFSET, |h, b| (h ^ *b as u64).wrapping_mul(FNV_PRIME))
    }

    /// Signed feature hashing: bucket from the hash, sign from its top bit.
    fn bucket(&self, key: &[u8]) -> (usize, f32) {
        let h = Self::fnv1a(key);
        let idx = (h % self.dimension as u64) as usize;
        let sign = if h >> 63 == 1 { -1.0 } else { 1.0 };
        (idx, sign)
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0_f32; self.dimension];
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let (idx, sign) = self.bucket(token.as_bytes());
            v[idx] += sign;
        }
        normalize(v)
    }

    fn embed_image(&self, img: &RgbImage) -> Vec<f32> {
        let mut v = vec![0.0_f32; self.dimension];
        if img.width() == 0 || img.height() == 0 {
            return v;
        }

        let small = image::imageops::resize(img, GRID, GRID, FilterType::Triangle);
        let mut features = Vec::with_capacity((GRID * GRID * 3) as usize + HISTOGRAM_BINS);
        for px in small.pixels() {
            features.extend(px.0.iter().map(|c| *c as f32 / 255.0));
        }

        let mut histogram = [0.0_f32; HISTOGRAM_BINS];
        for px in img.pixels() {
            let [r, g, b] = px.0;
            let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
            let bin = ((luma / 256.0) * HISTOGRAM_BINS as f32) as usize;
            histogram[bin.min(HISTOGRAM_BINS - 1)] += 1.0;
        }
        let total = (img.width() * img.height()) as f32;
        features.extend(histogram.iter().map(|c| c / total));

        for (i, f) in features.into_iter().enumerate() {
            let (idx, sign) = self.bucket(&(i as u64).to_le_bytes());
            v[idx] += sign * f;
        }
        normalize(v)
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

fn normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
    v
}

#[async_trait::async_trait]
impl EmbeddingFunction for HashingEmbedder {
    async fn embed(&self, inputs: &[EmbeddingInput]) -> Result<Vec<Vec<f32>>, DomainError> {
        Ok(inputs
            .iter()
            .map(|input| match input {
                EmbeddingInput::Text(text) => self.embed_text(text),
                EmbeddingInput::Image(img) => self.embed_image(img),
            })
            .collect())
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[tokio::test]
    async fn test_text_embedding_is_deterministic_and_normalized() {
        let e = HashingEmbedder::new(64);
        let input = [EmbeddingInput::Text("Old brick building".into())];
        let a = e.embed(&input).await.unwrap();
        let b = e.embed(&input).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].len(), 64);
        let norm: f32 = a[0].iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_image_embeddings_separate_colours() {
        let e = HashingEmbedder::new(64);
        let red = RgbImage::from_pixel(16, 16, Rgb([255, 0, 0]));
        let pinkish = RgbImage::from_pixel(16, 16, Rgb([250, 10, 10]));
        let blue = RgbImage::from_pixel(16, 16, Rgb([0, 0, 255]));
        let v = e
            .embed(&[
                EmbeddingInput::Image(red),
                EmbeddingInput::Image(pinkish),
                EmbeddingInput::Image(blue),
            ])
            .await
            .unwrap();
        let near = crate::domain::values::distance::DistanceMetric::L2.distance(&v[0], &v[1]);
        let far = crate::domain::values::distance::DistanceMetric::L2.distance(&v[0], &v[2]);
        assert!(near < far);
    }

    #[test]
    fn test_model_name_reflects_dimension() {
        assert_eq!(HashingEmbedder::new(128).model(), "hashing-128");
        assert_eq!(HashingEmbedder::new(0).dimension(), 1);
    }
}
