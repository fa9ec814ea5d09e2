use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingFunction, EmbeddingInput};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, RgbImage};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Remote CLIP-style multimodal embedder speaking the Jina `/v1/embeddings`
/// protocol, where each input is either `{"text": ...}` or `{"image": <base64>}`.
pub struct ClipHttpProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    dimension: usize,
}

#[derive(Serialize)]
struct ClipRequest {
    model: String,
    input: Vec<ClipInput>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ClipInput {
    Text { text: String },
    Image { image: String },
}

#[derive(Deserialize)]
struct ClipResponse {
    data: Vec<ClipEmbedding>,
}

#[derive(Deserialize)]
struct ClipEmbedding {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

impl ClipHttpProvider {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        dimension: Option<usize>,
    ) -> Self {
        let model = model.unwrap_or_else(|| "jina-clip-v2".to_string());
        let dimension = dimension.unwrap_or_else(|| Self::model_dimension(&model));
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url: base_url.unwrap_or_else(|| "https://api.jina.ai".to_string()),
            dimension,
        }
    }

    /// 0 for unknown models; the collection records the real length on
    /// first insert.
    fn model_dimension(model: &str) -> usize {
        match model {
            "jina-clip-v1" => 768,
            "jina-clip-v2" => 1024,
            _ => 0,
        }
    }

    fn encode_image(img: &RgbImage) -> Result<String, DomainError> {
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| DomainError::Decode(format!("Failed to encode image for upload: {e}")))?;
        Ok(STANDARD.encode(png))
    }
}

#[async_trait::async_trait]
impl EmbeddingFunction for ClipHttpProvider {
    async fn embed(&self, inputs: &[EmbeddingInput]) -> Result<Vec<Vec<f32>>, DomainError> {
        if inputs.is_empty() {
            return Ok(vec![]);
        }

        let input = inputs
            .iter()
            .map(|i| match i {
                EmbeddingInput::Text(text) => Ok(ClipInput::Text { text: text.clone() }),
                EmbeddingInput::Image(img) => Ok(ClipInput::Image {
                    image: Self::encode_image(img)?,
                }),
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        let url = format!("{}/v1/embeddings", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&ClipRequest {
                model: self.model.clone(),
                input,
            })
            .send()
            .await
            .map_err(|e| DomainError::Embedding(format!("Embedding API error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Embedding(format!("Embedding API {status}: {body}")));
        }

        let mut result: ClipResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Embedding(format!("Parse error: {e}")))?;
        if result.data.len() != inputs.len() {
            return Err(DomainError::Embedding(format!(
                "Embedding API returned {} vectors for {} inputs",
                result.data.len(),
                inputs.len()
            )));
        }
        result.data.sort_by_key(|d| d.index.unwrap_or(usize::MAX));
        Ok(result.data.into_iter().map(|d| d.embedding).collect())
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

    #[test]
    fn test_request_shape() {
        let req = ClipRequest {
            model: "jina-clip-v2".into(),
            input: vec![
                ClipInput::Text { text: "a building".into() },
                ClipInput::Image { image: "AAAA".into() },
            ],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["input"][0]["text"], "a building");
        assert_eq!(json["input"][1]["image"], "AAAA");
    }

    #[test]
    fn test_known_model_dimensions() {
        let p = ClipHttpProvider::new(String::new(), Some("jina-clip-v1".into()), None, None);
        assert_eq!(p.dimension(), 768);
        let p = ClipHttpProvider::new(String::new(), None, None, Some(256));
        assert_eq!(p.dimension(), 256);
        assert_eq!(p.model(), "jina-clip-v2");
    }

    #[test]
    fn test_unknown_model_dimension_is_unset() {
        let p = ClipHttpProvider::new(String::new(), Some("ViT-L-14".into()), None, None);
        assert_eq!(p.dimension(), 0);
    }

    #[test]
    fn test_encoded_image_is_png() {
        let img = RgbImage::new(2, 2);
        let b64 = ClipHttpProvider::encode_image(&img).unwrap();
        let bytes = STANDARD.decode(b64).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
