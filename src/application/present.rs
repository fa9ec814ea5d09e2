use crate::domain::entities::result_set::ResultSet;
use crate::domain::ports::data_loader::DataLoader;
use image::RgbImage;
use std::sync::Arc;
use tracing::warn;

/// One displayable result.
#[derive(Debug, Clone)]
pub struct GalleryItem {
    pub id: String,
    pub distance: f64,
    pub image: RgbImage,
    pub caption: String,
}

pub fn caption(id: &str, distance: f64) -> String {
    format!("{id} (distance: {distance:.4})")
}

/// Turns ranked results into captioned RGB images, keeping rank order.
pub struct ResultPresenter {
    loader: Arc<dyn DataLoader>,
}

impl ResultPresenter {
    pub fn new(loader: Arc<dyn DataLoader>) -> Self {
        Self { loader }
    }

    /// Never fails. Malformed result sets (no distances, no uris, or columns
    /// that do not line up with the ids) produce an empty gallery, and rows
    /// whose image cannot be resolved are skipped.
    pub fn present(&self, results: &ResultSet) -> Vec<GalleryItem> {
        let (Some(distances), Some(uris)) = (&results.distances, &results.uris) else {
            if !results.is_empty() {
                warn!("Result set lacks distances or uris, nothing to present");
            }
            return Vec::new();
        };
        if !results.is_well_formed() {
            warn!(rows = results.len(), "Result set columns are inconsistent, nothing to present");
            return Vec::new();
        }

        let mut items = Vec::with_capacity(results.len());
        for (i, id) in results.ids.iter().enumerate() {
            let distance = distances[i];
            let preloaded = results
                .data
                .as_ref()
                .and_then(|col| col[i].as_ref())
                .cloned();
            let image = match (preloaded, uris[i].as_deref()) {
                (Some(img), _) => img,
                (None, Some(uri)) => match self.loader.load(uri) {
                    Ok(img) => img,
                    Err(e) => {
                        warn!(id = %id, uri = %uri, error = %e, "Skipping result with unresolvable image");
                        continue;
                    }
                },
                (None, None) => {
                    warn!(id = %id, "Skipping result without a content reference");
                    continue;
                }
            };
            items.push(GalleryItem {
                id: id.clone(),
                distance,
                caption: caption(id, distance),
                image,
            });
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;
    use image::Rgb;

    struct FixedLoader;

    impl DataLoader for FixedLoader {
        fn load(&self, uri: &str) -> Result<RgbImage, DomainError> {
            match uri {
                "ok" => Ok(RgbImage::from_pixel(2, 2, Rgb([1, 2, 3]))),
                _ => Err(DomainError::Decode(format!("cannot load {uri}"))),
            }
        }
    }

    fn presenter() -> ResultPresenter {
        ResultPresenter::new(Arc::new(FixedLoader))
    }

    #[test]
    fn test_caption_has_four_decimals() {
        assert_eq!(caption("abc", 0.123456), "abc (distance: 0.1235)");
        assert_eq!(caption("x", 2.0), "x (distance: 2.0000)");
    }

    #[test]
    fn test_skips_unresolvable_and_keeps_order() {
        let rs = ResultSet {
            ids: vec!["first".into(), "broken".into(), "third".into()],
            distances: Some(vec![0.1, 0.2, 0.3]),
            uris: Some(vec![Some("ok".into()), Some("missing".into()), Some("ok".into())]),
            ..Default::default()
        };
        let items = presenter().present(&rs);
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "third"]);
        assert_eq!(items[1].caption, "third (distance: 0.3000)");
    }

    #[test]
    fn test_missing_columns_yield_empty() {
        let rs = ResultSet {
            ids: vec!["a".into()],
            distances: Some(vec![0.1]),
            ..Default::default()
        };
        assert!(presenter().present(&rs).is_empty());
    }

    #[test]
    fn test_preloaded_data_is_used() {
        let rs = ResultSet {
            ids: vec!["a".into()],
            distances: Some(vec![0.0]),
            uris: Some(vec![Some("missing".into())]),
            data: Some(vec![Some(RgbImage::new(4, 4))]),
            ..Default::default()
        };
        let items = presenter().present(&rs);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].image.dimensions(), (4, 4));
    }
}
