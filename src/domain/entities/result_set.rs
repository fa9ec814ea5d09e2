use crate::domain::values::include::Include;
use image::RgbImage;
use serde::Serialize;

/// Ranked neighbours for one query, stored column-wise.
///
/// `ids` is always populated. Every other column is `None` exactly when the
/// caller did not request it; inside a requested column a row may still be
/// `None` when the entry has no value for that field.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub ids: Vec<String>,
    pub distances: Option<Vec<f64>>,
    pub documents: Option<Vec<Option<String>>>,
    pub uris: Option<Vec<Option<String>>>,
    pub metadatas: Option<Vec<Option<serde_json::Value>>>,
    pub data: Option<Vec<Option<RgbImage>>>,
}

impl ResultSet {
    /// Empty result with the columns of `include` present.
    pub fn empty(include: &Include) -> Self {
        Self {
            ids: Vec::new(),
            distances: include.distances.then(Vec::new),
            documents: include.documents.then(Vec::new),
            uris: include.uris.then(Vec::new),
            metadatas: include.metadatas.then(Vec::new),
            data: include.data.then(Vec::new),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// True when every present column has one value per id.
    pub fn is_well_formed(&self) -> bool {
        let n = self.ids.len();
        self.distances.as_ref().map_or(true, |c| c.len() == n)
            && self.documents.as_ref().map_or(true, |c| c.len() == n)
            && self.uris.as_ref().map_or(true, |c| c.len() == n)
            && self.metadatas.as_ref().map_or(true, |c| c.len() == n)
            && self.data.as_ref().map_or(true, |c| c.len() == n)
    }

    /// Row-wise view for serialization. Image data is summarised by its size.
    pub fn rows(&self) -> Vec<ResultRow> {
        (0..self.ids.len())
            .map(|i| ResultRow {
                rank: i + 1,
                id: self.ids[i].clone(),
                distance: self.distances.as_ref().and_then(|c| c.get(i).copied()),
                document: self.documents.as_ref().map(|c| c.get(i).cloned().flatten()),
                uri: self.uris.as_ref().map(|c| c.get(i).cloned().flatten()),
                metadata: self.metadatas.as_ref().map(|c| c.get(i).cloned().flatten()),
                data: self.data.as_ref().map(|c| {
                    c.get(i)
                        .and_then(|img| img.as_ref())
                        .map(|img| [img.width(), img.height()])
                }),
            })
            .collect()
    }
}

/// One serialized row of a [`ResultSet`]. Fields that were not requested are
/// omitted; requested fields without a value serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub rank: usize,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Option<serde_json::Value>>,
    /// `[width, height]` of the resolved image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Option<[u32; 2]>>,
}
