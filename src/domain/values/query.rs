use crate::domain::values::include::Include;
use crate::domain::values::result_count::ResultCount;
use image::RgbImage;

/// What a query is compared against. Exactly one form per request.
#[derive(Debug, Clone)]
pub enum QueryInput {
    /// Embedded with the collection's embedding function.
    Text(String),
    /// Decoded pixels, embedded with the collection's embedding function.
    Image(RgbImage),
    /// A precomputed vector, used as-is.
    Embedding(Vec<f32>),
}

#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub input: QueryInput,
    pub n: ResultCount,
    pub include: Include,
}

impl QueryRequest {
    pub fn new(input: QueryInput, n: ResultCount) -> Self {
        Self {
            input,
            n,
            include: Include::default(),
        }
    }

    pub fn include(mut self, include: Include) -> Self {
        self.include = include;
        self
    }
}
