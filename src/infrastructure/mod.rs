pub mod embeddings;
pub mod loaders;
pub mod sqlite;
