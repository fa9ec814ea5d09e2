pub mod collection_repository;
pub mod data_loader;
pub mod embedding_port;
pub mod vector_store;
