pub mod collections;
pub mod ingest;
pub mod interactive;
pub mod present;
pub mod query;
