pub mod collection_name;
pub mod distance;
pub mod image_extension;
pub mod include;
pub mod query;
pub mod result_count;
