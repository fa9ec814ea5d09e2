pub mod collection;
pub mod entry;
pub mod result_set;
