pub mod clip_http;
pub mod hashing;
