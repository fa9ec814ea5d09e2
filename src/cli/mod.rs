pub mod commands;
pub mod gallery;
pub mod interactive;
