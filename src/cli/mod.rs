pub mod config;
pub mod once;
