pub mod analyzer;
pub mod config;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod store;
pub mod types;
