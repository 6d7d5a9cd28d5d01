// Library exports for the binary and integration tests
pub mod config;
pub mod error;
pub mod models;
pub mod services;
