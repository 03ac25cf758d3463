//! Branch Office Core - branch office directory service
//!
//! This crate provides the REST API, orchestration and persistence layers
//! for managing branch offices, including soft delete, restore and
//! keyword search.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod openapi;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
