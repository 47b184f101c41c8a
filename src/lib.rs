//! Todo CRUD service backed by MongoDB.
//!
//! Each route maps to a single storage operation. Around that sits the
//! request glue: identifier validation, mapping storage outcomes to HTTP
//! status codes, and keeping Prometheus metrics current.
//!
//! ```text
//! HTTP request -> handler -> TodoStore -> Metrics -> HTTP response
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`store`]: Storage gateway (MongoDB and in-memory)
//! - [`metrics`]: Prometheus metrics registry
//! - [`api`]: HTTP handlers, routes and timing middleware
//! - [`lifecycle`]: Database connection startup and shutdown
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod metrics;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
