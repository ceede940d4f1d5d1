//! Minimal greeting and health-probe HTTP service.
//!
//! The service answers three static routes, intended to run inside a
//! Kubernetes (Minikube) pod where `/ready` and `/health` are wired up as
//! the readiness and liveness probes:
//!
//! ```text
//! GET /        200  {"message":"Hello from FastAPI on Minikube 🚀"}
//! GET /ready   200  {"status":"ok"}
//! GET /health  200  {"status":"ok"}
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`api`]: HTTP routes and handlers
//! - [`metrics`]: Request metrics and Prometheus exporter
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod utils;

pub use config::Config;
pub use error::{Result, ServiceError};
