//! HTTP API module for the greeting and probe endpoints.

pub mod handlers;
pub mod routes;

pub use routes::{create_app, create_router, ApiDoc};
