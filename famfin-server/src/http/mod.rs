//! HTTP server layer
//!
//! Axum server with:
//! - one generic CRUD router per entity kind
//! - CORS (localhost only by default)
//! - Request tracing
//! - Graceful shutdown
//! - JSON `detail` error responses

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, ServerConfig, ServerError};
