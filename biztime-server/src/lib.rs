//! biztime-server: REST API over companies and their invoices
//!
//! Layers:
//! - [`models`]: validated request input
//! - [`db`]: connection pool, schema migrations and repositories
//! - [`http`]: axum router, handlers and error mapping

pub mod db;
pub mod http;
pub mod models;

pub use db::{create_pool, create_pool_with_options, DbError};
pub use http::{build_router, run_server, ApiError, ServerConfig, ServerError};
