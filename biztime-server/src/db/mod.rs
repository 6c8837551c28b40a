//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - One `PgPool` handle shared through application state, no globals
//! - Referential integrity lives in the schema; constraint violations are
//!   classified into `DbError` instead of pre-checked
//! - Dependent reads run sequentially, single-row writes are one statement

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;
