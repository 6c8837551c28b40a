//! Command implementations for the biztime CLI

pub mod migrate;
pub mod serve;

pub use migrate::run_migrate;
pub use serve::run_serve;

use anyhow::{Context, Result};

/// Resolve the database URL from a flag/env value.
fn require_database_url(database_url: Option<String>) -> Result<String> {
    database_url
        .filter(|url| !url.trim().is_empty())
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env file")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_url_required() {
        assert!(require_database_url(None).is_err());
        assert!(require_database_url(Some("  ".into())).is_err());
        assert_eq!(
            require_database_url(Some("postgres://localhost/biztime".into())).unwrap(),
            "postgres://localhost/biztime"
        );
    }
}
