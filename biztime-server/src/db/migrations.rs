//! Schema migrations for the companies and invoices tables
//!
//! Every statement is idempotent, so `run` is safe on each startup.

use sqlx::PgPool;

use super::repos::DbError;

const SCHEMA: &[(&str, &str)] = &[
    (
        "companies",
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            code TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT
        )
        "#,
    ),
    (
        "invoices",
        r#"
        CREATE TABLE IF NOT EXISTS invoices (
            id SERIAL PRIMARY KEY,
            comp_code TEXT NOT NULL REFERENCES companies(code) ON DELETE CASCADE,
            amt DOUBLE PRECISION NOT NULL CHECK (amt >= 0),
            paid BOOLEAN NOT NULL DEFAULT FALSE,
            add_date DATE NOT NULL DEFAULT CURRENT_DATE,
            paid_date DATE
        )
        "#,
    ),
    (
        "idx_invoices_comp_code",
        "CREATE INDEX IF NOT EXISTS idx_invoices_comp_code ON invoices(comp_code)",
    ),
];

/// Create tables and indexes that don't exist yet.
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running schema migrations...");

    for (name, statement) in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
        tracing::debug!(object = *name, "migration applied");
    }

    tracing::info!("Schema migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoices_created_after_companies() {
        let names: Vec<_> = SCHEMA.iter().map(|(name, _)| *name).collect();
        let companies = names.iter().position(|n| *n == "companies").unwrap();
        let invoices = names.iter().position(|n| *n == "invoices").unwrap();
        assert!(companies < invoices);
    }

    #[test]
    fn statements_are_idempotent() {
        for (name, statement) in SCHEMA {
            assert!(statement.contains("IF NOT EXISTS"), "{name} is not idempotent");
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn run_twice() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");
        run(&pool).await.expect("first run");
        run(&pool).await.expect("second run");
    }
}
