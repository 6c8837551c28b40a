//! Payment status lookups

use sqlx::PgPool;

use super::DbError;

/// Payment repository
pub struct PaymentRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PaymentRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Whether invoice `id` is marked paid.
    pub async fn check_paid(&self, id: i32) -> Result<bool, DbError> {
        sqlx::query_scalar(
            r#"
            SELECT paid
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("invoice", id))
    }
}
