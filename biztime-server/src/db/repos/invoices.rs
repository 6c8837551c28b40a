//! Invoice repository
//!
//! Handles invoice CRUD:
//! - get_with_company: invoice row, then the owning company through a join
//! - create: unknown company codes surface as a missing reference
//! - update: amount and paid state change in one statement, so the
//!   paid_date transition is atomic

use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};

use crate::models::{Amount, CompanyCode};
use super::{Company, DbError};

/// Invoice record from database
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Invoice {
    pub id: i32,
    pub comp_code: String,
    pub amt: f64,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
}

/// Invoice row for list display
#[derive(Debug, Clone, FromRow)]
pub struct InvoiceSummary {
    pub id: i32,
    pub comp_code: String,
}

/// Invoice with its owning company.
///
/// `company` is `None` only if the company was deleted between the two reads.
#[derive(Debug, Clone)]
pub struct InvoiceWithCompany {
    pub invoice: Invoice,
    pub company: Option<Company>,
}

/// Invoice repository
pub struct InvoiceRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> InvoiceRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all invoices ordered by id.
    pub async fn list(&self) -> Result<Vec<InvoiceSummary>, DbError> {
        let invoices = sqlx::query_as(
            r#"
            SELECT id, comp_code
            FROM invoices
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(invoices)
    }

    /// Get a single invoice by id.
    pub async fn get(&self, id: i32) -> Result<Invoice, DbError> {
        sqlx::query_as(
            r#"
            SELECT id, comp_code, amt, paid, add_date, paid_date
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("invoice", id))
    }

    /// Company that invoice `id` is billed to.
    pub async fn company_for(&self, id: i32) -> Result<Option<Company>, DbError> {
        let company = sqlx::query_as(
            r#"
            SELECT c.code, c.name, c.description
            FROM companies AS c
                JOIN invoices AS i ON i.comp_code = c.code
            WHERE i.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(company)
    }

    /// Get an invoice and resolve its company.
    pub async fn get_with_company(&self, id: i32) -> Result<InvoiceWithCompany, DbError> {
        let invoice = self.get(id).await?;
        let company = self.company_for(id).await?;

        if company.is_none() {
            tracing::warn!(id, comp_code = %invoice.comp_code, "invoice company disappeared during lookup");
        }

        Ok(InvoiceWithCompany { invoice, company })
    }

    /// Insert a new unpaid invoice dated today.
    pub async fn create(&self, comp_code: CompanyCode, amt: Amount) -> Result<Invoice, DbError> {
        tracing::debug!(comp_code = comp_code.as_str(), amt = amt.value(), "creating invoice");

        sqlx::query_as(
            r#"
            INSERT INTO invoices (comp_code, amt)
            VALUES ($1, $2)
            RETURNING id, comp_code, amt, paid, add_date, paid_date
            "#,
        )
        .bind(comp_code.as_str())
        .bind(amt.value())
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::on_foreign_key_violation(e, "company", comp_code.as_str()))
    }

    /// Update the amount and, when `paid` is given, the paid state.
    ///
    /// Paying an unpaid invoice stamps `paid_date` with today, paying an
    /// already paid one keeps the original date, un-paying clears it.
    pub async fn update(
        &self,
        id: i32,
        amt: Amount,
        paid: Option<bool>,
    ) -> Result<Invoice, DbError> {
        sqlx::query_as(
            r#"
            UPDATE invoices
            SET amt = $1,
                paid = COALESCE($2, paid),
                paid_date = CASE
                    WHEN $2::BOOLEAN IS NULL THEN paid_date
                    WHEN $2 AND NOT paid THEN CURRENT_DATE
                    WHEN $2 THEN paid_date
                    ELSE NULL
                END
            WHERE id = $3
            RETURNING id, comp_code, amt, paid, add_date, paid_date
            "#,
        )
        .bind(amt.value())
        .bind(paid)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("invoice", id))
    }

    /// Delete an invoice.
    pub async fn delete(&self, id: i32) -> Result<(), DbError> {
        let deleted: Option<i32> = sqlx::query_scalar(
            r#"
            DELETE FROM invoices
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        deleted
            .map(|_| ())
            .ok_or_else(|| DbError::not_found("invoice", id))
    }
}
