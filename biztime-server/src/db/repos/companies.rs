//! Company repository
//!
//! Handles company CRUD:
//! - get_with_invoices: company row, then the ids of its invoices
//! - create/update: unique violations on code or name become conflicts
//! - delete: invoices go with the company via ON DELETE CASCADE

use sqlx::{FromRow, PgPool};

use crate::models::{CompanyCode, CompanyName};
use super::DbError;

/// Name of the unique constraint on `companies.name`
const NAME_UNIQUE_CONSTRAINT: &str = "companies_name_key";

/// Company record from database
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Company {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

/// Company row for list display
#[derive(Debug, Clone, FromRow)]
pub struct CompanySummary {
    pub code: String,
    pub name: String,
}

/// Company with the ids of every invoice billed to it
#[derive(Debug, Clone)]
pub struct CompanyWithInvoices {
    pub company: Company,
    pub invoices: Vec<i32>,
}

/// Company repository
pub struct CompanyRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CompanyRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all companies ordered by name.
    pub async fn list(&self) -> Result<Vec<CompanySummary>, DbError> {
        let companies = sqlx::query_as(
            r#"
            SELECT code, name
            FROM companies
            ORDER BY name
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(companies)
    }

    /// Get a single company by code.
    pub async fn get(&self, code: &str) -> Result<Company, DbError> {
        sqlx::query_as(
            r#"
            SELECT code, name, description
            FROM companies
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("company", code))
    }

    /// Ids of all invoices billed to `code`, ascending.
    pub async fn invoice_ids(&self, code: &str) -> Result<Vec<i32>, DbError> {
        let ids = sqlx::query_scalar(
            r#"
            SELECT id
            FROM invoices
            WHERE comp_code = $1
            ORDER BY id
            "#,
        )
        .bind(code)
        .fetch_all(self.pool)
        .await?;

        Ok(ids)
    }

    /// Get a company and resolve its invoice ids.
    ///
    /// The invoice query depends on the company existing, so the two
    /// statements run one after the other.
    pub async fn get_with_invoices(&self, code: &str) -> Result<CompanyWithInvoices, DbError> {
        let company = self.get(code).await?;
        let invoices = self.invoice_ids(&company.code).await?;
        tracing::debug!(code, invoices = invoices.len(), "resolved company invoices");

        Ok(CompanyWithInvoices { company, invoices })
    }

    /// Insert a new company.
    pub async fn create(
        &self,
        code: CompanyCode,
        name: CompanyName,
        description: Option<&str>,
    ) -> Result<Company, DbError> {
        tracing::debug!(code = code.as_str(), "creating company");

        sqlx::query_as(
            r#"
            INSERT INTO companies (code, name, description)
            VALUES ($1, $2, $3)
            RETURNING code, name, description
            "#,
        )
        .bind(code.as_str())
        .bind(name.as_str())
        .bind(description)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict(e, &code, &name))
    }

    /// Replace name and description of an existing company.
    pub async fn update(
        &self,
        code: &str,
        name: CompanyName,
        description: Option<&str>,
    ) -> Result<Company, DbError> {
        sqlx::query_as(
            r#"
            UPDATE companies
            SET name = $1, description = $2
            WHERE code = $3
            RETURNING code, name, description
            "#,
        )
        .bind(name.as_str())
        .bind(description)
        .bind(code)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if unique_on_name(&e) {
                DbError::on_unique_violation(e, "company name", name.as_str())
            } else {
                DbError::Sqlx(e)
            }
        })?
        .ok_or_else(|| DbError::not_found("company", code))
    }

    /// Delete a company and, through the foreign key, its invoices.
    pub async fn delete(&self, code: &str) -> Result<(), DbError> {
        let deleted: Option<String> = sqlx::query_scalar(
            r#"
            DELETE FROM companies
            WHERE code = $1
            RETURNING code
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?;

        match deleted {
            Some(_) => {
                tracing::debug!(code, "company deleted");
                Ok(())
            }
            None => Err(DbError::not_found("company", code)),
        }
    }
}

fn unique_on_name(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.constraint() == Some(NAME_UNIQUE_CONSTRAINT))
}

fn conflict(e: sqlx::Error, code: &CompanyCode, name: &CompanyName) -> DbError {
    if unique_on_name(&e) {
        DbError::on_unique_violation(e, "company name", name.as_str())
    } else {
        DbError::on_unique_violation(e, "company", code.as_str())
    }
}
