//! Repository implementations for database access
//!
//! Each repository borrows the pool and owns the SQL for one table:
//! - Parameterized statements only
//! - Missing rows surface as `DbError::NotFound`
//! - Constraint violations are classified, not pre-checked

pub mod companies;
pub mod invoices;
pub mod payments;

pub use companies::{Company, CompanyRepo, CompanySummary, CompanyWithInvoices};
pub use invoices::{Invoice, InvoiceRepo, InvoiceSummary, InvoiceWithCompany};
pub use payments::PaymentRepo;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {resource} '{id}' already exists")]
    Conflict { resource: &'static str, id: String },

    #[error("missing reference: {resource} '{id}' does not exist")]
    MissingReference { resource: &'static str, id: String },
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Classify a unique violation as a conflict on `resource`.
    pub(crate) fn on_unique_violation(e: sqlx::Error, resource: &'static str, id: &str) -> Self {
        if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
            Self::Conflict {
                resource,
                id: id.to_owned(),
            }
        } else {
            Self::Sqlx(e)
        }
    }

    /// Classify a foreign key violation as a missing `resource`.
    pub(crate) fn on_foreign_key_violation(
        e: sqlx::Error,
        resource: &'static str,
        id: &str,
    ) -> Self {
        if matches!(&e, sqlx::Error::Database(db) if db.is_foreign_key_violation()) {
            Self::MissingReference {
                resource,
                id: id.to_owned(),
            }
        } else {
            Self::Sqlx(e)
        }
    }
}
