//! Route handlers organized by resource

use serde::Serialize;

pub mod health;
pub mod companies;
pub mod invoices;

/// Acknowledgement returned by DELETE endpoints
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn deleted() -> Self {
        Self { status: "Deleted" }
    }
}
