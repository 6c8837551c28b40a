//! Invoice endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::db::repos::{Invoice, InvoiceRepo, InvoiceSummary, InvoiceWithCompany, PaymentRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, ValidInvoiceId};
use crate::http::server::AppState;
use crate::models::{Amount, CompanyCode};
use super::companies::CompanyResponse;
use super::StatusResponse;

/// Create invoice request
#[derive(Deserialize)]
pub struct CreateInvoiceRequest {
    pub comp_code: Option<String>,
    /// Number or numeric string, validated by `Amount`
    pub amt: Option<JsonValue>,
}

/// Update invoice request
#[derive(Deserialize)]
pub struct UpdateInvoiceRequest {
    pub amt: Option<JsonValue>,
    pub paid: Option<bool>,
}

/// Full invoice row response
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub id: i32,
    pub comp_code: String,
    pub amt: f64,
    pub paid: bool,
    pub add_date: String,
    pub paid_date: Option<String>,
}

impl From<Invoice> for InvoiceResponse {
    fn from(i: Invoice) -> Self {
        Self {
            id: i.id,
            comp_code: i.comp_code,
            amt: i.amt,
            paid: i.paid,
            add_date: i.add_date.to_string(),
            paid_date: i.paid_date.map(|d| d.to_string()),
        }
    }
}

/// Invoice detail with the owning company nested
#[derive(Debug, Serialize)]
pub struct InvoiceDetailResponse {
    pub id: i32,
    pub amt: f64,
    pub paid: bool,
    pub add_date: String,
    pub paid_date: Option<String>,
    pub company: Option<CompanyResponse>,
}

impl From<InvoiceWithCompany> for InvoiceDetailResponse {
    fn from(i: InvoiceWithCompany) -> Self {
        let invoice = i.invoice;
        Self {
            id: invoice.id,
            amt: invoice.amt,
            paid: invoice.paid,
            add_date: invoice.add_date.to_string(),
            paid_date: invoice.paid_date.map(|d| d.to_string()),
            company: i.company.map(CompanyResponse::from),
        }
    }
}

/// Single invoice envelope: `{invoice: {...}}`
#[derive(Serialize)]
pub struct InvoiceEnvelope<T> {
    pub invoice: T,
}

/// Invoice list item
#[derive(Serialize)]
pub struct InvoiceSummaryResponse {
    pub id: i32,
    pub comp_code: String,
}

impl From<InvoiceSummary> for InvoiceSummaryResponse {
    fn from(i: InvoiceSummary) -> Self {
        Self {
            id: i.id,
            comp_code: i.comp_code,
        }
    }
}

/// Invoice list envelope: `{invoices: [...]}`
#[derive(Serialize)]
pub struct InvoiceListResponse {
    pub invoices: Vec<InvoiceSummaryResponse>,
}

/// Payment status response
#[derive(Serialize)]
pub struct PaidResponse {
    pub id: i32,
    pub paid: bool,
}

/// GET /invoices - list all invoices
async fn list_invoices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<InvoiceListResponse>, ApiError> {
    let invoices = InvoiceRepo::new(&state.pool).list().await?;

    Ok(Json(InvoiceListResponse {
        invoices: invoices.into_iter().map(InvoiceSummaryResponse::from).collect(),
    }))
}

/// GET /invoices/{id} - get an invoice with its company
async fn get_invoice(
    State(state): State<Arc<AppState>>,
    ValidInvoiceId(id): ValidInvoiceId,
) -> Result<Json<InvoiceEnvelope<InvoiceDetailResponse>>, ApiError> {
    let invoice = InvoiceRepo::new(&state.pool).get_with_company(id).await?;

    Ok(Json(InvoiceEnvelope {
        invoice: InvoiceDetailResponse::from(invoice),
    }))
}

/// GET /invoices/{id}/paid - payment status of an invoice
async fn get_paid(
    State(state): State<Arc<AppState>>,
    ValidInvoiceId(id): ValidInvoiceId,
) -> Result<Json<PaidResponse>, ApiError> {
    let paid = PaymentRepo::new(&state.pool).check_paid(id).await?;
    Ok(Json(PaidResponse { id, paid }))
}

/// POST /invoices - create an invoice
async fn create_invoice(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceEnvelope<InvoiceResponse>>), ApiError> {
    let comp_code = CompanyCode::required(req.comp_code.as_deref())?;
    let amt = Amount::from_json(req.amt.as_ref())?;

    let invoice = InvoiceRepo::new(&state.pool).create(comp_code, amt).await?;
    tracing::info!(id = invoice.id, comp_code = %invoice.comp_code, "invoice created");

    Ok((
        StatusCode::CREATED,
        Json(InvoiceEnvelope {
            invoice: InvoiceResponse::from(invoice),
        }),
    ))
}

/// PUT /invoices/{id} - update amount and optionally paid state
async fn update_invoice(
    State(state): State<Arc<AppState>>,
    ValidInvoiceId(id): ValidInvoiceId,
    JsonBody(req): JsonBody<UpdateInvoiceRequest>,
) -> Result<Json<InvoiceEnvelope<InvoiceResponse>>, ApiError> {
    let amt = Amount::from_json(req.amt.as_ref())?;

    let invoice = InvoiceRepo::new(&state.pool).update(id, amt, req.paid).await?;

    Ok(Json(InvoiceEnvelope {
        invoice: InvoiceResponse::from(invoice),
    }))
}

/// DELETE /invoices/{id} - delete an invoice
async fn delete_invoice(
    State(state): State<Arc<AppState>>,
    ValidInvoiceId(id): ValidInvoiceId,
) -> Result<Json<StatusResponse>, ApiError> {
    InvoiceRepo::new(&state.pool).delete(id).await?;
    tracing::info!(id, "invoice deleted");

    Ok(Json(StatusResponse::deleted()))
}

/// Invoice routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route(
            "/invoices/{id}",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
        .route("/invoices/{id}/paid", get(get_paid))
}
