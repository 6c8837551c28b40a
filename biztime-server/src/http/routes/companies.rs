//! Company endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{Company, CompanyRepo, CompanySummary, CompanyWithInvoices};
use crate::http::error::ApiError;
use crate::http::extractors::JsonBody;
use crate::http::server::AppState;
use crate::models::{CompanyCode, CompanyName};
use super::StatusResponse;

/// Create company request
#[derive(Deserialize)]
pub struct CreateCompanyRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Update company request
#[derive(Deserialize)]
pub struct UpdateCompanyRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Company response
#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoices: Option<Vec<i32>>,
}

impl From<Company> for CompanyResponse {
    fn from(c: Company) -> Self {
        Self {
            code: c.code,
            name: c.name,
            description: c.description,
            invoices: None,
        }
    }
}

impl From<CompanyWithInvoices> for CompanyResponse {
    fn from(c: CompanyWithInvoices) -> Self {
        Self {
            invoices: Some(c.invoices),
            ..Self::from(c.company)
        }
    }
}

/// Single company envelope: `{company: {...}}`
#[derive(Serialize)]
pub struct CompanyEnvelope {
    pub company: CompanyResponse,
}

/// Company list item
#[derive(Serialize)]
pub struct CompanySummaryResponse {
    pub code: String,
    pub name: String,
}

impl From<CompanySummary> for CompanySummaryResponse {
    fn from(c: CompanySummary) -> Self {
        Self {
            code: c.code,
            name: c.name,
        }
    }
}

/// Company list envelope: `{companies: [...]}`
#[derive(Serialize)]
pub struct CompanyListResponse {
    pub companies: Vec<CompanySummaryResponse>,
}

/// GET /companies - list all companies
async fn list_companies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CompanyListResponse>, ApiError> {
    let companies = CompanyRepo::new(&state.pool).list().await?;

    Ok(Json(CompanyListResponse {
        companies: companies.into_iter().map(CompanySummaryResponse::from).collect(),
    }))
}

/// GET /companies/{code} - get a company with its invoice ids
async fn get_company(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<CompanyEnvelope>, ApiError> {
    let company = CompanyRepo::new(&state.pool).get_with_invoices(&code).await?;

    Ok(Json(CompanyEnvelope {
        company: CompanyResponse::from(company),
    }))
}

/// POST /companies - create a company
async fn create_company(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyEnvelope>), ApiError> {
    let code = CompanyCode::required(req.code.as_deref())?;
    let name = CompanyName::required(req.name.as_deref())?;

    let company = CompanyRepo::new(&state.pool)
        .create(code, name, req.description.as_deref())
        .await?;
    tracing::info!(code = %company.code, "company created");

    Ok((
        StatusCode::CREATED,
        Json(CompanyEnvelope {
            company: CompanyResponse::from(company),
        }),
    ))
}

/// PUT /companies/{code} - replace name and description
async fn update_company(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    JsonBody(req): JsonBody<UpdateCompanyRequest>,
) -> Result<Json<CompanyEnvelope>, ApiError> {
    let name = CompanyName::required(req.name.as_deref())?;

    let company = CompanyRepo::new(&state.pool)
        .update(&code, name, req.description.as_deref())
        .await?;

    Ok(Json(CompanyEnvelope {
        company: CompanyResponse::from(company),
    }))
}

/// DELETE /companies/{code} - delete a company and its invoices
async fn delete_company(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    CompanyRepo::new(&state.pool).delete(&code).await?;
    tracing::info!(code = %code, "company deleted");

    Ok(Json(StatusResponse::deleted()))
}

/// Company routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/companies", get(list_companies).post(create_company))
        .route(
            "/companies/{code}",
            get(get_company).put(update_company).delete(delete_company),
        )
}
