//! End-to-end API tests against a live PostgreSQL database.
//!
//! Run with:
//! DATABASE_URL=postgres://localhost/biztime_test cargo test -p biztime-server -- --ignored
//!
//! Every test works on its own company codes and removes them first, so the
//! suite can run repeatedly against the same database.

use std::collections::HashSet;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use biztime_server::db::{migrations, CompanyRepo, DbError, PaymentRepo};
use biztime_server::{build_router, create_pool, ServerConfig};

async fn setup(codes: &[&str]) -> (PgPool, Router) {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = create_pool(&url).await.expect("pool creation failed");
    migrations::run(&pool).await.expect("migrations failed");

    for code in codes {
        match CompanyRepo::new(&pool).delete(code).await {
            Ok(()) | Err(DbError::NotFound { .. }) => {}
            Err(e) => panic!("cleanup of {code} failed: {e}"),
        }
    }

    let app = build_router(pool.clone(), &ServerConfig::default());
    (pool, app)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn create_company(app: &Router, code: &str) {
    let (status, _) = send(
        app,
        "POST",
        "/companies",
        Some(json!({"code": code, "name": format!("{code} Inc")})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

async fn create_invoice(app: &Router, code: &str, amt: Value) -> i64 {
    let (status, body) = send(app, "POST", "/invoices", Some(json!({"comp_code": code, "amt": amt}))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["invoice"]["id"].as_i64().unwrap()
}

#[tokio::test]
#[ignore = "requires database"]
async fn create_then_fetch_company() {
    let (_pool, app) = setup(&["it-fetch", "it-fetch-desc"]).await;

    let (status, body) = send(
        &app,
        "POST",
        "/companies",
        Some(json!({"code": "it-fetch", "name": "Fetch Co"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["company"]["code"], "it-fetch");
    assert!(body["company"]["description"].is_null());

    let (status, body) = send(&app, "GET", "/companies/it-fetch", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["company"]["name"], "Fetch Co");
    assert!(body["company"]["description"].is_null());
    assert_eq!(body["company"]["invoices"], json!([]));

    send(
        &app,
        "POST",
        "/companies",
        Some(json!({"code": "it-fetch-desc", "name": "Described Co", "description": "Sells things"})),
    )
    .await;
    let (_, body) = send(&app, "GET", "/companies/it-fetch-desc", None).await;
    assert_eq!(body["company"]["description"], "Sells things");
}

#[tokio::test]
#[ignore = "requires database"]
async fn unknown_company_is_404() {
    let (_pool, app) = setup(&["it-never"]).await;

    let (status, body) = send(&app, "GET", "/companies/it-never", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
#[ignore = "requires database"]
async fn duplicate_company_is_409() {
    let (_pool, app) = setup(&["it-dup"]).await;
    create_company(&app, "it-dup").await;

    let (status, _) = send(
        &app,
        "POST",
        "/companies",
        Some(json!({"code": "it-dup", "name": "Another Name"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires database"]
async fn company_lists_exactly_its_invoices() {
    let (_pool, app) = setup(&["it-owner", "it-other"]).await;
    create_company(&app, "it-owner").await;
    create_company(&app, "it-other").await;

    let mut expected = HashSet::new();
    for amt in [json!(10), json!(0), json!("42.5")] {
        expected.insert(create_invoice(&app, "it-owner", amt).await);
    }
    create_invoice(&app, "it-other", json!(99)).await;

    let (_, body) = send(&app, "GET", "/companies/it-owner", None).await;
    let actual: HashSet<i64> = body["company"]["invoices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect();
    assert_eq!(actual, expected);
}

#[tokio::test]
#[ignore = "requires database"]
async fn invoice_nests_owning_company() {
    let (_pool, app) = setup(&["it-nest"]).await;
    create_company(&app, "it-nest").await;
    let id = create_invoice(&app, "it-nest", json!(300)).await;

    let (status, body) = send(&app, "GET", &format!("/invoices/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["invoice"]["id"], id);
    assert_eq!(body["invoice"]["amt"], 300.0);
    assert_eq!(body["invoice"]["paid"], false);
    assert!(body["invoice"]["paid_date"].is_null());
    assert_eq!(body["invoice"]["company"]["code"], "it-nest");
    assert_eq!(body["invoice"]["company"]["name"], "it-nest Inc");

    let (_, body) = send(&app, "GET", "/invoices", None).await;
    let listed = body["invoices"]
        .as_array()
        .unwrap()
        .iter()
        .any(|i| i["id"] == id && i["comp_code"] == "it-nest");
    assert!(listed);
}

#[tokio::test]
#[ignore = "requires database"]
async fn invoice_for_unknown_company_is_400() {
    let (_pool, app) = setup(&["it-ghost"]).await;

    let (status, body) = send(
        &app,
        "POST",
        "/invoices",
        Some(json!({"comp_code": "it-ghost", "amt": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "company 'it-ghost' does not exist");
}

#[tokio::test]
#[ignore = "requires database"]
async fn deleting_twice_is_404() {
    let (_pool, app) = setup(&["it-twice"]).await;
    create_company(&app, "it-twice").await;
    let id = create_invoice(&app, "it-twice", json!(1)).await;

    let (status, body) = send(&app, "DELETE", &format!("/invoices/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Deleted");
    let (status, _) = send(&app, "DELETE", &format!("/invoices/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/companies/it-twice", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", "/companies/it-twice", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn updating_missing_rows_creates_nothing() {
    let (_pool, app) = setup(&["it-phantom"]).await;

    let (status, _) = send(
        &app,
        "PUT",
        "/companies/it-phantom",
        Some(json!({"name": "Phantom", "description": null})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/companies/it-phantom", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "PUT", "/invoices/2147483647", Some(json!({"amt": 10}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/invoices/2147483647", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn company_round_trip() {
    let (_pool, app) = setup(&["it-round"]).await;
    create_company(&app, "it-round").await;

    let (status, body) = send(
        &app,
        "PUT",
        "/companies/it-round",
        Some(json!({"name": "Renamed Round", "description": "Now described"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["company"]["name"], "Renamed Round");

    let (_, body) = send(&app, "GET", "/companies/it-round", None).await;
    assert_eq!(body["company"]["name"], "Renamed Round");
    assert_eq!(body["company"]["description"], "Now described");

    let (status, _) = send(&app, "DELETE", "/companies/it-round", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/companies/it-round", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn deleting_company_removes_its_invoices() {
    let (_pool, app) = setup(&["it-cascade"]).await;
    create_company(&app, "it-cascade").await;
    let id = create_invoice(&app, "it-cascade", json!(12)).await;

    send(&app, "DELETE", "/companies/it-cascade", None).await;
    let (status, _) = send(&app, "GET", &format!("/invoices/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn paying_and_unpaying_invoice() {
    let (pool, app) = setup(&["it-pay"]).await;
    create_company(&app, "it-pay").await;
    let id = create_invoice(&app, "it-pay", json!(50)).await;

    assert!(!PaymentRepo::new(&pool).check_paid(id as i32).await.unwrap());

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/invoices/{id}"),
        Some(json!({"amt": 75, "paid": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["invoice"]["amt"], 75.0);
    assert_eq!(body["invoice"]["paid"], true);
    let paid_date = body["invoice"]["paid_date"].clone();
    assert!(paid_date.is_string());

    let (_, body) = send(&app, "GET", &format!("/invoices/{id}/paid"), None).await;
    assert_eq!(body, json!({"id": id, "paid": true}));

    // amount-only update keeps the paid state
    let (_, body) = send(&app, "PUT", &format!("/invoices/{id}"), Some(json!({"amt": 80}))).await;
    assert_eq!(body["invoice"]["paid"], true);
    assert_eq!(body["invoice"]["paid_date"], paid_date);

    let (_, body) = send(
        &app,
        "PUT",
        &format!("/invoices/{id}"),
        Some(json!({"amt": 80, "paid": false})),
    )
    .await;
    assert_eq!(body["invoice"]["paid"], false);
    assert!(body["invoice"]["paid_date"].is_null());
}

#[tokio::test]
#[ignore = "requires database"]
async fn check_paid_on_missing_invoice_is_not_found() {
    let (pool, app) = setup(&[]).await;

    let err = PaymentRepo::new(&pool).check_paid(i32::MAX).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { resource: "invoice", .. }));

    let (status, _) = send(&app, "GET", &format!("/invoices/{}/paid", i32::MAX), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
