//! API integration tests
//!
//! Drive the full router (`/api` + middleware) with in-process requests.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use company_membership::api;
use company_membership::api::middleware::CORRELATION_ID_HEADER;
use company_membership::{CompanyType, TransactionType};

async fn test_app() -> (Router, company_membership::db::DbPool) {
    let pool = common::setup_test_db().await;
    (api::app(pool.clone()), pool)
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn registration(name: &str, cuit: &str, company_type: &str) -> String {
    json!({ "name": name, "cuit": cuit, "type": company_type }).to_string()
}

// =========================================================================
// Health & middleware
// =========================================================================

#[tokio::test]
async fn test_health() {
    let (app, _pool) = test_app().await;

    let (status, body) = send(&app, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_correlation_id_is_echoed() {
    let (app, _pool) = test_app().await;
    let id = "5f0c6f5e-8a47-4f43-9d36-0e3f4b1f2a10";

    let request = Request::builder()
        .uri("/api/health")
        .header(CORRELATION_ID_HEADER, id)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()[&CORRELATION_ID_HEADER], id);

    // minted when absent
    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert!(response.headers().contains_key(&CORRELATION_ID_HEADER));
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let (app, _pool) = test_app().await;

    for request in [
        get("/api/health"),
        get("/api/companies/recent-memberships"),
        post_json("/api/companies/membership", "{not json".to_string()),
        get("/api/nowhere"),
    ] {
        let response = app.clone().oneshot(request).await.unwrap();
        let headers = response.headers();

        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
        assert_eq!(
            headers[header::STRICT_TRANSPORT_SECURITY],
            "max-age=31536000; includeSubDomains; preload"
        );
        assert_eq!(
            headers[header::REFERRER_POLICY],
            "no-referrer, strict-origin-when-cross-origin"
        );
        assert!(headers[header::CONTENT_SECURITY_POLICY]
            .to_str()
            .unwrap()
            .contains("object-src 'none'"));
    }
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _pool) = test_app().await;

    let response = app.oneshot(get("/api/companies")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =========================================================================
// POST /api/companies/membership
// =========================================================================

#[tokio::test]
async fn test_register_membership_created() {
    let (app, _pool) = test_app().await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/companies/membership",
            registration("TechCorp Argentina", "20-12345678-9", "CORPORATE"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["companyName"], "TechCorp Argentina");
    assert_eq!(body["companyType"], "CORPORATE");
    assert_eq!(body["membershipStatus"], "PENDING");
    assert_eq!(
        body["message"],
        "Company \"TechCorp Argentina\" registered successfully with membership status: PENDING"
    );
    assert!(body["companyId"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(body["membershipId"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_register_duplicate_cuit_conflict() {
    let (app, pool) = test_app().await;
    common::insert_company(&pool, "c-1", "Existing SA", "20-12345678-9", CompanyType::Pyme, 10).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/companies/membership",
            registration("Another SA", "20-12345678-9", "PYME"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_code"], "company_with_cuit_already_exists");
    assert_eq!(body["error"], "Company with CUIT 20-12345678-9 already exists");
}

#[tokio::test]
async fn test_register_invalid_cuit_bad_request() {
    let (app, _pool) = test_app().await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/companies/membership",
            registration("Acme SA", "20123456789", "PYME"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "invalid_cuit_format");
}

#[tokio::test]
async fn test_register_malformed_payload_bad_request() {
    let (app, pool) = test_app().await;

    for payload in [
        "{not json".to_string(),
        json!({ "name": "Acme SA", "cuit": "20-12345678-9" }).to_string(),
        registration("Acme SA", "20-12345678-9", "SMALL"),
        json!({ "name": "Acme SA", "cuit": "20-11111111-2", "type": "PYME", "active": true })
            .to_string(),
    ] {
        let (status, body) = send(&app, post_json("/api/companies/membership", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "invalid_request");
    }

    assert_eq!(
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM companies")
            .fetch_one(&pool)
            .await
            .unwrap(),
        0
    );
}

// =========================================================================
// GET reports
// =========================================================================

#[tokio::test]
async fn test_recent_memberships_endpoint() {
    let (app, pool) = test_app().await;
    let recent = common::insert_company(&pool, "c-1", "Alpha SA", "20-11111111-1", CompanyType::Pyme, 5).await;
    let old = common::insert_company(&pool, "c-2", "Legacy SA", "20-22222222-2", CompanyType::Corporate, 90).await;
    common::insert_membership(&pool, "m-1", &recent, 5).await;
    common::insert_membership(&pool, "m-2", &old, 60).await;

    let (status, body) = send(&app, get("/api/companies/recent-memberships")).await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "m-1");
    assert_eq!(items[0]["companyId"], "c-1");
    assert_eq!(items[0]["companyName"], "Alpha SA");
    assert_eq!(items[0]["companyCuit"], "20-11111111-1");
    assert_eq!(items[0]["membershipStatus"], "PENDING");
    assert!(items[0]["requestDate"].as_str().is_some_and(|d| d.ends_with('Z')));
    assert!(items[0].get("approvalDate").is_none());
}

#[tokio::test]
async fn test_companies_with_recent_transfers_endpoint() {
    let (app, pool) = test_app().await;
    let a = common::insert_company(&pool, "c-a", "Alpha SA", "20-11111111-1", CompanyType::Pyme, 90).await;
    let b = common::insert_company(&pool, "c-b", "Beta SRL", "20-22222222-2", CompanyType::Corporate, 90).await;
    common::insert_transaction(&pool, "t-1", &a, TransactionType::Transfer, 1).await;
    common::insert_transaction(&pool, "t-2", &a, TransactionType::Transfer, 20).await;
    common::insert_transaction(&pool, "t-3", &b, TransactionType::Deposit, 1).await;

    let (status, body) = send(&app, get("/api/companies/with-recent-transfers")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["id"], "c-a");
    assert_eq!(body[0]["type"], "PYME");
    assert_eq!(body[0]["active"], true);
    assert_eq!(body[0]["transactionCount"], 2);
}

#[tokio::test]
async fn test_reports_empty() {
    let (app, _pool) = test_app().await;

    let (status, body) = send(&app, get("/api/companies/recent-memberships")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, get("/api/companies/with-recent-transfers")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
