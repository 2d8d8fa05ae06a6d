// supplyboard-server/tests/api_test.rs
// End-to-end tests through the full router (auth, role guard, charts)

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::session::{Role, Session};
use supplyboard_client::{DataSnapshot, StaticSource};
use supplyboard_server::auth::{JwtConfig, JwtService};
use supplyboard_server::core::state::FILE_SOURCE;
use supplyboard_server::{Config, ServerState, build_router};
use tower::ServiceExt;

const SECRET: &str = "api-test-secret-that-is-long-enough!";

fn fixture_json() -> Value {
    json!({
        "fetched_at": "2024-06-30T12:00:00Z",
        "orders": [
            {"id": 1, "created_at": "2024-01-10 10:00:00", "state": "complete", "store_id": 1, "customer_id": 1,
             "items": [{"product_id": 1, "name": "Huile", "qty_invoiced": 5, "row_total_incl_tax": 50}]},
            {"id": 2, "created_at": "2024-02-20 10:00:00", "state": "complete", "store_id": 1, "customer_id": 2,
             "items": [{"product_id": 1, "name": "Huile", "qty_invoiced": 2, "row_total_incl_tax": 20},
                       {"product_id": 2, "name": "Semoule", "qty_invoiced": 4, "row_total_incl_tax": 16,
                        "qty_refunded": 1, "amount_refunded": 4}]},
            {"id": 3, "created_at": "2024-03-15 10:00:00", "state": "canceled", "store_id": 1, "customer_id": 3,
             "items": [{"product_id": 1, "name": "Huile", "qty_invoiced": 100, "row_total_incl_tax": 1000}]},
            {"id": 4, "created_at": "2024-04-05 10:00:00", "state": "processing", "store_id": 2, "customer_id": 3,
             "items": [{"product_id": 3, "name": "Pates", "qty_invoiced": 6, "row_total_incl_tax": 18}]},
            {"id": 5, "created_at": "2023-11-02 10:00:00", "state": "complete", "store_id": 2, "customer_id": 1,
             "items": [{"product_id": 2, "name": "Semoule", "qty_invoiced": 1, "row_total_incl_tax": 4,
                        "qty_refunded": 1, "amount_refunded": 4}]}
        ],
        "products": [
            {"product_id": 1, "name": "Huile", "sku": "HU-1", "manufacturer": "7", "price": 10, "cost": 6,
             "category_ids": [10], "stock_item": {"qty": 20, "is_in_stock": true}},
            {"product_id": 2, "name": "Semoule", "sku": "SE-2", "manufacturer": "8", "price": 4, "cost": 3,
             "category_ids": [10, 11], "stock_item": {"qty": 0, "is_in_stock": false}},
            {"product_id": 3, "name": "Pates", "sku": "PA-3", "manufacturer": "7", "price": 3, "cost": 2,
             "category_ids": [11], "stock_item": {"qty": 8, "is_in_stock": true}}
        ],
        "customers": [
            {"id": 1, "retailer_profile": "Epicerie", "addresses": [{"region": "Tunis"}]},
            {"id": 2, "retailer_profile": "0", "addresses": [{"region": "Sfax"}]},
            {"id": 3, "retailer_profile": "Superette", "addresses": [{"region": "Tunis"}]}
        ],
        "categories": [
            {"categoryId": 10, "nameCategory": "Epicerie"},
            {"categoryId": 11, "nameCategory": "Pates"}
        ],
        "warehouses": [{"id": 1, "name": "Tunis"}, {"id": 2, "name": "Sfax"}],
        "suppliers": [
            {"manufacturer_id": 7, "company_name": "Zitouna"},
            {"manufacturer_id": 8, "company_name": "Moulins"}
        ],
        "products_stock": [
            {"product_id": 1, "stock": [{"store_id": 1, "quantity": 12}, {"store_id": 2, "quantity": 3}]},
            {"product_id": 2, "stock": [{"store_id": 1, "quantity": 0}]},
            {"product_id": 3, "stock": [{"store_id": 2, "quantity": 9}]}
        ]
    })
}

fn fixture() -> DataSnapshot {
    serde_json::from_value(fixture_json()).unwrap()
}

fn app_with(snapshot: DataSnapshot) -> Router {
    let state = ServerState::with_source(
        Config::for_tests(SECRET),
        "fixture",
        Arc::new(StaticSource::Memory(snapshot)),
    );
    build_router(state)
}

fn app() -> Router {
    app_with(fixture())
}

fn token(session: &Session) -> String {
    JwtService::with_config(JwtConfig::with_secret(SECRET))
        .generate_token(session)
        .unwrap()
}

fn supplier_token() -> String {
    token(&Session::new("u7", "zitouna", Role::Supplier, Some("7".into())).unwrap())
}

fn admin_token() -> String {
    token(&Session::new("u1", "root", Role::Superadmin, None).unwrap())
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::GET, uri, token).await
}

fn numbers(value: &Value) -> Vec<f64> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect()
}

// ========== Session guard ==========

#[tokio::test]
async fn test_health_is_public() {
    let (status, body) = get(&app(), "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_missing_token_redirects_to_sign_in() {
    let (status, body) = get(&app(), "/api/session", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);
    assert_eq!(body["details"]["redirect"], "/auth/signin");
}

#[tokio::test]
async fn test_foreign_token_is_rejected() {
    let foreign = JwtService::with_config(JwtConfig::with_secret("some-other-secret-also-long-enough!!"))
        .generate_token(&Session::new("u1", "root", Role::Superadmin, None).unwrap())
        .unwrap();
    let (status, body) = get(&app(), "/api/charts/sales_trend", Some(&foreign)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["details"]["redirect"], "/auth/signin");
}

#[tokio::test]
async fn test_request_id_is_set() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_session_routes() {
    let app = app();

    let (status, body) = get(&app, "/api/session", Some(&supplier_token())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["home_route"], "/dashboard/supplier");
    assert_eq!(body["data"]["session"]["role"], "supplier");
    assert_eq!(body["data"]["supplier"]["company_name"], "Zitouna");

    let (_, body) = get(&app, "/api/session", Some(&admin_token())).await;
    assert_eq!(body["data"]["home_route"], "/");
    assert!(body["data"].get("supplier").is_none());
}

// ========== Role routing ==========

#[tokio::test]
async fn test_role_guard() {
    let app = app();

    let (status, body) = get(&app, "/api/dashboard/overview", Some(&supplier_token())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let (status, body) = get(&app, "/api/dashboard/me", Some(&admin_token())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2002);

    let (status, _) = send(&app, Method::POST, "/api/snapshot/refresh", Some(&supplier_token())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_platform_overview() {
    let (status, body) = get(&app(), "/api/dashboard/overview", Some(&admin_token())).await;
    assert_eq!(status, StatusCode::OK);
    let summary = &body["data"]["summary"];
    assert_eq!(summary["value"].as_f64(), Some(108.0));
    assert_eq!(summary["orders"], 4);
    assert_eq!(summary["customers"], 3);
    assert_eq!(summary["returns"].as_f64(), Some(2.0));
    assert_eq!(body["data"]["warehouses"].as_array().unwrap().len(), 2);

    let (status, body) = get(&app(), "/api/dashboard/overview?warehouse=99", Some(&admin_token())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3201);
}

#[tokio::test]
async fn test_supplier_dashboards() {
    let app = app();

    let (status, body) = get(&app, "/api/dashboard/me", Some(&supplier_token())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["supplier_id"], "7");
    assert_eq!(body["data"]["summary"]["value"].as_f64(), Some(54.0));
    assert_eq!(body["data"]["summary"]["orders"], 3);

    let (_, body) = get(&app, "/api/dashboard/suppliers", Some(&admin_token())).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Moulins", "Zitouna"]);
    assert_eq!(body["data"][0]["dashboard_route"], "/supplierDashboard/8");

    let (status, body) = get(&app, "/api/dashboard/suppliers/8", Some(&admin_token())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["supplier"]["company_name"], "Moulins");

    let (status, body) = get(&app, "/api/dashboard/suppliers/99", Some(&admin_token())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3301);
}

// ========== Charts ==========

#[tokio::test]
async fn test_supplier_sales_trend() {
    let (status, body) = get(
        &app(),
        "/api/charts/sales_trend?granularity=monthly",
        Some(&supplier_token()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let chart = &body["data"];
    assert_eq!(chart["status"], "ready");
    assert_eq!(chart["categories"], json!(["2024-01", "2024-02", "2024-04"]));
    assert_eq!(numbers(&chart["series"][0]["data"]), vec![30.0, 12.0, 12.0]);
}

#[tokio::test]
async fn test_supplier_cannot_read_other_supplier() {
    let (status, body) = get(&app(), "/api/charts/sales_trend?supplier=8", Some(&supplier_token())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2004);
}

#[tokio::test]
async fn test_superadmin_supplier_view() {
    let (status, body) = get(
        &app(),
        "/api/charts/sales_trend?supplier=7&granularity=monthly",
        Some(&admin_token()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(numbers(&body["data"]["series"][0]["data"]), vec![30.0, 12.0, 12.0]);
}

#[tokio::test]
async fn test_no_data_is_not_an_error() {
    let app = app();

    let (status, body) = get(&app, "/api/charts/refund_trend", Some(&supplier_token())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "no_data");

    let (status, body) = get(&app, "/api/charts/sales_trend?start=2030-01-01", Some(&admin_token())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "no_data");

    let empty = app_with(DataSnapshot::default());
    for chart in ["sales_trend", "quarterly_metrics", "top_articles", "client_segments"] {
        let (status, body) = get(&empty, &format!("/api/charts/{}", chart), Some(&admin_token())).await;
        assert_eq!(status, StatusCode::OK, "{}", chart);
        assert_eq!(body["data"]["status"], "no_data", "{}", chart);
    }
}

#[tokio::test]
async fn test_chart_errors() {
    let app = app();

    let (status, body) = get(&app, "/api/charts/pie_of_doom", Some(&admin_token())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4003);

    let (status, body) = get(&app, "/api/charts/inventory_trend", Some(&admin_token())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4005);

    let (status, body) = get(&app, "/api/charts/sales_trend?warehouse=99", Some(&admin_token())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3201);

    let (status, body) = get(&app, "/api/charts/sales_trend?granularity=hourly", Some(&admin_token())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4001);

    let (status, body) = get(&app, "/api/charts/sales_trend?start=2024-05-01&end=2024-01-01", Some(&admin_token())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4002);
}

#[tokio::test]
async fn test_chart_list() {
    let (status, body) = get(&app(), "/api/charts", Some(&supplier_token())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 11);
}

// ========== Snapshot ==========

#[tokio::test]
async fn test_snapshot_refresh_and_health() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    std::fs::write(&path, serde_json::to_vec(&fixture_json()).unwrap()).unwrap();

    let state = ServerState::with_source(
        Config::for_tests(SECRET),
        FILE_SOURCE,
        Arc::new(StaticSource::from_file(&path)),
    );
    let app = build_router(state);

    let (_, body) = get(&app, "/health/detailed", None).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["snapshot"]["status"], "error");

    let (status, body) = send(&app, Method::POST, "/api/snapshot/refresh", Some(&admin_token())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source"], "file");
    assert_eq!(body["data"]["orders"], 5);
    assert_eq!(body["data"]["ticket"], 1);

    let (_, body) = get(&app, "/health/detailed", None).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["snapshot"]["status"], "ok");
}
