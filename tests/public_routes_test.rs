mod common;

use actix_web::{test, web, App};
use serde_json::json;
use serial_test::serial;

use common::TestApp;

#[actix_rt::test]
#[serial]
async fn test_health_check() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "OK");
}

#[actix_rt::test]
#[serial]
async fn test_root_endpoint() {
    let app = test::init_service(
        App::new().route("/", web::get().to(|| async { "Catering API is running" })),
    )
    .await;

    let req = test::TestRequest::get().uri("/").to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body = test::read_body(resp).await;
    assert_eq!(body, "Catering API is running");
}

#[actix_rt::test]
#[serial]
async fn test_catalog_endpoints_respond() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    for uri in [
        "/api/catalog/categories",
        "/api/catalog/items",
        "/api/catalog/packages",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success(), "expected 200 from {}", uri);
    }
}

#[actix_rt::test]
#[serial]
async fn test_coupon_validate_miss_is_a_normal_response() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/coupons/validate")
        .set_json(&json!({"code": "NOSUCHCODE", "order_value": 20000}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    // An unknown coupon is a 200 with valid=false, never an error status
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["valid"], false);
    assert_eq!(body["message"], "Invalid or expired coupon");
}

#[actix_rt::test]
#[serial]
async fn test_booking_submit_rejects_malformed_payload() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/bookings")
        .set_json(&json!({"event_type": "Wedding"}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}
