mod common;

use common::TestApp;
use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway_order(id: &str, amount: u64) -> serde_json::Value {
    json!({
        "id": id,
        "entity": "order",
        "amount": amount,
        "amount_paid": 0,
        "amount_due": amount,
        "currency": "INR",
        "receipt": null,
        "status": "created",
        "attempts": 0,
        "notes": null,
        "created_at": 1_700_000_000u64
    })
}

#[tokio::test]
async fn create_order_converts_rupees_to_paise() {
    let gateway = MockServer::start().await;

    // 250 rupees must reach the gateway as 25000 paise, authenticated
    // with the merchant credentials.
    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(header(
            "authorization",
            "Basic dGVzdF9rZXlfaWQ6dGVzdF9rZXlfc2VjcmV0",
        ))
        .and(body_partial_json(json!({
            "amount": 25000,
            "currency": "INR"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gateway_order("order_test123", 25000)))
        .expect(1)
        .mount(&gateway)
        .await;

    let app = TestApp::spawn(&gateway.uri()).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/orders", app.address))
        .json(&json!({ "amount": 250 }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 201);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["order"]["id"], "order_test123");
    assert_eq!(body["order"]["amount"], 25000);
    assert_eq!(body["order"]["currency"], "INR");
    assert_eq!(body["razorpay_key_id"], common::TEST_KEY_ID);
}

#[tokio::test]
async fn create_order_rounds_fractional_rupees() {
    let gateway = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(body_partial_json(json!({ "amount": 9999 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gateway_order("order_frac", 9999)))
        .expect(1)
        .mount(&gateway)
        .await;

    let app = TestApp::spawn(&gateway.uri()).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/orders", app.address))
        .json(&json!({ "amount": 99.99 }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn create_order_rejects_non_positive_amount() {
    let gateway = MockServer::start().await;

    // The gateway must never be reached for an invalid amount.
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gateway_order("order_x", 1)))
        .expect(0)
        .mount(&gateway)
        .await;

    let app = TestApp::spawn(&gateway.uri()).await;
    let client = Client::new();

    for amount in [json!(0), json!(-250)] {
        let response = client
            .post(format!("{}/orders", app.address))
            .json(&json!({ "amount": amount }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), 400);
    }
}

#[tokio::test]
async fn gateway_failure_maps_to_bad_gateway_without_leaking_detail() {
    let gateway = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": "BAD_REQUEST_ERROR",
                "description": "internal gateway detail that must not leak",
                "source": "business",
                "step": "payment_initiation",
                "reason": "input_validation_failed"
            }
        })))
        .mount(&gateway)
        .await;

    let app = TestApp::spawn(&gateway.uri()).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/orders", app.address))
        .json(&json!({ "amount": 250 }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 502);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "failed to create payment order");
    assert!(!body.to_string().contains("internal gateway detail"));
}

#[tokio::test]
async fn get_order_passes_through() {
    let gateway = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders/order_test123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gateway_order("order_test123", 25000)))
        .mount(&gateway)
        .await;

    let app = TestApp::spawn(&gateway.uri()).await;
    let client = Client::new();

    let response = client
        .get(format!("{}/orders/order_test123", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["order"]["id"], "order_test123");
}

#[tokio::test]
async fn get_unknown_order_returns_not_found() {
    let gateway = MockServer::start().await;

    let app = TestApp::spawn(&gateway.uri()).await;
    let client = Client::new();

    let response = client
        .get(format!("{}/orders/order_missing", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 404);
}
