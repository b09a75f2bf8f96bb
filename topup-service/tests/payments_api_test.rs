mod common;

use common::{TestApp, QR_PATH, STATUS_PATH};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn lists_preset_amounts() {
    let app = TestApp::spawn().await;

    let body: Value = Client::new()
        .get(&format!("{}/payments/amounts", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");

    assert_eq!(body["quick"].as_array().unwrap().len(), 3);
    assert_eq!(body["popular"].as_array().unwrap().len(), 3);
    assert_eq!(body["quick"][1]["amount"], 100);
    assert_eq!(body["quick"][1]["coins"], 1100);
    assert_eq!(body["popular"][2]["label"], "Legend Pack");
    assert_eq!(body["popular"][2]["coins"], 35000);
}

#[tokio::test]
async fn quotes_coins_for_amount() {
    let app = TestApp::spawn().await;

    let body: Value = Client::new()
        .get(&format!("{}/payments/coins?amount=1000", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");

    assert_eq!(body["coins"], 15000);
    assert_eq!(body["bonus_percentage"], 50);
    assert_eq!(body["display"], "₹1,000");
}

#[tokio::test]
async fn rejects_zero_amount() {
    let app = TestApp::spawn().await;

    let response = Client::new()
        .post(&format!("{}/payments/qr", app.address))
        .json(&json!({ "amount": 0 }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let requests = app.gateway.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn generates_qr_through_gateway() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path(QR_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "image": "QRIMG" })))
        .expect(1)
        .mount(&app.gateway)
        .await;

    let response = Client::new()
        .post(&format!("{}/payments/qr", app.address))
        .json(&json!({ "amount": 500, "order_id": "ORDER9" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["success"], true);
    assert_eq!(body["qr_image"], "QRIMG");
    assert_eq!(body["order_id"], "ORDER9");
    assert_eq!(body["amount"], 500);
}

#[tokio::test]
async fn gateway_failure_maps_to_bad_gateway() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path(QR_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&app.gateway)
        .await;

    let response = Client::new()
        .post(&format!("{}/payments/qr", app.address))
        .json(&json!({ "amount": 500 }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Failed to generate QR code");
}

#[tokio::test]
async fn reports_payment_status() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .and(query_param("id", "ORDER9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "STATUS": "TXN_SUCCESS",
            "TXNAMOUNT": "500.00",
            "TXNID": "T9"
        })))
        .mount(&app.gateway)
        .await;

    let response = Client::new()
        .get(&format!("{}/payments/ORDER9/status", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["success"], true);
    assert_eq!(body["is_paid"], true);
    assert_eq!(body["amount_paid"], 500.0);
    assert_eq!(body["transaction_id"], "T9");
    assert_eq!(body["data"]["STATUS"], "TXN_SUCCESS");
}
