mod common;

use common::TestApp;
use reqwest::Client;

#[tokio::test]
#[ignore = "Requires MongoDB at localhost:27017 (override with TEST_MONGODB_URI)"]
async fn health_check_works() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert!(response.headers().contains_key("x-request-id"));

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, serde_json::json!({ "status": "healthy" }));

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires MongoDB at localhost:27017 (override with TEST_MONGODB_URI)"]
async fn clients_on_empty_collection_is_zero() {
    let app = TestApp::spawn().await;

    let body: serde_json::Value = Client::new()
        .get(format!("{}/clients", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");

    assert_eq!(body["clients_count"], 0);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires MongoDB at localhost:27017 (override with TEST_MONGODB_URI)"]
async fn clients_counts_every_document() {
    let app = TestApp::spawn().await;
    app.seed_clients(5).await;

    let response = Client::new()
        .get(format!("{}/clients", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["clients_count"], 5);

    app.cleanup().await;
}
