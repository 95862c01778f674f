use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};

use flipstock_api::app::{build_router, services::AppServices};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory stores, ephemeral port.
        let services = Arc::new(AppServices::in_memory("test-secret"));
        let app = build_router(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn register_and_login(client: &reqwest::Client, base_url: &str, email: &str) -> String {
    let res = client
        .post(format!("{base_url}/auth/register"))
        .json(&json!({ "email": email, "password": "hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({ "email": email, "password": "hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_check_is_public() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/healthz", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["ok"], json!(true));
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/items", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/items", server.base_url))
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_login_whoami() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &server.base_url, "jane@example.com").await;

    let res = client
        .get(format!("{}/whoami", server.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["email"], json!("jane@example.com"));

    // Duplicate registration conflicts.
    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({ "email": "jane@example.com", "password": "other" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Wrong password fails closed.
    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({ "email": "jane@example.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn scan_intake_creates_then_finds() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &server.base_url, "scanner@example.com").await;

    // First scan: nothing with this barcode yet, a stub item is created.
    // The raw value is normalized (whitespace stripped) on the way in.
    let res = client
        .post(format!("{}/scan", server.base_url))
        .bearer_auth(&token)
        .form(&[("barcode", " 012345678905 ")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["found"], json!(false));
    assert_eq!(body["item"]["barcode"], json!("012345678905"));
    assert_eq!(body["item"]["title"], json!("Untitled"));
    let item_id = body["item"]["id"].as_str().unwrap().to_string();

    // Second scan of the same code finds the item instead.
    let res = client
        .post(format!("{}/scan", server.base_url))
        .bearer_auth(&token)
        .form(&[("barcode", "012345678905")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["found"], json!(true));
    assert_eq!(body["item"]["id"], json!(item_id));

    // The lookup endpoint agrees.
    let res = client
        .get(format!(
            "{}/api/items/lookup?barcode=012345678905",
            server.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["found"], json!(true));
    assert_eq!(body["id"], json!(item_id));

    // A different account does not see the item.
    let other = register_and_login(&client, &server.base_url, "other@example.com").await;
    let res = client
        .get(format!(
            "{}/api/items/lookup?barcode=012345678905",
            server.base_url
        ))
        .bearer_auth(&other)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["found"], json!(false));
}

#[tokio::test]
async fn scan_session_drives_one_submission_end_to_end() {
    use flipstock_scan::{CameraConfig, CaptureCapability, Detection, ScanSession};

    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &server.base_url, "camera@example.com").await;

    // The client-side session: capture, one detection, one submission.
    let mut session = ScanSession::new(CameraConfig::default_rear());
    session.start(CaptureCapability::Available).unwrap();
    let submission = session.detected(&Detection::new("012345678905")).unwrap();

    let res = client
        .post(format!("{}{}", server.base_url, submission.endpoint()))
        .bearer_auth(&token)
        .form(&submission.form_pairs())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["item"]["barcode"], json!("012345678905"));

    // A second detection in the same session produces nothing to send.
    assert!(session.detected(&Detection::new("012345678905")).is_none());
}

#[tokio::test]
async fn scan_rejects_unusable_barcodes() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &server.base_url, "strict@example.com").await;

    let res = client
        .post(format!("{}/scan", server.base_url))
        .bearer_auth(&token)
        .form(&[("barcode", "   ")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn item_economics_flow() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &server.base_url, "seller@example.com").await;

    // Created without a list price: break-even is filled in server-side.
    let res = client
        .post(format!("{}/items", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "title": "Denim jacket", "purchase_price": "10.00" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await.unwrap();
    let item_id = body["id"].as_str().unwrap().to_string();
    assert_eq!(body["list_price"], json!("12.95"));
    assert_eq!(body["status"], json!("listed"));
    assert_eq!(body["economics"]["break_even_price"], json!("12.95"));
    assert_eq!(body["economics"]["payout"], Value::Null);

    // Record the sale; payout is 80% (>= $15 bracket), profit is payout - cost.
    let res = client
        .post(format!("{}/items/{item_id}/sale", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "sold_price": "25.00", "sold_date": "2026-08-01" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], json!("sold"));
    assert_eq!(body["economics"]["payout"], json!("20.00"));
    assert_eq!(body["economics"]["profit"], json!("10.00"));

    let res = client
        .get(format!("{}/items/{item_id}/economics", server.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], json!("sold"));
    assert_eq!(body["break_even_price"], json!("12.95"));
    assert_eq!(body["profit"], json!("10.00"));
}

#[tokio::test]
async fn duplicate_barcode_points_at_existing_item() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &server.base_url, "dup@example.com").await;

    let res = client
        .post(format!("{}/items", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "title": "First", "barcode": "4002971024692" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let first: Value = res.json().await.unwrap();

    let res = client
        .post(format!("{}/items", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "title": "Second", "barcode": "4002971024692" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["existing_id"], first["id"]);
}

#[tokio::test]
async fn categories_are_idempotent_and_detach_items() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &server.base_url, "cats@example.com").await;

    let res = client
        .post(format!("{}/categories", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Shoes" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    let category_id = body["id"].as_str().unwrap().to_string();
    assert_eq!(body["created"], json!(true));

    // Creating the same name again reports the existing category.
    let res = client
        .post(format!("{}/categories", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Shoes" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["created"], json!(false));
    assert_eq!(body["id"], json!(category_id));

    let res = client
        .post(format!("{}/items", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "title": "Sneakers", "category_id": category_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let item: Value = res.json().await.unwrap();
    assert_eq!(item["category_id"], json!(category_id));
    let item_id = item["id"].as_str().unwrap().to_string();

    // Category filter finds it.
    let res = client
        .get(format!(
            "{}/items?category={category_id}",
            server.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    // Deleting the category detaches the item instead of deleting it.
    let res = client
        .delete(format!("{}/categories/{category_id}", server.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/items/{item_id}", server.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["category_id"], Value::Null);
}

#[tokio::test]
async fn label_sheet_for_selected_items() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &server.base_url, "labels@example.com").await;

    let mut ids = Vec::new();
    for (title, barcode) in [("Denim jacket", "012345678905"), ("Wool coat", "01234567")] {
        let res = client
            .post(format!("{}/items", server.base_url))
            .bearer_auth(&token)
            .json(&json!({ "title": title, "barcode": barcode }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = res.json().await.unwrap();
        ids.push(body["id"].as_str().unwrap().to_string());
    }

    let res = client
        .get(format!(
            "{}/labels/sheet?ids={}&copies=2&size=avery5160",
            server.base_url,
            ids.join(",")
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    let labels = body["labels"].as_array().unwrap();
    assert_eq!(labels.len(), 4);
    assert_eq!(labels[0]["symbology"], json!("upc-a"));
    assert_eq!(labels[2]["symbology"], json!("ean-8"));
    assert_eq!(body["dimensions"]["label_width"], json!(2.625));

    // Missing ids is a client error.
    let res = client
        .get(format!("{}/labels/sheet", server.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bulk_delete_own_items_only() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &server.base_url, "bulk@example.com").await;
    let other = register_and_login(&client, &server.base_url, "bulk-other@example.com").await;

    let mut ids = Vec::new();
    for title in ["A", "B"] {
        let res = client
            .post(format!("{}/items", server.base_url))
            .bearer_auth(&token)
            .json(&json!({ "title": title }))
            .send()
            .await
            .unwrap();
        let body: Value = res.json().await.unwrap();
        ids.push(body["id"].as_str().unwrap().to_string());
    }

    let res = client
        .post(format!("{}/items", server.base_url))
        .bearer_auth(&other)
        .json(&json!({ "title": "Foreign" }))
        .send()
        .await
        .unwrap();
    let foreign: Value = res.json().await.unwrap();
    let foreign_id = foreign["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/items/bulk_delete", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "ids": [ids[0], ids[1], foreign_id] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["deleted"], json!(2));

    // The other user's item survived.
    let res = client
        .get(format!("{}/items", server.base_url))
        .bearer_auth(&other)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}
