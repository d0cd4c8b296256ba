mod common;

use common::image_part;
use common::TestApp;
use reqwest::multipart::Form;
use reqwest::StatusCode;
use serde_json::json;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-body";

async fn create_product(app: &TestApp, token: &str, form: Form) -> reqwest::Response {
    app.post_authenticated("/api/products", token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request")
}

async fn create_product_id(app: &TestApp, token: &str, form: Form) -> String {
    let response = create_product(app, token, form).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    body["data"]["id"].as_str().expect("Missing id").to_string()
}

async fn get_product(app: &TestApp, token: &str, id: &str) -> reqwest::Response {
    app.get_authenticated(&format!("/api/products/{}", id), token)
        .send()
        .await
        .expect("Failed to execute request")
}

async fn list_products(app: &TestApp, token: &str, query: &str) -> Vec<serde_json::Value> {
    let response = app
        .get_authenticated(&format!("/api/products{}", query), token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    body["data"].as_array().expect("Expected array").clone()
}

fn product_form(name: &str) -> Form {
    Form::new()
        .text("name", name.to_string())
        .part("images", image_part("photo.png", PNG_BYTES))
}

#[tokio::test]
async fn create_product_and_fetch_detail() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let category_id = app.create_category(&token, "Lighting").await;

    let form = Form::new()
        .text("name", "Desk Lamp")
        .text("description", "Warm light")
        .text("price", "19.99")
        .text("in_stock", "true")
        .text("category_id", category_id.clone())
        .part("images", image_part("front.png", PNG_BYTES))
        .part("images", image_part("side.JPG", b"jpeg-bytes"));
    let id = create_product_id(&app, &token, form).await;

    let response = get_product(&app, &token, &id).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let data = &body["data"];
    assert_eq!(data["id"], id.as_str());
    assert_eq!(data["name"], "Desk Lamp");
    assert_eq!(data["description"], "Warm light");
    assert_eq!(data["price"], 19.99);
    assert_eq!(data["in_stock"], true);
    assert_eq!(data["category_id"], category_id.as_str());
    assert_eq!(data["category_name"], "Lighting");

    let images = data["images"].as_array().expect("Expected images");
    assert_eq!(images.len(), 2);
    assert_eq!(data["primary_image_url"], images[0]);
    assert!(images[1].as_str().unwrap().ends_with(".jpg"));
}

#[tokio::test]
async fn uploaded_image_is_served() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let id = create_product_id(&app, &token, product_form("Lamp")).await;

    let body: serde_json::Value = get_product(&app, &token, &id)
        .await
        .json()
        .await
        .expect("Failed to parse response");
    let url = body["data"]["primary_image_url"]
        .as_str()
        .expect("Missing image url");
    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with(".png"));

    let response = app.get(url).send().await.expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.bytes().await.expect("Failed to read body");
    assert_eq!(bytes.as_ref(), PNG_BYTES);
}

#[tokio::test]
async fn single_image_field_is_accepted() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let form = Form::new()
        .text("name", "Lamp")
        .part("image", image_part("photo.webp", PNG_BYTES));
    let id = create_product_id(&app, &token, form).await;

    let body: serde_json::Value = get_product(&app, &token, &id)
        .await
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["data"]["images"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["price"], 0.0);
    assert_eq!(body["data"]["in_stock"], true);
    assert!(body["data"]["category_id"].is_null());
}

#[tokio::test]
async fn create_product_validation_errors() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let test_cases = vec![
        (
            Form::new().text("name", "Lamp"),
            "at least one image required",
        ),
        (
            Form::new()
                .text("name", "Lamp")
                .part("images", image_part("", PNG_BYTES)),
            "at least one image required",
        ),
        (
            Form::new()
                .text("name", "Lamp")
                .part("images", image_part("script.exe", PNG_BYTES)),
            "invalid image type",
        ),
        (
            Form::new()
                .text("name", "   ")
                .part("images", image_part("photo.png", PNG_BYTES)),
            "name required",
        ),
    ];

    for (form, message) in test_cases {
        let response = create_product(&app, &token, form).await;

        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "Expected 400 for {}",
            message
        );
        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["data"]["message"], message);
    }

    let leftover = std::fs::read_dir(app.uploads.path()).unwrap().count();
    assert_eq!(leftover, 0);
}

#[tokio::test]
async fn create_product_rejects_bad_price() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    for price in ["abc", "-1"] {
        let form = product_form("Lamp").text("price", price);
        let response = create_product(&app, &token, form).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "price {}", price);
    }
}

#[tokio::test]
async fn create_product_with_unknown_category_keeps_no_files() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let form = product_form("Lamp").text("category_id", "00000000-0000-0000-0000-000000000000");
    let response = create_product(&app, &token, form).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let leftover = std::fs::read_dir(app.uploads.path()).unwrap().count();
    assert_eq!(leftover, 0);
}

#[tokio::test]
async fn non_admin_cannot_write_products() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let id = create_product_id(&app, &admin, product_form("Lamp")).await;
    let token = app.user_token("alice").await;

    let response = create_product(&app, &token, product_form("Chair")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .put_authenticated(&format!("/api/products/{}", id), &token)
        .json(&json!({ "in_stock": false }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .delete_authenticated(&format!("/api/products/{}", id), &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_product(&app, &token, &id).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn list_products_newest_first_with_filters() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let lighting = app.create_category(&token, "Lighting").await;

    create_product_id(
        &app,
        &token,
        product_form("Desk Lamp")
            .text("category_id", lighting.clone())
            .text("description", "brass finish"),
    )
    .await;
    create_product_id(
        &app,
        &token,
        product_form("Oak Chair").text("in_stock", "false"),
    )
    .await;
    create_product_id(&app, &token, product_form("Floor lamp").text("price", "49.5")).await;

    let all = list_products(&app, &token, "").await;
    let names: Vec<&str> = all.iter().filter_map(|p| p["name"].as_str()).collect();
    assert_eq!(names, vec!["Floor lamp", "Oak Chair", "Desk Lamp"]);
    assert_eq!(all[0]["price"], 49.5);
    assert!(all[0]["primary_image_url"]
        .as_str()
        .is_some_and(|url| url.starts_with("/uploads/")));

    let lamps = list_products(&app, &token, "?query=LAMP").await;
    assert_eq!(lamps.len(), 2);

    let brass = list_products(&app, &token, "?query=brass").await;
    assert_eq!(brass.len(), 1);
    assert_eq!(brass[0]["name"], "Desk Lamp");

    let in_category = list_products(&app, &token, &format!("?category_id={}", lighting)).await;
    assert_eq!(in_category.len(), 1);
    assert_eq!(in_category[0]["category_name"], "Lighting");

    let out_of_stock = list_products(&app, &token, "?in_stock=false").await;
    assert_eq!(out_of_stock.len(), 1);
    assert_eq!(out_of_stock[0]["name"], "Oak Chair");

    let ignored = list_products(&app, &token, "?category_id=nope&in_stock=maybe").await;
    assert_eq!(ignored.len(), 3);
}

#[tokio::test]
async fn unknown_product_returns_404() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    for id in ["00000000-0000-0000-0000-000000000000", "not-a-uuid"] {
        let response = get_product(&app, &token, id).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {}", id);

        let response = app
            .put_authenticated(&format!("/api/products/{}", id), &token)
            .json(&json!({ "in_stock": false }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "PUT {}", id);
    }
}

#[tokio::test]
async fn update_product_with_json() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let category_id = app.create_category(&token, "Lighting").await;
    let id = create_product_id(
        &app,
        &token,
        product_form("Lamp")
            .text("category_id", category_id)
            .text("description", "old"),
    )
    .await;

    let response = app
        .put_authenticated(&format!("/api/products/{}", id), &token)
        .json(&json!({
            "name": "Reading Lamp",
            "price": 12.5,
            "in_stock": false,
            "category_id": null
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["message"], "updated");

    let body: serde_json::Value = get_product(&app, &token, &id)
        .await
        .json()
        .await
        .expect("Failed to parse response");
    let data = &body["data"];
    assert_eq!(data["name"], "Reading Lamp");
    assert_eq!(data["description"], "old");
    assert_eq!(data["price"], 12.5);
    assert_eq!(data["in_stock"], false);
    assert!(data["category_id"].is_null());
    assert!(data["category_name"].is_null());
}

#[tokio::test]
async fn update_product_with_multipart_appends_images() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let id = create_product_id(&app, &token, product_form("Lamp").text("price", "5")).await;

    let form = Form::new()
        .text("price", "")
        .text("in_stock", "false")
        .part("images", image_part("extra.gif", b"GIF89a"));
    let response = app
        .put_authenticated(&format!("/api/products/{}", id), &token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = get_product(&app, &token, &id)
        .await
        .json()
        .await
        .expect("Failed to parse response");
    let data = &body["data"];
    assert_eq!(data["price"], 5.0);
    assert_eq!(data["in_stock"], false);

    let images = data["images"].as_array().expect("Expected images");
    assert_eq!(images.len(), 2);
    assert!(images[0].as_str().unwrap().ends_with(".png"));
    assert!(images[1].as_str().unwrap().ends_with(".gif"));
    assert_eq!(data["primary_image_url"], images[0]);
}

#[tokio::test]
async fn update_product_rejects_invalid_image() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let id = create_product_id(&app, &token, product_form("Lamp")).await;

    let form = Form::new().part("images", image_part("notes.txt", b"hello"));
    let response = app
        .put_authenticated(&format!("/api/products/{}", id), &token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["message"], "invalid image type");
}

#[tokio::test]
async fn deleting_category_detaches_products() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let category_id = app.create_category(&token, "Lighting").await;
    let id = create_product_id(
        &app,
        &token,
        product_form("Lamp").text("category_id", category_id.clone()),
    )
    .await;

    let response = app
        .delete_authenticated(&format!("/api/categories/{}", category_id), &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = get_product(&app, &token, &id)
        .await
        .json()
        .await
        .expect("Failed to parse response");
    assert!(body["data"]["category_id"].is_null());
    assert!(body["data"]["category_name"].is_null());
}

#[tokio::test]
async fn delete_product() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let id = create_product_id(&app, &token, product_form("Lamp")).await;

    let response = app
        .delete_authenticated(&format!("/api/products/{}", id), &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["message"], "deleted");

    let response = get_product(&app, &token, &id).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .delete_authenticated(&format!("/api/products/{}", id), &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
