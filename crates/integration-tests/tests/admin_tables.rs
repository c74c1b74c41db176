//! Admin panel: login gating, paginated tables, post-fetch filter, status
//! toggles, and edits.

use mangaba_integration_tests::{FakeBackend, browser, spawn_admin, spawn_backend};
use serde_json::json;

async fn setup() -> (String, std::sync::Arc<FakeBackend>) {
    let backend = FakeBackend::seeded();
    let backend_url = spawn_backend(backend.clone()).await;
    let admin = spawn_admin(&backend_url).await;
    (admin, backend)
}

async fn sign_in(client: &reqwest::Client, base: &str, email: &str) {
    client
        .post(format!("{base}/login"))
        .form(&[("email", email), ("password", "s3nh4-forte")])
        .send()
        .await
        .expect("login");
}

#[tokio::test]
async fn anonymous_requests_are_sent_to_login() {
    let (base, _backend) = setup().await;
    let client = browser();

    let resp = client
        .get(format!("{base}/products"))
        .send()
        .await
        .expect("products");
    assert!(resp.url().path().ends_with("/login"), "{}", resp.url());
}

#[tokio::test]
async fn customers_cannot_sign_in_to_the_panel() {
    let (base, _backend) = setup().await;
    let client = browser();

    let body = client
        .post(format!("{base}/login"))
        .form(&[("email", "maria@example.com"), ("password", "whatever")])
        .send()
        .await
        .expect("login")
        .text()
        .await
        .expect("body");
    assert!(body.contains("no access to the admin panel"), "{body}");

    // Still anonymous afterwards
    let resp = client
        .get(format!("{base}/products"))
        .send()
        .await
        .expect("products");
    assert!(resp.url().path().ends_with("/login"), "{}", resp.url());
}

#[tokio::test]
async fn backend_rejection_is_surfaced_on_login() {
    let (base, _backend) = setup().await;
    let client = browser();

    let body = client
        .post(format!("{base}/login"))
        .form(&[("email", "admin@mangaba.shop"), ("password", "wrong")])
        .send()
        .await
        .expect("login")
        .text()
        .await
        .expect("body");
    assert!(body.contains("Invalid credentials"), "{body}");
}

#[tokio::test]
async fn products_table_lists_the_fetched_page() {
    let (base, _backend) = setup().await;
    let client = browser();
    sign_in(&client, &base, "admin@mangaba.shop").await;

    let body = client
        .get(format!("{base}/products"))
        .send()
        .await
        .expect("products")
        .text()
        .await
        .expect("body");

    assert!(body.contains("Ceramic Vase"), "{body}");
    assert!(body.contains("Wooden Tray"), "{body}");
    assert!(body.contains("R$ 10.00"), "{body}");
    // The inactive product is still listed in the admin table
    assert!(body.contains("Linen Cushion"), "{body}");
    assert!(body.contains("Inactive"), "{body}");
}

#[tokio::test]
async fn filter_narrows_the_loaded_page_only() {
    let (base, _backend) = setup().await;
    let client = browser();
    sign_in(&client, &base, "admin@mangaba.shop").await;

    let body = client
        .get(format!("{base}/products?page=0&q=VASE"))
        .send()
        .await
        .expect("products")
        .text()
        .await
        .expect("body");

    assert!(body.contains("Ceramic Vase"), "{body}");
    assert!(!body.contains("Wooden Tray"), "{body}");

    // A filter that matches nothing empties the page but keeps the table
    let body = client
        .get(format!("{base}/products?page=0&q=lamp"))
        .send()
        .await
        .expect("products")
        .text()
        .await
        .expect("body");
    assert!(body.contains("No products found"), "{body}");
}

#[tokio::test]
async fn toggle_calls_backend_and_refetches_the_page() {
    let (base, backend) = setup().await;
    let client = browser();
    sign_in(&client, &base, "admin@mangaba.shop").await;

    let body = client
        .post(format!("{base}/products/1/toggle"))
        .form(&[("page", "0"), ("q", "")])
        .send()
        .await
        .expect("toggle")
        .text()
        .await
        .expect("body");

    // Backend state flipped, and the fragment reflects the re-fetched truth
    let products = backend.products.lock().await;
    let vase = products.iter().find(|p| p["id"] == json!(1)).unwrap();
    assert_eq!(vase["active"], json!(false));
    assert!(body.contains("Activate"), "{body}");
}

#[tokio::test]
async fn product_edit_round_trips_through_the_backend() {
    let (base, backend) = setup().await;
    let client = browser();
    sign_in(&client, &base, "admin@mangaba.shop").await;

    // The edit form is pre-filled from the backend
    let body = client
        .get(format!("{base}/products/1/edit"))
        .send()
        .await
        .expect("edit page")
        .text()
        .await
        .expect("body");
    assert!(body.contains("Ceramic Vase"), "{body}");

    client
        .post(format!("{base}/products/1"))
        .form(&[
            ("name", "Ceramic Vase XL"),
            ("description", "Hand made, larger"),
            ("price", "12,50"),
            ("stock", "8"),
        ])
        .send()
        .await
        .expect("update");

    let products = backend.products.lock().await;
    let vase = products.iter().find(|p| p["id"] == json!(1)).unwrap();
    assert_eq!(vase["name"], json!("Ceramic Vase XL"));
    assert_eq!(vase["stock"], json!(8));
    // Comma decimal input is normalized
    assert_eq!(vase["price"], json!("12.50"));
}

#[tokio::test]
async fn invalid_product_form_shows_inline_error_without_backend_call() {
    let (base, backend) = setup().await;
    let client = browser();
    sign_in(&client, &base, "admin@mangaba.shop").await;

    let before = backend.products.lock().await.clone();
    let body = client
        .post(format!("{base}/products/1"))
        .form(&[
            ("name", "Ceramic Vase"),
            ("description", ""),
            ("price", "abc"),
            ("stock", "5"),
        ])
        .send()
        .await
        .expect("update")
        .text()
        .await
        .expect("body");

    assert!(body.contains("Price must be a number"), "{body}");
    assert_eq!(*backend.products.lock().await, before);
}

#[tokio::test]
async fn image_upload_passes_through_and_reports_back() {
    let (base, _backend) = setup().await;
    let client = browser();
    sign_in(&client, &base, "admin@mangaba.shop").await;

    let part = reqwest::multipart::Part::bytes(vec![0xFF, 0xD8, 0xFF, 0xE0])
        .file_name("vase.jpg")
        .mime_str("image/jpeg")
        .expect("part");
    let form = reqwest::multipart::Form::new().part("images", part);

    let resp = client
        .post(format!("{base}/products/1/images"))
        .multipart(form)
        .send()
        .await
        .expect("upload");

    // Lands back on the edit page with the notice banner
    assert!(resp.url().path().ends_with("/products/1/edit"), "{}", resp.url());
    let body = resp.text().await.expect("body");
    assert!(body.contains("Images uploaded"), "{body}");
}

#[tokio::test]
async fn empty_image_upload_is_rejected_locally() {
    let (base, _backend) = setup().await;
    let client = browser();
    sign_in(&client, &base, "admin@mangaba.shop").await;

    let form = reqwest::multipart::Form::new().text("unrelated", "field");
    let resp = client
        .post(format!("{base}/products/1/images"))
        .multipart(form)
        .send()
        .await
        .expect("upload");

    let body = resp.text().await.expect("body");
    assert!(body.contains("No images selected"), "{body}");
}

#[tokio::test]
async fn users_table_requires_the_admin_role() {
    let (base, _backend) = setup().await;

    // Stockists can see products but not users
    let client = browser();
    sign_in(&client, &base, "stockist@mangaba.shop").await;

    let resp = client
        .get(format!("{base}/products"))
        .send()
        .await
        .expect("products");
    assert!(resp.status().is_success());

    let resp = client
        .get(format!("{base}/users"))
        .send()
        .await
        .expect("users");
    assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn user_toggle_and_edit_flow() {
    let (base, backend) = setup().await;
    let client = browser();
    sign_in(&client, &base, "admin@mangaba.shop").await;

    let body = client
        .get(format!("{base}/users"))
        .send()
        .await
        .expect("users")
        .text()
        .await
        .expect("body");
    assert!(body.contains("maria@example.com"), "{body}");

    client
        .post(format!("{base}/users/10/toggle"))
        .form(&[("page", "0"), ("q", "")])
        .send()
        .await
        .expect("toggle");
    {
        let users = backend.users.lock().await;
        let maria = users.iter().find(|u| u["id"] == json!(10)).unwrap();
        assert_eq!(maria["active"], json!(false));
    }

    client
        .post(format!("{base}/users/10"))
        .form(&[
            ("name", "Maria da Silva"),
            ("email", "maria@example.com"),
            ("role", "STOCKIST"),
        ])
        .send()
        .await
        .expect("update");
    let users = backend.users.lock().await;
    let maria = users.iter().find(|u| u["id"] == json!(10)).unwrap();
    assert_eq!(maria["role"], json!("STOCKIST"));
    assert_eq!(maria["name"], json!("Maria da Silva"));
}
