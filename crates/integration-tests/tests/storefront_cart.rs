//! Cart behavior over HTTP: add, increment, decrement, remove, clear-on-order.

use mangaba_integration_tests::{FakeBackend, browser, spawn_backend, spawn_storefront};

async fn setup() -> (String, std::sync::Arc<FakeBackend>) {
    let backend = FakeBackend::seeded();
    let backend_url = spawn_backend(backend.clone()).await;
    let storefront = spawn_storefront(&backend_url).await;
    (storefront, backend)
}

#[tokio::test]
async fn add_to_cart_updates_count_badge() {
    let (base, _backend) = setup().await;
    let client = browser();

    let resp = client
        .post(format!("{base}/cart/add"))
        .form(&[("product_id", "1")])
        .send()
        .await
        .expect("add to cart");
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get("HX-Trigger").and_then(|v| v.to_str().ok()),
        Some("cart-updated")
    );
    let body = resp.text().await.expect("body");
    assert!(body.contains(">1<"), "badge should show one item: {body}");
}

#[tokio::test]
async fn adding_same_product_twice_increments_quantity() {
    let (base, _backend) = setup().await;
    let client = browser();

    for _ in 0..2 {
        client
            .post(format!("{base}/cart/add"))
            .form(&[("product_id", "1")])
            .send()
            .await
            .expect("add to cart");
    }

    let body = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart page")
        .text()
        .await
        .expect("body");

    // One line, quantity 2, subtotal 2 x 10.00
    assert!(body.contains("Ceramic Vase"));
    assert!(body.contains("data-quantity=\"1\">2<"), "{body}");
    assert!(body.contains("data-subtotal>R$ 20.00<"), "{body}");
}

#[tokio::test]
async fn decrement_at_quantity_one_removes_the_line() {
    let (base, _backend) = setup().await;
    let client = browser();

    client
        .post(format!("{base}/cart/add"))
        .form(&[("product_id", "2")])
        .send()
        .await
        .expect("add to cart");

    let body = client
        .post(format!("{base}/cart/decrement"))
        .form(&[("product_id", "2")])
        .send()
        .await
        .expect("decrement")
        .text()
        .await
        .expect("body");

    assert!(body.contains("Your cart is empty"), "{body}");
}

#[tokio::test]
async fn remove_is_idempotent_over_http() {
    let (base, _backend) = setup().await;
    let client = browser();

    client
        .post(format!("{base}/cart/add"))
        .form(&[("product_id", "1")])
        .send()
        .await
        .expect("add to cart");

    for _ in 0..2 {
        let resp = client
            .post(format!("{base}/cart/remove"))
            .form(&[("product_id", "1")])
            .send()
            .await
            .expect("remove");
        assert!(resp.status().is_success());
    }

    let body = client
        .get(format!("{base}/cart/count"))
        .send()
        .await
        .expect("count")
        .text()
        .await
        .expect("body");
    // Badge renders nothing at zero items
    assert!(!body.contains(">1<"), "{body}");
}

#[tokio::test]
async fn cart_page_renders_empty_for_fresh_session() {
    let (base, _backend) = setup().await;
    let client = browser();

    let body = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart page")
        .text()
        .await
        .expect("body");
    assert!(body.contains("Your cart is empty"), "{body}");
}
