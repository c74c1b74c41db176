//! Checkout flow over HTTP: address, payment validation, summary guards,
//! and order submission.

use mangaba_integration_tests::{FakeBackend, browser, spawn_backend, spawn_storefront};
use serde_json::json;

async fn setup() -> (String, std::sync::Arc<FakeBackend>) {
    let backend = FakeBackend::seeded();
    let backend_url = spawn_backend(backend.clone()).await;
    let storefront = spawn_storefront(&backend_url).await;
    (storefront, backend)
}

async fn add_product(client: &reqwest::Client, base: &str, id: &str) {
    client
        .post(format!("{base}/cart/add"))
        .form(&[("product_id", id)])
        .send()
        .await
        .expect("add to cart");
}

const ADDRESS_FORM: &[(&str, &str)] = &[
    ("cep", "01310-100"),
    ("street", "Avenida Paulista"),
    ("number", "1000"),
    ("complement", ""),
    ("neighborhood", "Bela Vista"),
    ("city", "Sao Paulo"),
    ("state", "SP"),
];

const VALID_CARD: &[(&str, &str)] = &[
    ("method", "card"),
    ("number", "4111 1111 1111 1111"),
    ("holder", "Maria Silva"),
    ("expiry", "12/26"),
    ("cvv", "123"),
];

#[tokio::test]
async fn checkout_with_empty_cart_redirects_back_to_cart() {
    let (base, _backend) = setup().await;
    let client = browser();

    let resp = client
        .get(format!("{base}/checkout"))
        .send()
        .await
        .expect("checkout entry");
    assert!(resp.url().path().ends_with("/cart"), "{}", resp.url());
}

#[tokio::test]
async fn cep_lookup_fills_address_fields() {
    let (base, _backend) = setup().await;
    let client = browser();

    let body = client
        .post(format!("{base}/checkout/address/lookup"))
        .form(&[("cep", "01310-100")])
        .send()
        .await
        .expect("lookup")
        .text()
        .await
        .expect("body");

    assert!(body.contains("Avenida Paulista"), "{body}");
    assert!(body.contains("Bela Vista"), "{body}");
}

#[tokio::test]
async fn unknown_cep_reports_not_found() {
    let (base, _backend) = setup().await;
    let client = browser();

    let body = client
        .post(format!("{base}/checkout/address/lookup"))
        .form(&[("cep", "00000-000")])
        .send()
        .await
        .expect("lookup")
        .text()
        .await
        .expect("body");

    assert!(body.contains("CEP not found"), "{body}");
}

#[tokio::test]
async fn invalid_card_is_rejected_with_field_errors() {
    let (base, _backend) = setup().await;
    let client = browser();
    add_product(&client, &base, "1").await;
    client
        .get(format!("{base}/checkout"))
        .send()
        .await
        .expect("entry");
    client
        .post(format!("{base}/checkout/address"))
        .form(ADDRESS_FORM)
        .send()
        .await
        .expect("address");

    // 15-digit number, month 13, 2-digit CVV
    let body = client
        .post(format!("{base}/checkout/payment"))
        .form(&[
            ("method", "card"),
            ("number", "4111 1111 1111 111"),
            ("holder", "Maria Silva"),
            ("expiry", "13/25"),
            ("cvv", "12"),
        ])
        .send()
        .await
        .expect("payment")
        .text()
        .await
        .expect("body");

    assert!(body.contains("Card number must have 16 digits"), "{body}");
    assert!(body.contains("Expiry must be MM/YY"), "{body}");
    assert!(body.contains("CVV must have 3 or 4 digits"), "{body}");
}

#[tokio::test]
async fn summary_confirm_is_blocked_without_payment() {
    let (base, backend) = setup().await;
    let client = browser();
    add_product(&client, &base, "1").await;
    client
        .get(format!("{base}/checkout"))
        .send()
        .await
        .expect("entry");
    client
        .post(format!("{base}/checkout/address"))
        .form(ADDRESS_FORM)
        .send()
        .await
        .expect("address");

    // Straight to the summary, skipping payment
    let body = client
        .get(format!("{base}/checkout/summary"))
        .send()
        .await
        .expect("summary")
        .text()
        .await
        .expect("body");
    assert!(body.contains("No payment method selected"), "{body}");
    assert!(body.contains("disabled"), "confirm must be disabled: {body}");

    // Forcing the POST is refused too, and nothing reaches the backend
    let body = client
        .post(format!("{base}/checkout/confirm"))
        .send()
        .await
        .expect("confirm")
        .text()
        .await
        .expect("body");
    assert!(body.contains("payment method"), "{body}");
    assert!(backend.orders.lock().await.is_empty());
}

#[tokio::test]
async fn full_checkout_places_the_order_and_clears_the_cart() {
    let (base, backend) = setup().await;
    let client = browser();
    add_product(&client, &base, "1").await;
    add_product(&client, &base, "1").await;
    add_product(&client, &base, "2").await;

    client
        .get(format!("{base}/checkout"))
        .send()
        .await
        .expect("entry");
    client
        .post(format!("{base}/checkout/address"))
        .form(ADDRESS_FORM)
        .send()
        .await
        .expect("address");
    client
        .post(format!("{base}/checkout/payment"))
        .form(VALID_CARD)
        .send()
        .await
        .expect("payment");

    let summary = client
        .get(format!("{base}/checkout/summary"))
        .send()
        .await
        .expect("summary")
        .text()
        .await
        .expect("body");
    // subtotal 2 x 10 + 25 = 45, shipping 20 from the quote, total 65
    assert!(summary.contains("R$ 45.00"), "{summary}");
    assert!(summary.contains("data-total>R$ 65.00<"), "{summary}");
    assert!(summary.contains("Ending in 1111"), "{summary}");

    let resp = client
        .post(format!("{base}/checkout/confirm"))
        .send()
        .await
        .expect("confirm");
    assert!(
        resp.url().path().ends_with("/checkout/confirmed"),
        "{}",
        resp.url()
    );
    let body = resp.text().await.expect("body");
    assert!(body.contains("#4242"), "{body}");

    // The backend received the canonical order shape
    let orders = backend.orders.lock().await;
    assert_eq!(orders.len(), 1);
    let order = orders.first().unwrap();
    assert_eq!(order["address"]["cep"], json!("01310100"));
    assert_eq!(order["payment"]["type"], json!("card"));
    assert_eq!(order["shipping"], json!("20"));
    assert_eq!(order["items"].as_array().map(Vec::len), Some(2));

    // And the cart was cleared
    drop(orders);
    let cart = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart")
        .text()
        .await
        .expect("body");
    assert!(cart.contains("Your cart is empty"), "{cart}");
}

#[tokio::test]
async fn failed_submission_keeps_the_user_on_summary() {
    let (base, backend) = setup().await;
    let client = browser();
    add_product(&client, &base, "1").await;
    client
        .get(format!("{base}/checkout"))
        .send()
        .await
        .expect("entry");
    client
        .post(format!("{base}/checkout/address"))
        .form(ADDRESS_FORM)
        .send()
        .await
        .expect("address");
    client
        .post(format!("{base}/checkout/payment"))
        .form(&[("method", "boleto")])
        .send()
        .await
        .expect("payment");

    *backend.fail_orders.lock().await = true;

    let body = client
        .post(format!("{base}/checkout/confirm"))
        .send()
        .await
        .expect("confirm")
        .text()
        .await
        .expect("body");

    // The backend's message is surfaced and the draft survives
    assert!(body.contains("Could not place the order"), "{body}");
    assert!(body.contains("Order summary"), "{body}");
    assert!(backend.orders.lock().await.is_empty());

    // Retry succeeds once the backend recovers
    *backend.fail_orders.lock().await = false;
    let resp = client
        .post(format!("{base}/checkout/confirm"))
        .send()
        .await
        .expect("confirm again");
    assert!(
        resp.url().path().ends_with("/checkout/confirmed"),
        "{}",
        resp.url()
    );
    assert_eq!(backend.orders.lock().await.len(), 1);
}

#[tokio::test]
async fn going_back_keeps_entered_data() {
    let (base, _backend) = setup().await;
    let client = browser();
    add_product(&client, &base, "1").await;
    client
        .get(format!("{base}/checkout"))
        .send()
        .await
        .expect("entry");
    client
        .post(format!("{base}/checkout/address"))
        .form(ADDRESS_FORM)
        .send()
        .await
        .expect("address");

    // Navigate backward to the address step: the form is still filled
    let body = client
        .get(format!("{base}/checkout/address"))
        .send()
        .await
        .expect("address page")
        .text()
        .await
        .expect("body");
    assert!(body.contains("Avenida Paulista"), "{body}");
    assert!(body.contains("01310-100"), "{body}");
}

#[tokio::test]
async fn shipping_quote_failure_falls_back_to_standard_rate() {
    let (base, backend) = setup().await;
    let client = browser();
    add_product(&client, &base, "1").await;
    client
        .get(format!("{base}/checkout"))
        .send()
        .await
        .expect("entry");

    // The fake backend fails quotes for this CEP
    client
        .post(format!("{base}/checkout/address"))
        .form(&[
            ("cep", "99999-999"),
            ("street", "Rua das Flores"),
            ("number", "1"),
            ("complement", ""),
            ("neighborhood", "Centro"),
            ("city", "Curitiba"),
            ("state", "PR"),
        ])
        .send()
        .await
        .expect("address");
    client
        .post(format!("{base}/checkout/payment"))
        .form(&[("method", "boleto")])
        .send()
        .await
        .expect("payment");

    let summary = client
        .get(format!("{base}/checkout/summary"))
        .send()
        .await
        .expect("summary")
        .text()
        .await
        .expect("body");
    // 10.00 subtotal + 15.90 standard rate
    assert!(summary.contains("R$ 15.90"), "{summary}");
    assert!(summary.contains("data-total>R$ 25.90<"), "{summary}");

    client
        .post(format!("{base}/checkout/confirm"))
        .send()
        .await
        .expect("confirm");
    let orders = backend.orders.lock().await;
    assert_eq!(orders.first().map(|o| o["shipping"].clone()), Some(serde_json::json!("15.90")));
}
