//! Storefront login, registration, and order history.

use mangaba_integration_tests::{FakeBackend, browser, spawn_backend, spawn_storefront};
use uuid::Uuid;

async fn setup() -> String {
    let backend = FakeBackend::seeded();
    let backend_url = spawn_backend(backend).await;
    spawn_storefront(&backend_url).await
}

#[tokio::test]
async fn login_stores_the_profile_and_greets_the_user() {
    let base = setup().await;
    let client = browser();

    let resp = client
        .post(format!("{base}/auth/login"))
        .form(&[("email", "maria@example.com"), ("password", "abc123")])
        .send()
        .await
        .expect("login");

    // Redirected home, header shows the first name
    assert_eq!(resp.url().path(), "/");
    let body = resp.text().await.expect("body");
    assert!(body.contains("Hello, Test"), "{body}");
}

#[tokio::test]
async fn bad_credentials_render_the_backend_message_inline() {
    let base = setup().await;
    let client = browser();

    let body = client
        .post(format!("{base}/auth/login"))
        .form(&[("email", "maria@example.com"), ("password", "wrong")])
        .send()
        .await
        .expect("login")
        .text()
        .await
        .expect("body");
    assert!(body.contains("Invalid credentials"), "{body}");
}

#[tokio::test]
async fn malformed_email_never_reaches_the_backend() {
    let base = setup().await;
    let client = browser();

    let body = client
        .post(format!("{base}/auth/login"))
        .form(&[("email", "not-an-email"), ("password", "abc123")])
        .send()
        .await
        .expect("login")
        .text()
        .await
        .expect("body");
    assert!(body.contains("email must contain an @ symbol"), "{body}");
}

#[tokio::test]
async fn registration_redirects_to_login_with_a_notice() {
    let base = setup().await;
    let client = browser();
    let email = format!("{}@example.com", Uuid::new_v4());

    let resp = client
        .post(format!("{base}/auth/register"))
        .form(&[
            ("name", "New Person"),
            ("email", email.as_str()),
            ("password", "abc123"),
            ("password_confirm", "abc123"),
        ])
        .send()
        .await
        .expect("register");

    assert!(resp.url().path().ends_with("/auth/login"), "{}", resp.url());
    let body = resp.text().await.expect("body");
    assert!(body.contains("Account created"), "{body}");
}

#[tokio::test]
async fn mismatched_passwords_are_caught_locally() {
    let base = setup().await;
    let client = browser();

    let body = client
        .post(format!("{base}/auth/register"))
        .form(&[
            ("name", "New Person"),
            ("email", "new@example.com"),
            ("password", "abc123"),
            ("password_confirm", "different"),
        ])
        .send()
        .await
        .expect("register")
        .text()
        .await
        .expect("body");
    assert!(body.contains("Passwords do not match"), "{body}");
}

#[tokio::test]
async fn order_history_requires_login() {
    let base = setup().await;
    let client = browser();

    let resp = client
        .get(format!("{base}/account/orders"))
        .send()
        .await
        .expect("orders");
    assert!(resp.url().path().ends_with("/auth/login"), "{}", resp.url());
}

#[tokio::test]
async fn order_history_lists_backend_orders() {
    let base = setup().await;
    let client = browser();
    client
        .post(format!("{base}/auth/login"))
        .form(&[("email", "maria@example.com"), ("password", "abc123")])
        .send()
        .await
        .expect("login");

    let body = client
        .get(format!("{base}/account/orders"))
        .send()
        .await
        .expect("orders")
        .text()
        .await
        .expect("body");

    assert!(body.contains("#4242"), "{body}");
    assert!(body.contains("Paid"), "{body}");
    assert!(body.contains("R$ 35.90"), "{body}");
    assert!(body.contains("02/11/2025"), "{body}");
}
