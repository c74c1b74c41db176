//! Test harness for the Mangaba binaries.
//!
//! The backend REST API is an external collaborator, so the tests run
//! against an in-process fake that speaks its wire contract: Spring-style
//! pages (`content` + `totalPages`), `message` error bodies, and the
//! viacep lookup shape. The real storefront and admin routers are mounted
//! on ephemeral ports and driven over HTTP with cookie-carrying clients.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::Router;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use url::Url;

/// Mutable state behind the fake backend.
#[derive(Debug)]
pub struct FakeBackend {
    pub products: Mutex<Vec<Value>>,
    pub users: Mutex<Vec<Value>>,
    /// Every order body the backend accepted, in arrival order.
    pub orders: Mutex<Vec<Value>>,
    /// When true, `POST /orders` answers 500.
    pub fail_orders: Mutex<bool>,
}

impl FakeBackend {
    /// A backend seeded with a small catalogue and user list.
    #[must_use]
    pub fn seeded() -> Arc<Self> {
        Arc::new(Self {
            products: Mutex::new(vec![
                json!({"id": 1, "name": "Ceramic Vase", "description": "Hand made", "price": 10.0, "stock": 5, "active": true}),
                json!({"id": 2, "name": "Wooden Tray", "price": 25.0, "stock": 3, "active": true}),
                json!({"id": 3, "name": "Linen Cushion", "price": 40.0, "stock": 0, "active": false}),
            ]),
            users: Mutex::new(vec![
                json!({"id": 10, "name": "Maria Silva", "email": "maria@example.com", "role": "CUSTOMER", "active": true}),
                json!({"id": 11, "name": "Ana Souza", "email": "ana@example.com", "role": "STOCKIST", "active": true}),
            ]),
            orders: Mutex::new(Vec::new()),
            fail_orders: Mutex::new(false),
        })
    }
}

fn page_of(items: &[Value], params: &HashMap<String, String>) -> Value {
    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
    let size: usize = params.get("size").and_then(|s| s.parse().ok()).unwrap_or(10);
    let total_pages = items.len().div_ceil(size);
    let content: Vec<Value> = items.iter().skip(page * size).take(size).cloned().collect();
    json!({"content": content, "totalPages": total_pages})
}

fn not_found(what: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": format!("{what} not found")})),
    )
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    if password == "wrong" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid credentials"})),
        );
    }

    let role = if email.starts_with("admin@") {
        "ADMIN"
    } else if email.starts_with("stockist@") {
        "STOCKIST"
    } else {
        "CUSTOMER"
    };

    (
        StatusCode::OK,
        Json(json!({"id": 77, "name": "Test Person", "role": role})),
    )
}

async fn register(Json(_body): Json<Value>) -> StatusCode {
    StatusCode::CREATED
}

async fn list_products(
    State(backend): State<Arc<FakeBackend>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    Json(page_of(&backend.products.lock().await, &params))
}

async fn get_product(
    State(backend): State<Arc<FakeBackend>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let products = backend.products.lock().await;
    products
        .iter()
        .find(|p| p["id"] == json!(id))
        .map_or_else(
            || not_found("product").into_response(),
            |p| Json(p.clone()).into_response(),
        )
}

async fn toggle_product(
    State(backend): State<Arc<FakeBackend>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let mut products = backend.products.lock().await;
    match products.iter_mut().find(|p| p["id"] == json!(id)) {
        Some(p) => {
            let flipped = !p["active"].as_bool().unwrap_or(true);
            p["active"] = json!(flipped);
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found("product").into_response(),
    }
}

async fn update_product(
    State(backend): State<Arc<FakeBackend>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mut products = backend.products.lock().await;
    match products.iter_mut().find(|p| p["id"] == json!(id)) {
        Some(p) => {
            for key in ["name", "description", "price", "stock"] {
                if let Some(value) = body.get(key) {
                    p[key] = value.clone();
                }
            }
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found("product").into_response(),
    }
}

async fn create_product(
    State(backend): State<Arc<FakeBackend>>,
    Json(mut body): Json<Value>,
) -> StatusCode {
    let mut products = backend.products.lock().await;
    let next_id = products.len() as i64 + 1;
    body["id"] = json!(next_id);
    body["active"] = json!(true);
    products.push(body);
    StatusCode::CREATED
}

async fn upload_images() -> StatusCode {
    StatusCode::CREATED
}

async fn list_users(
    State(backend): State<Arc<FakeBackend>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    Json(page_of(&backend.users.lock().await, &params))
}

async fn get_user(
    State(backend): State<Arc<FakeBackend>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let users = backend.users.lock().await;
    users.iter().find(|u| u["id"] == json!(id)).map_or_else(
        || not_found("user").into_response(),
        |u| Json(u.clone()).into_response(),
    )
}

async fn toggle_user(
    State(backend): State<Arc<FakeBackend>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let mut users = backend.users.lock().await;
    match users.iter_mut().find(|u| u["id"] == json!(id)) {
        Some(u) => {
            let flipped = !u["active"].as_bool().unwrap_or(true);
            u["active"] = json!(flipped);
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found("user").into_response(),
    }
}

async fn update_user(
    State(backend): State<Arc<FakeBackend>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mut users = backend.users.lock().await;
    match users.iter_mut().find(|u| u["id"] == json!(id)) {
        Some(u) => {
            for key in ["name", "email", "role"] {
                if let Some(value) = body.get(key) {
                    u[key] = value.clone();
                }
            }
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found("user").into_response(),
    }
}

async fn shipping_quote(Path(cep): Path<String>) -> impl IntoResponse {
    if cep == "99999999" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "quote service down"})),
        );
    }
    (StatusCode::OK, Json(json!({"price": 20})))
}

async fn submit_order(
    State(backend): State<Arc<FakeBackend>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if *backend.fail_orders.lock().await {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Could not place the order"})),
        );
    }
    backend.orders.lock().await.push(body);
    (StatusCode::CREATED, Json(json!({"id": 4242})))
}

async fn order_history(Path(_id): Path<i64>) -> Json<Value> {
    Json(json!([
        {"id": 4242, "status": "PAID", "total": 35.9, "createdAt": "2025-11-02T14:00:00Z"}
    ]))
}

async fn cep_lookup(Path(cep): Path<String>) -> Json<Value> {
    if cep == "01310100" {
        Json(json!({
            "cep": "01310-100",
            "logradouro": "Avenida Paulista",
            "bairro": "Bela Vista",
            "localidade": "Sao Paulo",
            "uf": "SP"
        }))
    } else {
        Json(json!({"erro": true}))
    }
}

/// Router implementing the backend wire contract (plus the CEP service).
fn backend_router(backend: Arc<FakeBackend>) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/users", get(list_users).post(register))
        .route("/users/{id}", get(get_user).put(update_user))
        .route("/users/{id}/status", put(toggle_user))
        .route("/users/{id}/orders", get(order_history))
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", get(get_product).put(update_product))
        .route("/products/{id}/status", put(toggle_product))
        .route("/products/{id}/images", post(upload_images))
        .route("/orders", post(submit_order))
        .route("/shipping/{cep}", get(shipping_quote))
        .route("/ws/{cep}/json/", get(cep_lookup))
        .with_state(backend)
}

/// Serve a router on an ephemeral port, returning its base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

/// Spawn the fake backend; returns its base URL.
pub async fn spawn_backend(backend: Arc<FakeBackend>) -> String {
    serve(backend_router(backend)).await
}

/// Spawn the real storefront against the given backend; returns its base URL.
///
/// The CEP lookup is pointed at the same fake, which also implements the
/// `/ws/{cep}/json/` shape.
pub async fn spawn_storefront(backend_url: &str) -> String {
    use mangaba_storefront::{config::StorefrontConfig, middleware, routes, state::AppState};

    let config = StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        backend_api_url: Url::parse(backend_url).unwrap(),
        cep_lookup_url: Url::parse(backend_url).unwrap(),
        sentry_dsn: None,
    };

    let app = Router::new()
        .merge(routes::routes())
        .layer(middleware::create_session_layer())
        .with_state(AppState::new(config));

    serve(app).await
}

/// Spawn the real admin panel against the given backend; returns its base URL.
pub async fn spawn_admin(backend_url: &str) -> String {
    use mangaba_admin::{config::AdminConfig, middleware, routes, state::AppState};

    let config = AdminConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        backend_api_url: Url::parse(backend_url).unwrap(),
        backend_api_token: SecretString::from("kJ8#mP2$vN5@qR7!wT4^xZ9&cF3*bG6j"),
        sentry_dsn: None,
    };

    let app = Router::new()
        .merge(routes::routes())
        .layer(middleware::create_session_layer())
        .with_state(AppState::new(config));

    serve(app).await
}

/// A client that keeps cookies, like a browser tab.
#[must_use]
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("build HTTP client")
}
