//! Integration tests for Emporium.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p emporium-integration-tests
//! ```
//!
//! No external services are needed: every test starts [`MockShop`], an
//! in-process axum server on an ephemeral port that behaves like the shop
//! backend, and points a real [`ApiClient`] at it.
//!
//! # Test Categories
//!
//! - `storefront_auth` - Login, registration, logout and session persistence
//! - `storefront_cart` - Cart envelopes, add/remove/clear
//! - `storefront_checkout` - Pricing and order placement
//! - `storefront_orders` - Catalog, order history and cancellation
//! - `admin_console` - Admin role check, listings and product creation

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use emporium_storefront::{ApiClient, ClientConfig, MemorySession, SessionStore};
use secrecy::SecretString;
use serde_json::{Value, json};

/// Seeded shopper account.
pub const SHOPPER_EMAIL: &str = "asha@example.com";
/// Password of [`SHOPPER_EMAIL`].
pub const SHOPPER_PASSWORD: &str = "Abcdefgh1!";
/// Seeded administrator account.
pub const ADMIN_EMAIL: &str = "admin@example.com";
/// Password of [`ADMIN_EMAIL`].
pub const ADMIN_PASSWORD: &str = "Admin#2024";

/// How `GET /api/cart` wraps its lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CartEnvelope {
    /// `{"items": [...]}` with populated products.
    #[default]
    Items,
    /// `{"products": [...]}` with populated products.
    Products,
    /// `[...]` with populated products.
    Bare,
    /// `{"data": {"cart": {"items": [...]}}}` with populated products.
    NestedData,
    /// `{"items": [...]}` with product ids and name/price on the line.
    Flattened,
}

/// Backend data. Tests seed it, run the client, then inspect it.
#[derive(Debug, Default)]
pub struct ShopState {
    pub products: Vec<Value>,
    pub users: Vec<Value>,
    pub orders: Vec<Value>,
    /// Cart lines as `{"productId": <product>, "quantity": n}`.
    pub cart: Vec<Value>,
    pub cart_envelope: CartEnvelope,
    /// Bodies received by `POST /api/orders`.
    pub placed_orders: Vec<Value>,
    /// Bodies received by `POST /api/auth/register`.
    pub registrations: Vec<Value>,
    /// Product whose removal from the cart fails with a 500.
    pub fail_remove: Option<String>,
    sessions: HashMap<String, String>,
}

impl ShopState {
    /// A small shop: three products, a shopper, an admin, an inactive
    /// shopper and a few orders.
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            products: vec![
                json!({
                    "_id": "p-kurta",
                    "productName": "Cotton Kurta",
                    "description": "Hand-block printed",
                    "price": 300,
                    "originalPrice": 400,
                    "category": "fashion",
                    "stock": 25,
                    "rating": 4.2,
                    "features": ["100% cotton"]
                }),
                json!({
                    "_id": "p-socks",
                    "productName": "Wool Socks",
                    "price": "50",
                    "category": "fashion",
                    "stock": 100
                }),
                json!({
                    "_id": "p-lamp",
                    "productName": "Desk Lamp",
                    "price": 1299,
                    "category": "home",
                    "stock": 0
                }),
            ],
            users: vec![
                json!({
                    "_id": "u-asha",
                    "userName": "Asha Rao",
                    "email": SHOPPER_EMAIL,
                    "password": SHOPPER_PASSWORD,
                    "role": "user",
                    "createdAt": "2024-01-15T09:30:00Z"
                }),
                json!({
                    "_id": "u-root",
                    "userName": "Store Admin",
                    "email": ADMIN_EMAIL,
                    "password": ADMIN_PASSWORD,
                    "role": "admin"
                }),
                json!({
                    "_id": "u-chen",
                    "userName": "Chen Li",
                    "email": "chen@example.com",
                    "password": "Chen#2024x",
                    "role": "user",
                    "isActive": false
                }),
            ],
            orders: vec![
                json!({
                    "_id": "665f00000000000000a00001",
                    "userId": "u-asha",
                    "orderStatus": "pending",
                    "totalAmount": "767.00",
                    "paymentMethod": "cod",
                    "paymentStatus": "pending",
                    "createdAt": "2024-05-01T10:00:00Z",
                    "items": [
                        {"productId": "p-kurta", "productName": "Cotton Kurta", "quantity": 2, "price": 300},
                        {"productId": "p-socks", "productName": "Wool Socks", "quantity": 1, "price": 50}
                    ]
                }),
                json!({
                    "_id": "665f00000000000000a00002",
                    "userId": "u-asha",
                    "orderStatus": "shipped",
                    "totalAmount": 1582.82,
                    "paymentMethod": "upi",
                    "paymentStatus": "paid",
                    "items": [{"productId": "p-lamp", "productName": "Desk Lamp"}]
                }),
                json!({
                    "_id": "665f00000000000000a00003",
                    "userId": "u-chen",
                    "orderStatus": "delivered",
                    "totalAmount": "118.00",
                    "items": [{"productId": "p-socks", "quantity": 1, "price": 50}]
                }),
            ],
            ..Self::default()
        }
    }

    /// Put `quantity` units of a seeded product in the cart.
    ///
    /// # Panics
    ///
    /// Panics if the product is not seeded.
    #[must_use]
    pub fn with_cart_line(mut self, product_id: &str, quantity: u32) -> Self {
        let product = self
            .product(product_id)
            .cloned()
            .unwrap_or_else(|| panic!("unknown product {product_id}"));
        self.cart.push(json!({"productId": product, "quantity": quantity}));
        self
    }

    fn product(&self, id: &str) -> Option<&Value> {
        self.products.iter().find(|p| p["_id"] == id)
    }

    fn current_user(&self, headers: &HeaderMap) -> Option<Value> {
        let token = headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        let user_id = self.sessions.get(token)?;
        self.users.iter().find(|u| u["_id"] == user_id.as_str()).cloned()
    }

    fn render_cart(&self) -> Value {
        match self.cart_envelope {
            CartEnvelope::Items => json!({"items": self.cart}),
            CartEnvelope::Products => json!({"products": self.cart}),
            CartEnvelope::Bare => Value::Array(self.cart.clone()),
            CartEnvelope::NestedData => json!({"data": {"cart": {"items": self.cart}}}),
            CartEnvelope::Flattened => {
                let lines: Vec<Value> = self
                    .cart
                    .iter()
                    .map(|line| {
                        let product = &line["productId"];
                        json!({
                            "productId": product["_id"],
                            "name": product["productName"],
                            "price": product["price"],
                            "quantity": line["quantity"]
                        })
                    })
                    .collect();
                json!({"items": lines})
            }
        }
    }
}

type Shared = Arc<Mutex<ShopState>>;

fn lock(state: &Shared) -> MutexGuard<'_, ShopState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn unauthorized() -> Response {
    reply(StatusCode::UNAUTHORIZED, json!({"message": "Please log in"}))
}

fn forbidden() -> Response {
    reply(StatusCode::FORBIDDEN, json!({"message": "Admin access required"}))
}

fn public_profile(user: &Value) -> Value {
    let mut profile = user.clone();
    if let Some(map) = profile.as_object_mut() {
        map.remove("password");
    }
    profile
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_products(State(state): State<Shared>) -> Response {
    let shop = lock(&state);
    reply(StatusCode::OK, json!({"success": true, "products": shop.products}))
}

async fn get_product(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let shop = lock(&state);
    shop.product(&id).map_or_else(
        || reply(StatusCode::NOT_FOUND, json!({"message": "Product not found"})),
        |product| reply(StatusCode::OK, json!({"product": product})),
    )
}

async fn create_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut shop = lock(&state);
    let Some(user) = shop.current_user(&headers) else {
        return unauthorized();
    };
    if user["role"] != "admin" {
        return forbidden();
    }
    let product = json!({
        "_id": format!("prod-{}", shop.products.len() + 1),
        "productName": body["productName"],
        "description": body["description"],
        "price": body["price"],
        "category": body["category"],
        "stock": body["stockQuantity"],
        "imageUrl": body["imageUrl"]
    });
    shop.products.push(product.clone());
    reply(StatusCode::CREATED, json!({"product": product}))
}

async fn get_cart(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let shop = lock(&state);
    if shop.current_user(&headers).is_none() {
        return unauthorized();
    }
    reply(StatusCode::OK, shop.render_cart())
}

async fn add_to_cart(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut shop = lock(&state);
    if shop.current_user(&headers).is_none() {
        return unauthorized();
    }
    let product_id = body["productId"].as_str().unwrap_or_default().to_string();
    let quantity = body["quantity"].as_u64().unwrap_or(1);
    let Some(product) = shop.product(&product_id).cloned() else {
        return reply(StatusCode::NOT_FOUND, json!({"message": "Product not found"}));
    };

    if let Some(line) = shop
        .cart
        .iter_mut()
        .find(|line| line["productId"]["_id"] == product_id.as_str())
    {
        let current = line["quantity"].as_u64().unwrap_or(0);
        line["quantity"] = json!(current + quantity);
    } else {
        shop.cart.push(json!({"productId": product, "quantity": quantity}));
    }
    reply(StatusCode::OK, json!({"message": "Added to cart"}))
}

async fn remove_from_cart(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
) -> Response {
    let mut shop = lock(&state);
    if shop.current_user(&headers).is_none() {
        return unauthorized();
    }
    if shop.fail_remove.as_deref() == Some(product_id.as_str()) {
        return reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "Cart update failed"}),
        );
    }
    shop.cart
        .retain(|line| line["productId"]["_id"] != product_id.as_str());
    reply(StatusCode::OK, json!({"message": "Removed"}))
}

async fn place_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut shop = lock(&state);
    let Some(user) = shop.current_user(&headers) else {
        return unauthorized();
    };
    let order_id = format!("665f00000000000000b{:05}", shop.orders.len() + 1);
    shop.orders.push(json!({
        "_id": order_id,
        "userId": user["_id"],
        "orderStatus": "pending",
        "paymentStatus": "pending",
        "paymentMethod": body["paymentMethod"],
        "totalAmount": body["totalAmount"],
        "items": body["items"],
        "shippingAddress": body["shippingAddress"]
    }));
    shop.placed_orders.push(body);
    shop.cart.clear();
    reply(
        StatusCode::CREATED,
        json!({"message": "Order placed", "order": {"_id": order_id}}),
    )
}

async fn order_history(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let shop = lock(&state);
    let Some(user) = shop.current_user(&headers) else {
        return unauthorized();
    };
    let orders: Vec<&Value> = shop
        .orders
        .iter()
        .filter(|order| order["userId"] == user["_id"])
        .collect();
    reply(StatusCode::OK, json!({"orders": orders}))
}

async fn all_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let shop = lock(&state);
    let Some(user) = shop.current_user(&headers) else {
        return unauthorized();
    };
    if user["role"] != "admin" {
        return forbidden();
    }
    reply(StatusCode::OK, json!({"data": {"orders": shop.orders}}))
}

async fn cancel_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut shop = lock(&state);
    let Some(user) = shop.current_user(&headers) else {
        return unauthorized();
    };
    let Some(order) = shop
        .orders
        .iter_mut()
        .find(|order| order["_id"] == id.as_str() && order["userId"] == user["_id"])
    else {
        return reply(StatusCode::NOT_FOUND, json!({"message": "Order not found"}));
    };

    if matches!(
        order["orderStatus"].as_str(),
        Some("shipped" | "delivered" | "cancelled")
    ) {
        return reply(
            StatusCode::BAD_REQUEST,
            json!({"message": "Order cannot be cancelled"}),
        );
    }
    order["orderStatus"] = json!("cancelled");
    reply(StatusCode::OK, json!({"message": "Order cancelled"}))
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut shop = lock(&state);
    let Some(user_id) = shop
        .users
        .iter()
        .find(|u| u["email"] == body["email"] && u["password"] == body["password"])
        .and_then(|u| u["_id"].as_str())
        .map(str::to_string)
    else {
        return reply(
            StatusCode::UNAUTHORIZED,
            json!({"message": "Invalid email or password"}),
        );
    };
    let token = format!("token-{user_id}");
    shop.sessions.insert(token.clone(), user_id);
    reply(StatusCode::OK, json!({"token": token}))
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut shop = lock(&state);
    shop.registrations.push(body.clone());
    if shop.users.iter().any(|u| u["email"] == body["email"]) {
        return reply(
            StatusCode::CONFLICT,
            json!({"error": "Email already registered"}),
        );
    }
    let user = json!({
        "_id": format!("u-{}", shop.users.len() + 1),
        "userName": body["userName"],
        "email": body["email"],
        "password": body["password"],
        "role": "user"
    });
    shop.users.push(user);
    reply(StatusCode::CREATED, json!({"message": "Registered"}))
}

async fn get_profile(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let shop = lock(&state);
    shop.current_user(&headers).map_or_else(unauthorized, |user| {
        reply(StatusCode::OK, json!({"user": public_profile(&user)}))
    })
}

async fn update_profile(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut shop = lock(&state);
    let Some(current) = shop.current_user(&headers) else {
        return unauthorized();
    };
    let Some(user) = shop.users.iter_mut().find(|u| u["_id"] == current["_id"]) else {
        return unauthorized();
    };
    for key in ["userName", "email", "phone", "address"] {
        if let Some(value) = body.get(key) {
            user[key] = value.clone();
        }
    }
    let profile = public_profile(user);
    reply(StatusCode::OK, json!({"success": true, "user": profile}))
}

async fn all_users(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let shop = lock(&state);
    let Some(user) = shop.current_user(&headers) else {
        return unauthorized();
    };
    if user["role"] != "admin" {
        return forbidden();
    }
    let users: Vec<Value> = shop.users.iter().map(public_profile).collect();
    reply(StatusCode::OK, Value::Array(users))
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/{id}", get(get_product))
        .route("/api/cart", get(get_cart))
        .route("/api/cart/add", post(add_to_cart))
        .route("/api/cart/remove/{product_id}", delete(remove_from_cart))
        .route("/api/orders", post(place_order))
        .route("/api/orders/history", get(order_history))
        .route("/api/orders/all", get(all_orders))
        .route("/api/orders/{id}/cancel", put(cancel_order))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/users", get(all_users))
        .route("/api/users/profile", get(get_profile).put(update_profile))
        .with_state(state)
}

// =============================================================================
// MockShop
// =============================================================================

/// A running mock backend.
pub struct MockShop {
    pub base_url: String,
    state: Shared,
}

impl MockShop {
    /// Serve `state` on an ephemeral local port.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(state: ShopState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let app = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Client configuration pointing at this backend.
    ///
    /// # Panics
    ///
    /// Panics if the base URL is rejected.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.base_url).expect("mock base url")
    }

    /// Client with a fresh in-memory session.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        self.client_with(Arc::new(MemorySession::new()))
    }

    /// Client using `session`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn client_with(&self, session: Arc<dyn SessionStore>) -> ApiClient {
        ApiClient::new(&self.config(), session).expect("build client")
    }

    /// Client logged in as `email`.
    ///
    /// # Panics
    ///
    /// Panics if the login fails.
    pub async fn logged_in(&self, email: &str, password: &str) -> ApiClient {
        let client = self.client();
        client
            .login(email, &SecretString::from(password.to_string()))
            .await
            .expect("login");
        client
    }

    /// Backend data, for seeding and assertions.
    pub fn state(&self) -> MutexGuard<'_, ShopState> {
        lock(&self.state)
    }
}
