#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use delivery_server::core::build_app;
use delivery_server::db::repository::user;
use delivery_server::{Config, ServerState};
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::models::Role;
use tower::ServiceExt;

pub struct TestApp {
    pub state: ServerState,
    pub router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(Config::for_tests()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let state = ServerState::initialize(&config).await.expect("test state");
        let router = build_app(state.clone());
        Self { state, router }
    }

    /// File-backed database with a real pool, for restart and concurrency tests
    pub async fn with_database(url: &str) -> Self {
        Self::with_config(Config {
            database_url: url.to_string(),
            db_max_connections: 5,
            ..Config::for_tests()
        })
        .await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.expect("oneshot");
        let status = response.status();
        let bytes = response.into_body().collect().await.expect("body").to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, body)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    pub async fn register(&self, email: &str, password: &str, role: &str) -> (StatusCode, Value) {
        self.post(
            "/register",
            None,
            json!({
                "email": email,
                "password": password,
                "first_name": "Test",
                "last_name": "User",
                "role": role,
            }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        let form = format!("username={email}&password={password}");
        let request = Request::builder()
            .method(Method::POST)
            .uri("/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .expect("request");
        self.send(request).await
    }

    /// Register and log in, returning (user id, token)
    pub async fn signup(&self, email: &str, role: &str) -> (i64, String) {
        let (status, body) = self.register(email, "pw123", role).await;
        assert_eq!(status, StatusCode::OK, "register {email}: {body}");
        let (status, token) = self.login(email, "pw123").await;
        assert_eq!(status, StatusCode::OK, "login {email}: {token}");
        (
            body["id"].as_i64().expect("user id"),
            token["access_token"].as_str().expect("token").to_string(),
        )
    }

    /// Admins cannot self-register; promote a registered customer instead
    pub async fn signup_admin(&self, email: &str) -> (i64, String) {
        let (id, token) = self.signup(email, "customer").await;
        user::set_role(&self.state.pool, id, Role::Admin)
            .await
            .expect("promote");
        (id, token)
    }

    pub async fn create_restaurant(&self, token: &str, name: &str, cuisine: &str) -> Value {
        let (status, body) = self
            .post("/restaurants", Some(token), restaurant_payload(name, cuisine))
            .await;
        assert_eq!(status, StatusCode::OK, "create restaurant: {body}");
        body
    }

    pub async fn create_item(&self, token: &str, restaurant_id: i64, name: &str, price: f64) -> Value {
        let (status, body) = self
            .post(
                &format!("/restaurants/{restaurant_id}/menu-items"),
                Some(token),
                json!({ "name": name, "price": price, "category": "mains" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create item: {body}");
        body
    }
}

pub fn restaurant_payload(name: &str, cuisine: &str) -> Value {
    json!({
        "name": name,
        "cuisine_type": cuisine,
        "street_address": "1 Main St",
        "city": "Springfield",
        "state": "IL",
        "postal_code": "62701",
        "delivery_fee": 2.99,
        "minimum_order": 0.0,
        "estimated_delivery_time": 30,
    })
}

pub fn order_payload(restaurant_id: i64, lines: &[(i64, i64)]) -> Value {
    let items: Vec<Value> = lines
        .iter()
        .map(|(id, qty)| json!({ "menu_item_id": id, "quantity": qty }))
        .collect();
    json!({
        "restaurant_id": restaurant_id,
        "delivery_address": "742 Evergreen Terrace",
        "items": items,
    })
}

pub fn assert_money(value: &Value, expected: f64) {
    let actual = value.as_f64().expect("number");
    assert!(
        (actual - expected).abs() < 0.005,
        "expected {expected}, got {actual}"
    );
}
