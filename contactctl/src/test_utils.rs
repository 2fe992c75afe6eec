//! Shared fixtures for in-crate tests.

use crate::{
    api::models::{contacts::ContactResponse, responses::WebResponse, users::LoginResponse},
    auth::password::{Argon2Params, hash_string_with_params},
    config::Config,
    db::{
        handlers::{Addresses, Contacts, Repository, Users},
        models::{
            addresses::{AddressCreateDBRequest, AddressDBResponse},
            contacts::{ContactCreateDBRequest, ContactDBResponse},
            users::{UserCreateDBRequest, UserDBResponse},
        },
    },
    types::{ContactId, UserId},
};
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use sqlx::PgPool;

/// Password given to every fixture user.
pub const TEST_PASSWORD: &str = "rahasia";

pub async fn create_test_app(pool: PgPool) -> TestServer {
    let app = crate::Application::new_with_pool(create_test_config(), Some(pool))
        .await
        .expect("Failed to create application");

    app.into_test_server()
}

pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.auth.password_hashing = Argon2Params::insecure_fast();
    config
}

pub async fn create_test_user(pool: &PgPool, username: &str) -> UserDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let password_hash =
        hash_string_with_params(TEST_PASSWORD, Argon2Params::insecure_fast()).expect("Failed to hash test password");

    Users::new(&mut conn)
        .create(&UserCreateDBRequest {
            username: username.to_string(),
            name: format!("Test {username}"),
            password_hash,
        })
        .await
        .expect("Failed to create test user")
}

pub async fn create_test_contact(pool: &PgPool, user_id: UserId, first_name: &str) -> ContactDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");

    Contacts::new(&mut conn)
        .create(&ContactCreateDBRequest {
            user_id,
            first_name: first_name.to_string(),
            last_name: None,
            email: None,
            phone: None,
        })
        .await
        .expect("Failed to create test contact")
}

pub async fn create_test_address(pool: &PgPool, contact_id: ContactId) -> AddressDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");

    Addresses::new(&mut conn)
        .create(&AddressCreateDBRequest {
            contact_id,
            street: Some("Jalan Belum Ada".to_string()),
            city: Some("Jakarta".to_string()),
            province: None,
            postal_code: "12345".to_string(),
            country: "Indonesia".to_string(),
        })
        .await
        .expect("Failed to create test address")
}

/// Register through the API.
pub async fn register_user(app: &TestServer, username: &str, password: &str) {
    app.post("/api/users/register")
        .json(&json!({"username": username, "name": format!("Test {username}"), "password": password}))
        .await
        .assert_status(StatusCode::CREATED);
}

/// Log in through the API and return the bare token.
pub async fn login_user(app: &TestServer, username: &str, password: &str) -> String {
    let response = app
        .post("/api/users/login")
        .json(&json!({"username": username, "password": password}))
        .await;
    response.assert_status_ok();

    let body: WebResponse<LoginResponse> = response.json();
    body.data.token
}

/// Register and log in `username`, returning a ready `Authorization` header value.
pub async fn authenticated(app: &TestServer, username: &str) -> String {
    register_user(app, username, TEST_PASSWORD).await;
    format!("Bearer {}", login_user(app, username, TEST_PASSWORD).await)
}

/// Create a contact through the API and return its id.
pub async fn post_contact(app: &TestServer, auth: &str, payload: Value) -> ContactId {
    let response = app
        .post("/api/contacts")
        .add_header("authorization", auth.to_string())
        .json(&payload)
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: WebResponse<ContactResponse> = response.json();
    body.data.id
}
