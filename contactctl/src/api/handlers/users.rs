use axum::{Json, extract::State, http::StatusCode};
use tracing::{info, warn};

use crate::{
    AppState,
    api::models::{
        responses::{MESSAGE_AUTHENTICATED, MESSAGE_USER_CREATED, WebResponse},
        users::{CurrentUser, LoginRequest, LoginResponse, RegisterRequest, UserResponse, UserUpdate},
    },
    auth::{password, session},
    db::{
        errors::DbError,
        handlers::{Repository, Users},
        models::users::{UserCreateDBRequest, UserUpdateDBRequest},
    },
    errors::{Error, USERNAME_UNIQUE_CONSTRAINT},
    validation::ValidJson,
};

const USERNAME_TAKEN: &str = "Username already exists";
const BAD_CREDENTIALS: &str = "Username or password is incorrect";

fn username_taken() -> Error {
    Error::Conflict {
        message: USERNAME_TAKEN.to_string(),
    }
}

fn bad_credentials() -> Error {
    Error::Unauthenticated {
        message: Some(BAD_CREDENTIALS.to_string()),
    }
}

/// Register a new user account
#[utoipa::path(
    post,
    path = "/users/register",
    tag = "users",
    summary = "Register user",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = WebResponse<UserResponse>),
        (status = 400, description = "Username already exists"),
        (status = 422, description = "Validation error"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all, fields(username = %request.username))]
pub async fn register(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<WebResponse<UserResponse>>), Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;

    if Users::new(&mut conn).count_by_username(&request.username).await? > 0 {
        return Err(username_taken());
    }

    let password_hash = password::hash_password(request.password, state.config.auth.password_hashing).await?;

    let user = Users::new(&mut conn)
        .create(&UserCreateDBRequest {
            username: request.username,
            name: request.name,
            password_hash,
        })
        .await
        .map_err(|e| {
            // A concurrent registration can slip past the count check
            if e.is_unique_violation_on(USERNAME_UNIQUE_CONSTRAINT) {
                username_taken()
            } else {
                Error::Database(e)
            }
        })?;

    info!(user_id = user.id, "Registered user");

    Ok((
        StatusCode::CREATED,
        Json(WebResponse::new(MESSAGE_USER_CREATED, UserResponse::from(user))),
    ))
}

/// Log in with username and password, issuing a fresh session token
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "users",
    summary = "Login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = WebResponse<LoginResponse>),
        (status = 401, description = "Username or password is incorrect"),
        (status = 422, description = "Validation error"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all, fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<Json<WebResponse<LoginResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;

    // Unknown user and wrong password must be indistinguishable
    let user = Users::new(&mut conn)
        .get_by_username(&request.username)
        .await?
        .ok_or_else(bad_credentials)?;

    if !password::verify_password(request.password, user.password_hash.clone()).await? {
        return Err(bad_credentials());
    }

    let token = session::generate_session_token();
    Users::new(&mut conn).set_token(user.id, Some(&token)).await?;

    info!(user_id = user.id, "User logged in");

    Ok(Json(WebResponse::new(MESSAGE_AUTHENTICATED, LoginResponse::new(user, token))))
}

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/users/current",
    tag = "users",
    summary = "Get current user",
    responses(
        (status = 200, description = "Current user", body = WebResponse<UserResponse>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id))]
pub async fn get_current_user(current_user: CurrentUser) -> Result<Json<WebResponse<UserResponse>>, Error> {
    Ok(Json(WebResponse::ok(UserResponse::from(current_user))))
}

/// Update the current user's name and/or password
#[utoipa::path(
    patch,
    path = "/users/current",
    tag = "users",
    summary = "Update current user",
    request_body = UserUpdate,
    responses(
        (status = 200, description = "Updated user", body = WebResponse<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation error"),
        (status = 500, description = "Internal server error")
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id))]
pub async fn update_current_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidJson(request): ValidJson<UserUpdate>,
) -> Result<Json<WebResponse<UserResponse>>, Error> {
    let password_hash = match request.password {
        Some(password) => Some(password::hash_password(password, state.config.auth.password_hashing).await?),
        None => None,
    };

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let user = Users::new(&mut conn)
        .update(
            current_user.id,
            &UserUpdateDBRequest {
                name: request.name,
                password_hash,
            },
        )
        .await?;

    Ok(Json(WebResponse::ok(UserResponse::from(user))))
}

/// Log out, invalidating the current session token
///
/// Always answers 200; `data` is `false` when the token could not be cleared.
#[utoipa::path(
    delete,
    path = "/users/logout",
    tag = "users",
    summary = "Logout",
    responses(
        (status = 200, description = "Whether the session was cleared", body = WebResponse<bool>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id))]
pub async fn logout(State(state): State<AppState>, current_user: CurrentUser) -> Json<WebResponse<bool>> {
    let cleared = match state.db.acquire().await {
        Ok(mut conn) => Users::new(&mut conn).set_token(current_user.id, None).await.map_err(Error::from),
        Err(e) => Err(Error::Database(DbError::from(e))),
    };

    let logged_out = match cleared {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Failed to clear session token");
            false
        }
    };

    Json(WebResponse::ok(logged_out))
}

#[cfg(test)]
mod tests {
    use crate::{
        api::models::{responses::WebResponse, users::{LoginResponse, UserResponse}},
        test_utils::*,
    };
    use axum::{body::Bytes, http::StatusCode};
    use serde_json::{Value, json};
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_register_creates_user(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;

        let response = app
            .post("/api/users/register")
            .json(&json!({"username": "khannedy", "name": "Eko", "password": "rahasia"}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: WebResponse<UserResponse> = response.json();
        assert_eq!(body.message, "user created");
        assert_eq!(body.data.username, "khannedy");
        assert_eq!(body.data.name, "Eko");

        // No password or token leaks into the response
        let raw: Value = response.json();
        assert!(raw["data"].get("password").is_none());
        assert!(raw["data"].get("token").is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_register_duplicate_username(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let payload = json!({"username": "khannedy", "name": "Eko", "password": "rahasia"});

        app.post("/api/users/register").json(&payload).await.assert_status(StatusCode::CREATED);

        let response = app.post("/api/users/register").json(&payload).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Request Error");
        assert_eq!(body["error"], "Username already exists");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = 'khannedy'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_register_validation_errors(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;

        let response = app
            .post("/api/users/register")
            .json(&json!({"username": "", "password": ""}))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(body["message"], "Validation error");
        assert!(body["errors"]["username"].is_array());
        assert!(body["errors"]["name"].is_array());
        assert!(body["errors"]["password"].is_array());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_register_malformed_json(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;

        let response = app
            .post("/api/users/register")
            .bytes(Bytes::from_static(b"{not json"))
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert!(body["errors"]["body"].is_array());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_login_issues_fresh_token_each_time(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        register_user(&app, "khannedy", "rahasia").await;

        let first = login_user(&app, "khannedy", "rahasia").await;
        let second = login_user(&app, "khannedy", "rahasia").await;

        assert_ne!(first, second);

        // Only the latest token is valid
        app.get("/api/users/current")
            .add_header("authorization", format!("Bearer {first}"))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        app.get("/api/users/current")
            .add_header("authorization", format!("Bearer {second}"))
            .await
            .assert_status_ok();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_login_response_shape(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        register_user(&app, "khannedy", "rahasia").await;

        let response = app
            .post("/api/users/login")
            .json(&json!({"username": "khannedy", "password": "rahasia"}))
            .await;

        response.assert_status_ok();
        let body: WebResponse<LoginResponse> = response.json();
        assert_eq!(body.message, "authenticated");
        assert_eq!(body.data.username, "khannedy");
        assert_eq!(body.data.token.len(), 43);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_login_failures_are_indistinguishable(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        register_user(&app, "khannedy", "rahasia").await;

        let wrong_password = app
            .post("/api/users/login")
            .json(&json!({"username": "khannedy", "password": "salah"}))
            .await;
        let unknown_user = app
            .post("/api/users/login")
            .json(&json!({"username": "nobody", "password": "rahasia"}))
            .await;

        wrong_password.assert_status(StatusCode::UNAUTHORIZED);
        unknown_user.assert_status(StatusCode::UNAUTHORIZED);

        let wrong_password: Value = wrong_password.json();
        let unknown_user: Value = unknown_user.json();
        assert_eq!(wrong_password, unknown_user);
        assert_eq!(wrong_password["error"], "Username or password is incorrect");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_current_user_requires_token(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;

        let response = app.get("/api/users/current").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["error"], "Unauthorized");

        app.get("/api/users/current")
            .add_header("authorization", "Bearer not-a-real-token")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_bare_token_accepted(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        register_user(&app, "khannedy", "rahasia").await;
        let token = login_user(&app, "khannedy", "rahasia").await;

        let response = app.get("/api/users/current").add_header("authorization", token).await;

        response.assert_status_ok();
        let body: WebResponse<UserResponse> = response.json();
        assert_eq!(body.data.username, "khannedy");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_name_keeps_password(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        register_user(&app, "khannedy", "rahasia").await;
        let token = login_user(&app, "khannedy", "rahasia").await;

        let response = app
            .patch("/api/users/current")
            .add_header("authorization", format!("Bearer {token}"))
            .json(&json!({"name": "Eko Kurniawan"}))
            .await;

        response.assert_status_ok();
        let body: WebResponse<UserResponse> = response.json();
        assert_eq!(body.message, "OK");
        assert_eq!(body.data.name, "Eko Kurniawan");

        // Old password still works
        login_user(&app, "khannedy", "rahasia").await;
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_password(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        register_user(&app, "khannedy", "rahasia").await;
        let token = login_user(&app, "khannedy", "rahasia").await;

        app.patch("/api/users/current")
            .add_header("authorization", format!("Bearer {token}"))
            .json(&json!({"password": "baru"}))
            .await
            .assert_status_ok();

        app.post("/api/users/login")
            .json(&json!({"username": "khannedy", "password": "rahasia"}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        login_user(&app, "khannedy", "baru").await;
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_rejects_empty_name(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        register_user(&app, "khannedy", "rahasia").await;
        let token = login_user(&app, "khannedy", "rahasia").await;

        let response = app
            .patch("/api/users/current")
            .add_header("authorization", format!("Bearer {token}"))
            .json(&json!({"name": ""}))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_session_lifecycle(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;

        app.post("/api/users/register")
            .json(&json!({"username": "khannedy", "name": "Eko", "password": "rahasia"}))
            .await
            .assert_status(StatusCode::CREATED);

        let token = login_user(&app, "khannedy", "rahasia").await;
        let auth = format!("Bearer {token}");

        app.get("/api/users/current").add_header("authorization", auth.clone()).await.assert_status_ok();

        let response = app.delete("/api/users/logout").add_header("authorization", auth.clone()).await;
        response.assert_status_ok();
        let body: WebResponse<bool> = response.json();
        assert!(body.data);

        app.get("/api/users/current")
            .add_header("authorization", auth)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
