use axum::{Json, extract::State, http::StatusCode};
use tracing::info;

use crate::{
    AppState,
    api::models::{
        contacts::{ContactCreate, ContactResponse, ContactSearchQuery, ContactUpdate},
        pagination::PageRequest,
        responses::{MESSAGE_CONTACT_CREATED, WebResponse},
        users::CurrentUser,
    },
    auth::ownership::contact_must_exist,
    db::{
        errors::DbError,
        handlers::{Contacts, Repository, contacts::ContactFilter},
        models::contacts::{ContactCreateDBRequest, ContactUpdateDBRequest},
    },
    errors::Error,
    types::ContactId,
    validation::{ValidJson, ValidPath, ValidQuery},
};

/// Create a contact owned by the current user
#[utoipa::path(
    post,
    path = "/contacts",
    tag = "contacts",
    summary = "Create contact",
    request_body = ContactCreate,
    responses(
        (status = 201, description = "Contact created", body = WebResponse<ContactResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation error"),
        (status = 500, description = "Internal server error")
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id))]
pub async fn create_contact(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidJson(request): ValidJson<ContactCreate>,
) -> Result<(StatusCode, Json<WebResponse<ContactResponse>>), Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let contact = Contacts::new(&mut conn)
        .create(&ContactCreateDBRequest::new(current_user.id, request))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(WebResponse::new(MESSAGE_CONTACT_CREATED, ContactResponse::from(contact))),
    ))
}

/// Get one of the current user's contacts
#[utoipa::path(
    get,
    path = "/contacts/{contact_id}",
    tag = "contacts",
    summary = "Get contact",
    params(("contact_id" = i64, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Contact", body = WebResponse<ContactResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Contact not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id, contact_id = contact_id))]
pub async fn get_contact(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidPath(contact_id): ValidPath<ContactId>,
) -> Result<Json<WebResponse<ContactResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let contact = contact_must_exist(&mut conn, current_user.id, contact_id).await?;

    Ok(Json(WebResponse::ok(ContactResponse::from(contact))))
}

/// Update one of the current user's contacts
#[utoipa::path(
    put,
    path = "/contacts/{contact_id}",
    tag = "contacts",
    summary = "Update contact",
    params(("contact_id" = i64, Path, description = "Contact ID")),
    request_body = ContactUpdate,
    responses(
        (status = 200, description = "Updated contact", body = WebResponse<ContactResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Contact not found"),
        (status = 422, description = "Validation error"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id, contact_id = contact_id))]
pub async fn update_contact(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidPath(contact_id): ValidPath<ContactId>,
    ValidJson(request): ValidJson<ContactUpdate>,
) -> Result<Json<WebResponse<ContactResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    contact_must_exist(&mut conn, current_user.id, contact_id).await?;

    let contact = Contacts::new(&mut conn)
        .update(contact_id, &ContactUpdateDBRequest::from(request))
        .await?;

    Ok(Json(WebResponse::ok(ContactResponse::from(contact))))
}

/// Delete one of the current user's contacts, along with its addresses
#[utoipa::path(
    delete,
    path = "/contacts/{contact_id}",
    tag = "contacts",
    summary = "Delete contact",
    params(("contact_id" = i64, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Contact deleted", body = WebResponse<bool>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Contact not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id, contact_id = contact_id))]
pub async fn delete_contact(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidPath(contact_id): ValidPath<ContactId>,
) -> Result<Json<WebResponse<bool>>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let snapshot = contact_must_exist(&mut conn, current_user.id, contact_id).await?;

    Contacts::new(&mut conn).delete(contact_id).await?;

    info!(contact_id = snapshot.id, first_name = %snapshot.first_name, "Deleted contact");

    Ok(Json(WebResponse::ok(true)))
}

/// Search the current user's contacts
#[utoipa::path(
    get,
    path = "/contacts",
    tag = "contacts",
    summary = "Search contacts",
    params(ContactSearchQuery),
    responses(
        (status = 200, description = "A page of matching contacts", body = WebResponse<Vec<ContactResponse>>),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation error"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id))]
pub async fn search_contacts(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidQuery(query): ValidQuery<ContactSearchQuery>,
) -> Result<Json<WebResponse<Vec<ContactResponse>>>, Error> {
    let page = PageRequest::resolve(query.page, query.size, &state.config.search)?;

    let filter = ContactFilter::new(current_user.id, page.skip(), page.size())
        .with_name(query.name)
        .with_email(query.email)
        .with_phone(query.phone);

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Contacts::new(&mut conn);
    let contacts = repo.search(&filter).await?;
    let total = repo.count(&filter).await?;

    let data = contacts.into_iter().map(ContactResponse::from).collect();

    Ok(Json(WebResponse::ok(data).with_paging(page.paging(total))))
}

#[cfg(test)]
mod tests {
    use crate::{
        api::models::{contacts::ContactResponse, responses::WebResponse},
        test_utils::*,
    };
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_contact_minimal(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let auth = authenticated(&app, "khannedy").await;

        let response = app
            .post("/api/contacts")
            .add_header("authorization", auth)
            .json(&json!({"first_name": "Jo"}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: WebResponse<ContactResponse> = response.json();
        assert_eq!(body.message, "contact created");
        assert_eq!(body.data.first_name, "Jo");
        assert!(body.data.last_name.is_none());
        assert!(body.data.email.is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_contact_validation(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let auth = authenticated(&app, "khannedy").await;

        let response = app
            .post("/api/contacts")
            .add_header("authorization", auth)
            .json(&json!({"first_name": "", "email": "not-an-email", "phone": "0".repeat(21)}))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert!(body["errors"]["first_name"].is_array());
        assert!(body["errors"]["email"].is_array());
        assert!(body["errors"]["phone"].is_array());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_contacts_require_auth(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;

        app.post("/api/contacts")
            .json(&json!({"first_name": "Jo"}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        app.get("/api/contacts").await.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_get_update_delete_contact(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let auth = authenticated(&app, "khannedy").await;
        let contact_id = post_contact(&app, &auth, json!({"first_name": "Jo", "last_name": "Doe", "email": "jo@example.com"})).await;

        let response = app.get(&format!("/api/contacts/{contact_id}")).add_header("authorization", auth.clone()).await;
        response.assert_status_ok();
        let body: WebResponse<ContactResponse> = response.json();
        assert_eq!(body.data.last_name.as_deref(), Some("Doe"));

        // Omitted optional fields keep their values
        let response = app
            .put(&format!("/api/contacts/{contact_id}"))
            .add_header("authorization", auth.clone())
            .json(&json!({"first_name": "Joanna", "phone": "08123"}))
            .await;
        response.assert_status_ok();
        let body: WebResponse<ContactResponse> = response.json();
        assert_eq!(body.data.first_name, "Joanna");
        assert_eq!(body.data.last_name.as_deref(), Some("Doe"));
        assert_eq!(body.data.email.as_deref(), Some("jo@example.com"));
        assert_eq!(body.data.phone.as_deref(), Some("08123"));

        let response = app.delete(&format!("/api/contacts/{contact_id}")).add_header("authorization", auth.clone()).await;
        response.assert_status_ok();
        let body: WebResponse<bool> = response.json();
        assert!(body.data);

        app.get(&format!("/api/contacts/{contact_id}"))
            .add_header("authorization", auth)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_other_users_contact_is_not_found(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let owner = authenticated(&app, "owner").await;
        let stranger = authenticated(&app, "stranger").await;
        let contact_id = post_contact(&app, &owner, json!({"first_name": "Jo"})).await;

        let missing: Value = app
            .get("/api/contacts/999999")
            .add_header("authorization", stranger.clone())
            .await
            .json();

        let get = app.get(&format!("/api/contacts/{contact_id}")).add_header("authorization", stranger.clone()).await;
        get.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(get.json::<Value>(), missing);
        assert_eq!(missing["error"], "Contact not found");

        app.put(&format!("/api/contacts/{contact_id}"))
            .add_header("authorization", stranger.clone())
            .json(&json!({"first_name": "Hijacked"}))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        app.delete(&format!("/api/contacts/{contact_id}"))
            .add_header("authorization", stranger.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);

        // Owner's contact is untouched
        let response = app.get(&format!("/api/contacts/{contact_id}")).add_header("authorization", owner).await;
        response.assert_status_ok();
        let body: WebResponse<ContactResponse> = response.json();
        assert_eq!(body.data.first_name, "Jo");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_non_numeric_contact_id(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let auth = authenticated(&app, "khannedy").await;

        let response = app.get("/api/contacts/abc").add_header("authorization", auth).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Request Error");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_search_pagination(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let auth = authenticated(&app, "khannedy").await;

        for i in 0..25 {
            post_contact(&app, &auth, json!({"first_name": format!("Contact {i}")})).await;
        }

        let response = app.get("/api/contacts?size=10&page=3").add_header("authorization", auth.clone()).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 5);
        assert_eq!(body["paging"], json!({"current_page": 3, "pages": 3, "size": 10}));

        // Past the end: empty page, real totals
        let response = app.get("/api/contacts?size=10&page=4").add_header("authorization", auth.clone()).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert!(body["data"].as_array().unwrap().is_empty());
        assert_eq!(body["paging"], json!({"current_page": 4, "pages": 3, "size": 10}));

        // Defaults
        let response = app.get("/api/contacts").add_header("authorization", auth).await;
        let body: Value = response.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 10);
        assert_eq!(body["paging"], json!({"current_page": 1, "pages": 3, "size": 10}));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_search_filters(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let auth = authenticated(&app, "khannedy").await;
        let other = authenticated(&app, "other").await;

        post_contact(&app, &auth, json!({"first_name": "John", "last_name": "Smith", "email": "john@work.com", "phone": "0811"})).await;
        post_contact(&app, &auth, json!({"first_name": "Anna", "last_name": "Johnson", "email": "anna@home.com", "phone": "0822"})).await;
        post_contact(&app, &other, json!({"first_name": "John", "email": "john@work.com"})).await;

        let response = app.get("/api/contacts?name=John").add_header("authorization", auth.clone()).await;
        let body: Value = response.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["paging"]["pages"], 1);

        let response = app
            .get("/api/contacts?name=John&email=work")
            .add_header("authorization", auth.clone())
            .await;
        let body: Value = response.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["first_name"], "John");

        let response = app.get("/api/contacts?phone=0822").add_header("authorization", auth.clone()).await;
        let body: Value = response.json();
        assert_eq!(body["data"][0]["first_name"], "Anna");

        let response = app.get("/api/contacts?name=Nobody").add_header("authorization", auth).await;
        let body: Value = response.json();
        assert!(body["data"].as_array().unwrap().is_empty());
        assert_eq!(body["paging"]["pages"], 0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_search_blank_filters_match_everything(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let auth = authenticated(&app, "khannedy").await;

        post_contact(&app, &auth, json!({"first_name": "Bare"})).await;
        post_contact(&app, &auth, json!({"first_name": "Full", "email": "a@b.com", "phone": "0811"})).await;

        for query in ["email=", "phone=", "name=&email=&phone="] {
            let response = app
                .get(&format!("/api/contacts?{query}"))
                .add_header("authorization", auth.clone())
                .await;
            response.assert_status_ok();
            let body: Value = response.json();
            assert_eq!(body["data"].as_array().unwrap().len(), 2, "query {query}");
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_search_rejects_bad_paging(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let auth = authenticated(&app, "khannedy").await;

        for query in ["page=0", "size=0", "size=101", "page=abc"] {
            let response = app
                .get(&format!("/api/contacts?{query}"))
                .add_header("authorization", auth.clone())
                .await;
            response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        }
    }
}
