//! Address endpoints, nested under a contact.
//!
//! Every handler gates on the contact first, so an address under somebody else's contact is
//! reported as a missing contact before the address itself is looked at.

use axum::{Json, extract::State, http::StatusCode};
use tracing::info;

use crate::{
    AppState,
    api::models::{
        addresses::{AddressCreate, AddressResponse, AddressUpdate},
        responses::{MESSAGE_OK, WebResponse},
        users::CurrentUser,
    },
    auth::ownership::{address_must_exist, contact_must_exist},
    db::{
        errors::DbError,
        handlers::{Addresses, Repository},
        models::addresses::{AddressCreateDBRequest, AddressUpdateDBRequest},
    },
    errors::Error,
    types::{AddressId, ContactId},
    validation::{ValidJson, ValidPath},
};

#[utoipa::path(
    post,
    path = "/contacts/{contact_id}/addresses",
    tag = "addresses",
    summary = "Create address",
    params(("contact_id" = i64, Path, description = "Contact ID")),
    request_body = AddressCreate,
    responses(
        (status = 201, description = "Address created", body = WebResponse<AddressResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Contact not found"),
        (status = 422, description = "Validation error"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id, contact_id = contact_id))]
pub async fn create_address(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidPath(contact_id): ValidPath<ContactId>,
    ValidJson(request): ValidJson<AddressCreate>,
) -> Result<(StatusCode, Json<WebResponse<AddressResponse>>), Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    contact_must_exist(&mut conn, current_user.id, contact_id).await?;

    let address = Addresses::new(&mut conn)
        .create(&AddressCreateDBRequest::new(contact_id, request))
        .await?;

    Ok((StatusCode::CREATED, Json(WebResponse::new(MESSAGE_OK, AddressResponse::from(address)))))
}

#[utoipa::path(
    get,
    path = "/contacts/{contact_id}/addresses/{address_id}",
    tag = "addresses",
    summary = "Get address",
    params(
        ("contact_id" = i64, Path, description = "Contact ID"),
        ("address_id" = i64, Path, description = "Address ID"),
    ),
    responses(
        (status = 200, description = "Address", body = WebResponse<AddressResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Contact or address not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id, contact_id = contact_id, address_id = address_id))]
pub async fn get_address(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidPath((contact_id, address_id)): ValidPath<(ContactId, AddressId)>,
) -> Result<Json<WebResponse<AddressResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    contact_must_exist(&mut conn, current_user.id, contact_id).await?;
    let address = address_must_exist(&mut conn, contact_id, address_id).await?;

    Ok(Json(WebResponse::ok(AddressResponse::from(address))))
}

#[utoipa::path(
    put,
    path = "/contacts/{contact_id}/addresses/{address_id}",
    tag = "addresses",
    summary = "Update address",
    params(
        ("contact_id" = i64, Path, description = "Contact ID"),
        ("address_id" = i64, Path, description = "Address ID"),
    ),
    request_body = AddressUpdate,
    responses(
        (status = 200, description = "Updated address", body = WebResponse<AddressResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Contact or address not found"),
        (status = 422, description = "Validation error"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id, contact_id = contact_id, address_id = address_id))]
pub async fn update_address(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidPath((contact_id, address_id)): ValidPath<(ContactId, AddressId)>,
    ValidJson(request): ValidJson<AddressUpdate>,
) -> Result<Json<WebResponse<AddressResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    contact_must_exist(&mut conn, current_user.id, contact_id).await?;
    address_must_exist(&mut conn, contact_id, address_id).await?;

    let address = Addresses::new(&mut conn)
        .update(address_id, &AddressUpdateDBRequest::from(request))
        .await?;

    Ok(Json(WebResponse::ok(AddressResponse::from(address))))
}

#[utoipa::path(
    delete,
    path = "/contacts/{contact_id}/addresses/{address_id}",
    tag = "addresses",
    summary = "Delete address",
    params(
        ("contact_id" = i64, Path, description = "Contact ID"),
        ("address_id" = i64, Path, description = "Address ID"),
    ),
    responses(
        (status = 200, description = "Address deleted", body = WebResponse<bool>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Contact or address not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id, contact_id = contact_id, address_id = address_id))]
pub async fn delete_address(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidPath((contact_id, address_id)): ValidPath<(ContactId, AddressId)>,
) -> Result<Json<WebResponse<bool>>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    contact_must_exist(&mut conn, current_user.id, contact_id).await?;
    address_must_exist(&mut conn, contact_id, address_id).await?;

    Addresses::new(&mut conn).delete(address_id).await?;

    info!(contact_id, address_id, "Deleted address");

    Ok(Json(WebResponse::ok(true)))
}

#[utoipa::path(
    get,
    path = "/contacts/{contact_id}/addresses",
    tag = "addresses",
    summary = "List addresses",
    params(("contact_id" = i64, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "All addresses of the contact", body = WebResponse<Vec<AddressResponse>>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Contact not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id, contact_id = contact_id))]
pub async fn list_addresses(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidPath(contact_id): ValidPath<ContactId>,
) -> Result<Json<WebResponse<Vec<AddressResponse>>>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    contact_must_exist(&mut conn, current_user.id, contact_id).await?;

    let addresses = Addresses::new(&mut conn).list_for_contact(contact_id).await?;

    Ok(Json(WebResponse::ok(addresses.into_iter().map(AddressResponse::from).collect())))
}
