//! Ownership gates.
//!
//! Every contact and address operation passes through these before touching the store: a
//! contact is visible only to its owner, and an address only through the contact it belongs to.
//! A record that exists but belongs to someone else is reported exactly like a missing one.

use sqlx::PgConnection;
use tracing::instrument;

use crate::{
    db::{
        handlers::{Addresses, Contacts},
        models::{addresses::AddressDBResponse, contacts::ContactDBResponse},
    },
    errors::{Error, Result},
    types::{AddressId, ContactId, UserId},
};

/// The contact `contact_id`, provided `user_id` owns it.
#[instrument(skip(conn), err)]
pub async fn contact_must_exist(conn: &mut PgConnection, user_id: UserId, contact_id: ContactId) -> Result<ContactDBResponse> {
    Contacts::new(conn)
        .get_owned(user_id, contact_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Contact".to_string(),
            id: contact_id.to_string(),
        })
}

/// The address `address_id`, provided it belongs to `contact_id`.
///
/// Callers must have passed [`contact_must_exist`] for `contact_id` first.
#[instrument(skip(conn), err)]
pub async fn address_must_exist(conn: &mut PgConnection, contact_id: ContactId, address_id: AddressId) -> Result<AddressDBResponse> {
    Addresses::new(conn)
        .get_in_contact(contact_id, address_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Address".to_string(),
            id: address_id.to_string(),
        })
}
