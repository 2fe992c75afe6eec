//! Database models for addresses.

use crate::api::models::addresses::{AddressCreate, AddressUpdate};
use crate::types::{AddressId, ContactId};
use chrono::{DateTime, Utc};

/// Database request for creating an address
#[derive(Debug, Clone)]
pub struct AddressCreateDBRequest {
    pub contact_id: ContactId,
    pub street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: String,
    pub country: String,
}

impl AddressCreateDBRequest {
    pub fn new(contact_id: ContactId, create: AddressCreate) -> Self {
        Self {
            contact_id,
            street: create.street,
            city: create.city,
            province: create.province,
            postal_code: create.postal_code,
            country: create.country,
        }
    }
}

/// Database request for updating an address. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct AddressUpdateDBRequest {
    pub street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl From<AddressUpdate> for AddressUpdateDBRequest {
    fn from(update: AddressUpdate) -> Self {
        Self {
            street: update.street,
            city: update.city,
            province: update.province,
            postal_code: Some(update.postal_code),
            country: Some(update.country),
        }
    }
}

/// Database response for an address
#[derive(Debug, Clone)]
pub struct AddressDBResponse {
    pub id: AddressId,
    pub contact_id: ContactId,
    pub street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
