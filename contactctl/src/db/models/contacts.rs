//! Database models for contacts.

use crate::api::models::contacts::{ContactCreate, ContactUpdate};
use crate::types::{ContactId, UserId};
use chrono::{DateTime, Utc};

/// Database request for creating a contact
#[derive(Debug, Clone)]
pub struct ContactCreateDBRequest {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactCreateDBRequest {
    pub fn new(user_id: UserId, create: ContactCreate) -> Self {
        Self {
            user_id,
            first_name: create.first_name,
            last_name: create.last_name,
            email: create.email,
            phone: create.phone,
        }
    }
}

/// Database request for updating a contact. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct ContactUpdateDBRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<ContactUpdate> for ContactUpdateDBRequest {
    fn from(update: ContactUpdate) -> Self {
        Self {
            first_name: Some(update.first_name),
            last_name: update.last_name,
            email: update.email,
            phone: update.phone,
        }
    }
}

/// Database response for a contact
#[derive(Debug, Clone)]
pub struct ContactDBResponse {
    pub id: ContactId,
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
