//! API request/response models for addresses.

use crate::db::models::addresses::AddressDBResponse;
use crate::types::AddressId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddressCreate {
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub street: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub city: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub province: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 10, message = "must be between 1 and 10 characters"))]
    pub postal_code: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub country: String,
}

/// Address update. `postal_code` and `country` are always required; omitted optional fields
/// keep their stored value.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddressUpdate {
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub street: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub city: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub province: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 10, message = "must be between 1 and 10 characters"))]
    pub postal_code: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddressResponse {
    pub id: AddressId,
    pub street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: String,
    pub country: String,
}

impl From<AddressDBResponse> for AddressResponse {
    fn from(db: AddressDBResponse) -> Self {
        Self {
            id: db.id,
            street: db.street,
            city: db.city,
            province: db.province,
            postal_code: db.postal_code,
            country: db.country,
        }
    }
}
