//! Database repository for addresses.

use crate::types::{AddressId, ContactId};
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::addresses::{AddressCreateDBRequest, AddressDBResponse, AddressUpdateDBRequest},
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Address {
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

impl From<Address> for AddressDBResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id,
            contact_id: address.contact_id,
            street: address.street,
            city: address.city,
            province: address.province,
            postal_code: address.postal_code,
            country: address.country,
            created_at: address.created_at,
            updated_at: address.updated_at,
        }
    }
}

pub struct Addresses<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Addresses<'c> {
    type CreateRequest = AddressCreateDBRequest;
    type UpdateRequest = AddressUpdateDBRequest;
    type Response = AddressDBResponse;
    type Id = AddressId;

    #[instrument(skip(self, request), fields(contact_id = request.contact_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let address = sqlx::query_as::<_, Address>(
            r#"
            INSERT INTO addresses (contact_id, street, city, province, postal_code, country)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(request.contact_id)
        .bind(&request.street)
        .bind(&request.city)
        .bind(&request.province)
        .bind(&request.postal_code)
        .bind(&request.country)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(AddressDBResponse::from(address))
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let address = sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(address.map(AddressDBResponse::from))
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let address = sqlx::query_as::<_, Address>(
            r#"
            UPDATE addresses SET
                street = COALESCE($2, street),
                city = COALESCE($3, city),
                province = COALESCE($4, province),
                postal_code = COALESCE($5, postal_code),
                country = COALESCE($6, country)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.street)
        .bind(&request.city)
        .bind(&request.province)
        .bind(&request.postal_code)
        .bind(&request.country)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(AddressDBResponse::from(address))
    }
}

impl<'c> Addresses<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Fetch an address only if it sits under `contact_id`.
    #[instrument(skip(self), err)]
    pub async fn get_in_contact(&mut self, contact_id: ContactId, id: AddressId) -> Result<Option<AddressDBResponse>> {
        let address = sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE id = $1 AND contact_id = $2")
            .bind(id)
            .bind(contact_id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(address.map(AddressDBResponse::from))
    }

    #[instrument(skip(self), err)]
    pub async fn list_for_contact(&mut self, contact_id: ContactId) -> Result<Vec<AddressDBResponse>> {
        let addresses = sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE contact_id = $1 ORDER BY id")
            .bind(contact_id)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(addresses.into_iter().map(AddressDBResponse::from).collect())
    }
}
