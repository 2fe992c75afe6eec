//! Database repository for contacts.

use crate::types::{ContactId, UserId};
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::contacts::{ContactCreateDBRequest, ContactDBResponse, ContactUpdateDBRequest},
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, Postgres, QueryBuilder};
use tracing::instrument;

/// Filter for searching one user's contacts.
///
/// Text filters are substring matches; `None` means "don't filter", never "match empty".
/// The `with_*` builders drop empty strings, which is what a blank form field sends.
#[derive(Debug, Clone)]
pub struct ContactFilter {
    pub user_id: UserId,
    /// Matches first_name or last_name
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skip: i64,
    pub limit: i64,
}

impl ContactFilter {
    pub fn new(user_id: UserId, skip: i64, limit: i64) -> Self {
        Self {
            user_id,
            name: None,
            email: None,
            phone: None,
            skip,
            limit,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = non_empty(name);
        self
    }

    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = non_empty(email);
        self
    }

    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = non_empty(phone);
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Contact {
    pub id: ContactId,
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Contact> for ContactDBResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            user_id: contact.user_id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone: contact.phone,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}

/// Build a LIKE pattern matching `value` anywhere, with wildcards in the input taken literally.
fn contains_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Append the WHERE conditions shared by the page query and the count query.
fn push_filter_conditions(query: &mut QueryBuilder<'_, Postgres>, filter: &ContactFilter) {
    query.push(" WHERE user_id = ");
    query.push_bind(filter.user_id);

    if let Some(ref name) = filter.name {
        let pattern = contains_pattern(name);
        query.push(" AND (first_name LIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR last_name LIKE ");
        query.push_bind(pattern);
        query.push(")");
    }

    if let Some(ref email) = filter.email {
        query.push(" AND email LIKE ");
        query.push_bind(contains_pattern(email));
    }

    if let Some(ref phone) = filter.phone {
        query.push(" AND phone LIKE ");
        query.push_bind(contains_pattern(phone));
    }
}

pub struct Contacts<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Contacts<'c> {
    type CreateRequest = ContactCreateDBRequest;
    type UpdateRequest = ContactUpdateDBRequest;
    type Response = ContactDBResponse;
    type Id = ContactId;

    #[instrument(skip(self, request), fields(user_id = request.user_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (user_id, first_name, last_name, email, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(request.user_id)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(&request.phone)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(ContactDBResponse::from(contact))
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let contact = sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(contact.map(ContactDBResponse::from))
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(&request.phone)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(ContactDBResponse::from(contact))
    }
}

impl<'c> Contacts<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Fetch a contact only if it belongs to `user_id`.
    #[instrument(skip(self), err)]
    pub async fn get_owned(&mut self, user_id: UserId, id: ContactId) -> Result<Option<ContactDBResponse>> {
        let contact = sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(contact.map(ContactDBResponse::from))
    }

    /// One page of the user's contacts matching the filter, ordered by id.
    #[instrument(skip(self, filter), fields(user_id = filter.user_id, limit = filter.limit, skip = filter.skip), err)]
    pub async fn search(&mut self, filter: &ContactFilter) -> Result<Vec<ContactDBResponse>> {
        let mut query = QueryBuilder::new("SELECT * FROM contacts");
        push_filter_conditions(&mut query, filter);

        query.push(" ORDER BY id LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        let contacts = query.build_query_as::<Contact>().fetch_all(&mut *self.db).await?;

        Ok(contacts.into_iter().map(ContactDBResponse::from).collect())
    }

    /// Total matches for the filter, ignoring skip and limit.
    #[instrument(skip(self, filter), fields(user_id = filter.user_id), err)]
    pub async fn count(&mut self, filter: &ContactFilter) -> Result<i64> {
        let mut query = QueryBuilder::new("SELECT COUNT(*) FROM contacts");
        push_filter_conditions(&mut query, filter);

        let count: i64 = query.build_query_scalar().fetch_one(&mut *self.db).await?;

        Ok(count)
    }
}
