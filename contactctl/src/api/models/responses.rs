//! The response envelope shared by every endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::pagination::Paging;

pub const MESSAGE_OK: &str = "OK";
pub const MESSAGE_USER_CREATED: &str = "user created";
pub const MESSAGE_AUTHENTICATED: &str = "authenticated";
pub const MESSAGE_CONTACT_CREATED: &str = "contact created";

/// `{message, data, paging?}` wrapper around a successful result.
///
/// Failures use the same `message` key but carry `error` or `errors` instead of `data`, see
/// [`crate::errors::Error`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WebResponse<T> {
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

impl<T> WebResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
            paging: None,
        }
    }

    pub fn ok(data: T) -> Self {
        Self::new(MESSAGE_OK, data)
    }

    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = Some(paging);
        self
    }
}
