//! Request validation.
//!
//! Request models derive [`validator::Validate`]. The extractors here run that validation after
//! deserializing, and turn both deserialization and validation failures into
//! [`Error::Validation`] so every bad payload gets the same field-keyed 422 body.
//!
//! ```ignore
//! async fn create(ValidJson(request): ValidJson<ContactCreate>) -> Result<...> { ... }
//! ```

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Query, Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::errors::Error;

/// Field name used when a failure can't be attributed to a single field.
const BODY_FIELD: &str = "body";
const QUERY_FIELD: &str = "query";

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        let errors: BTreeMap<String, Vec<String>> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Validation failed for field '{field}'"))
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        Error::Validation { errors }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::invalid_field(BODY_FIELD, rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::invalid_field(QUERY_FIELD, rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::BadRequest {
            message: rejection.body_text(),
        }
    }
}

/// Run the derived validation rules on a value.
pub fn validate<T: Validate>(value: &T) -> Result<(), Error> {
    value.validate().map_err(Error::from)
}

/// JSON body that has passed its validation rules.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        validate(&value)?;
        Ok(Self(value))
    }
}

/// Query string that has passed its validation rules.
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        validate(&value)?;
        Ok(Self(value))
    }
}

/// Path parameters whose parse failures render through [`Error`] instead of plain text.
#[derive(Debug)]
pub struct ValidPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}
