use crate::{
    AppState,
    api::models::users::CurrentUser,
    auth::session,
    db::handlers::Users,
    db::errors::DbError,
    errors::{Error, Result},
    types::abbrev_token,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, instrument, trace};

/// Resolve the caller from the `Authorization` header.
///
/// Missing, blank, and unknown tokens all fail with the same `Unauthenticated` error.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let Some(token) = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(session::token_from_header)
        else {
            trace!("No usable authorization header");
            return Err(Error::Unauthenticated { message: None });
        };

        let mut conn = state.db.acquire().await.map_err(DbError::from)?;
        let user = Users::new(&mut conn).get_by_token(token).await?;

        match user {
            Some(user) => {
                debug!("Authenticated user {} via token", user.id);
                Ok(CurrentUser::from(user))
            }
            None => {
                debug!("Unknown session token {}", abbrev_token(token));
                Err(Error::Unauthenticated { message: None })
            }
        }
    }
}
