//! OpenAPI document for the `/api` surface, served as JSON at `/api-docs/openapi.json` and
//! rendered at `/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api;

/// Session token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "BearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("Session token")
                        .description(Some(
                            "Token returned by `POST /api/users/login`. Send it in the `Authorization` header, \
                            with or without the `Bearer ` prefix:\n\n\
                            ```\nAuthorization: Bearer YOUR_TOKEN\n```\n\n\
                            Logging in again or logging out invalidates the previous token.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    servers(
        (url = "/api", description = "Contacts API")
    ),
    modifiers(&SecurityAddon),
    paths(
        api::handlers::users::register,
        api::handlers::users::login,
        api::handlers::users::get_current_user,
        api::handlers::users::update_current_user,
        api::handlers::users::logout,
        api::handlers::contacts::create_contact,
        api::handlers::contacts::search_contacts,
        api::handlers::contacts::get_contact,
        api::handlers::contacts::update_contact,
        api::handlers::contacts::delete_contact,
        api::handlers::addresses::create_address,
        api::handlers::addresses::list_addresses,
        api::handlers::addresses::get_address,
        api::handlers::addresses::update_address,
        api::handlers::addresses::delete_address,
    ),
    components(schemas(
        api::models::users::RegisterRequest,
        api::models::users::LoginRequest,
        api::models::users::UserUpdate,
        api::models::users::UserResponse,
        api::models::users::LoginResponse,
        api::models::contacts::ContactCreate,
        api::models::contacts::ContactUpdate,
        api::models::contacts::ContactResponse,
        api::models::addresses::AddressCreate,
        api::models::addresses::AddressUpdate,
        api::models::addresses::AddressResponse,
        api::models::pagination::Paging,
    )),
    tags(
        (name = "users", description = "Registration, login and the current user's profile"),
        (name = "contacts", description = "The current user's contacts"),
        (name = "addresses", description = "Addresses of a contact"),
    ),
    info(
        title = "contactctl",
        description = "Per-user address book. Every response is wrapped in `{message, data}`; search results add `paging`.",
    ),
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/users/register",
            "/users/login",
            "/users/current",
            "/users/logout",
            "/contacts",
            "/contacts/{contact_id}",
            "/contacts/{contact_id}/addresses",
            "/contacts/{contact_id}/addresses/{address_id}",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerAuth"));
    }
}
