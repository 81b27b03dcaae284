//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] describes the JSON mirror under `/api/` and the health probes.
//! HTML pages are not part of the document. It registers:
//!
//! - **Paths**: the account and music endpoints plus both probes
//! - **Schemas**: request and response bodies, and the shared [`Error`]
//!   payload returned by every failing endpoint
//! - **Security**: session cookie authentication scheme
//!
//! The generated specification is served to Swagger UI in debug builds.

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::api::accounts::{
    AccountResponse, LoginRequest, ProfileResponse, SignupRequest,
};
use crate::inbound::http::api::music::{MusicResponse, SearchHit, SearchResponse, TrackResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/login/ or the login page.",
            ))),
        );
    }
}

/// OpenAPI document for the JSON API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Tracklist API",
        description = "JSON mirror of the account, music and search pages, plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::api::accounts::login,
        crate::inbound::http::api::accounts::signup,
        crate::inbound::http::api::accounts::profile,
        crate::inbound::http::api::music::music,
        crate::inbound::http::api::music::search,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginRequest,
        SignupRequest,
        AccountResponse,
        ProfileResponse,
        TrackResponse,
        MusicResponse,
        SearchHit,
        SearchResponse
    )),
    tags(
        (name = "accounts", description = "Login, signup and profile lookup"),
        (name = "music", description = "Catalogue listing and search"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
