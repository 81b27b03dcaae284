//! URL dispatch.
//!
//! Every page and endpoint is a named resource so links can be reversed with
//! [`HttpRequest::url_for`]. Methods a resource does not list fall through
//! to a `405` handler: an HTML error page for pages, a JSON error for
//! `/api/` endpoints.

use actix_web::{HttpRequest, HttpResponse, Resource, ResponseError, web};

use crate::domain::Error;
use crate::inbound::http::api;
use crate::inbound::http::pages::{self, PageError, accounts, music};
use crate::inbound::http::stylesheets;

/// Route paths.
pub mod paths {
    pub const INDEX: &str = "/";
    pub const LOGIN: &str = "/login/";
    pub const SIGNUP: &str = "/signup/";
    pub const LOGOUT: &str = "/logout";
    pub const PROFILE: &str = "/profile/{username}/";
    pub const UPDATE_PROFILE: &str = "/update-profile";
    pub const MUSIC: &str = "/music/";
    pub const SEARCH: &str = "/search/";
    pub const RESULT: &str = "/result/{slug}";
    pub const STYLESHEET: &str = "/static/css/{name}";
    pub const API_LOGIN: &str = "/api/login/";
    pub const API_SIGNUP: &str = "/api/signup/";
    pub const API_PROFILE: &str = "/api/profile/{username}/";
    pub const API_MUSIC: &str = "/api/music/";
    pub const API_SEARCH: &str = "/api/search/";
}

/// Route names accepted by [`HttpRequest::url_for`].
pub mod names {
    pub const INDEX: &str = "index";
    pub const LOGIN: &str = "login";
    pub const SIGNUP: &str = "signup";
    pub const LOGOUT: &str = "logout";
    pub const PROFILE: &str = "profile";
    pub const UPDATE_PROFILE: &str = "update_profile";
    pub const MUSIC: &str = "music";
    pub const SEARCH: &str = "search";
    pub const RESULT: &str = "result";
    pub const STYLESHEET: &str = "stylesheet";
    pub const API_LOGIN: &str = "api_login";
    pub const API_SIGNUP: &str = "api_signup";
    pub const API_PROFILE: &str = "api_profile";
    pub const API_MUSIC: &str = "api_music";
    pub const API_SEARCH: &str = "api_search";
}

/// Reverse a named route into a path.
pub fn path_for(req: &HttpRequest, name: &str, elements: &[&str]) -> Result<String, Error> {
    req.url_for(name, elements)
        .map(|url| url.path().to_owned())
        .map_err(|error| Error::internal(format!("cannot reverse route {name}: {error}")))
}

fn page(name: &str, path: &str) -> Resource {
    web::resource(path)
        .name(name)
        .default_service(web::to(pages::method_not_allowed))
}

fn endpoint(name: &str, path: &str) -> Resource {
    web::resource(path)
        .name(name)
        .default_service(web::to(api::method_not_allowed))
}

/// Register every page, endpoint and the stylesheet server.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(page(names::INDEX, paths::INDEX).route(web::get().to(music::index)))
        .service(
            page(names::LOGIN, paths::LOGIN)
                .route(web::get().to(accounts::login_page))
                .route(web::post().to(accounts::login_submit)),
        )
        .service(
            page(names::SIGNUP, paths::SIGNUP)
                .route(web::get().to(accounts::signup_page))
                .route(web::post().to(accounts::signup_submit)),
        )
        .service(
            page(names::LOGOUT, paths::LOGOUT)
                .route(web::get().to(accounts::logout))
                .route(web::post().to(accounts::logout_submit)),
        )
        .service(page(names::PROFILE, paths::PROFILE).route(web::get().to(accounts::profile_page)))
        .service(
            page(names::UPDATE_PROFILE, paths::UPDATE_PROFILE)
                .route(web::get().to(accounts::update_profile_page))
                .route(web::post().to(accounts::update_profile_submit)),
        )
        .service(page(names::MUSIC, paths::MUSIC).route(web::get().to(music::music_page)))
        .service(
            page(names::SEARCH, paths::SEARCH)
                .route(web::get().to(music::search_page))
                .route(web::post().to(music::search_submit)),
        )
        .service(page(names::RESULT, paths::RESULT).route(web::get().to(music::result_page)))
        .service(
            page(names::STYLESHEET, paths::STYLESHEET)
                .route(web::get().to(stylesheets::stylesheet)),
        )
        .service(
            endpoint(names::API_LOGIN, paths::API_LOGIN)
                .route(web::post().to(api::accounts::login)),
        )
        .service(
            endpoint(names::API_SIGNUP, paths::API_SIGNUP)
                .route(web::post().to(api::accounts::signup)),
        )
        .service(
            endpoint(names::API_PROFILE, paths::API_PROFILE)
                .route(web::get().to(api::accounts::profile)),
        )
        .service(
            endpoint(names::API_MUSIC, paths::API_MUSIC).route(web::get().to(api::music::music)),
        )
        .service(
            endpoint(names::API_SEARCH, paths::API_SEARCH)
                .route(web::get().to(api::music::search)),
        );
}

/// App-wide fallback for paths nothing claims.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    if req.path().starts_with("/api/") {
        Error::not_found("Not found.").error_response()
    } else {
        PageError::from(Error::not_found("Page not found")).error_response()
    }
}
