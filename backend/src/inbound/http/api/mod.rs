//! JSON mirrors of the HTML pages.
//!
//! ```text
//! POST /api/login/              {"username":"ada","password":"…"}
//! POST /api/signup/             {"username":"ada","password1":"…","password2":"…"}
//! GET  /api/profile/{username}/
//! GET  /api/music/
//! GET  /api/search/?query=blue
//! ```
//!
//! Errors use the shared [`crate::domain::Error`] body.

use actix_web::{HttpRequest, HttpResponse};

use crate::domain::Error;
use crate::inbound::http::ApiResult;

pub mod accounts;
pub mod music;

/// Fallback for methods an endpoint does not accept.
pub async fn method_not_allowed(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(Error::method_not_allowed(format!(
        "Method \"{}\" not allowed.",
        req.method()
    )))
}
