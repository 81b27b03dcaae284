//! Account endpoints: login, signup and profile lookup.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, NewAccount, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{login_validation_error, signup_rejection_error};

/// Message for profile lookups without a session.
pub const NOT_AUTHENTICATED_MESSAGE: &str = "Authentication credentials were not provided.";

/// Login request body, accepted as JSON or as a urlencoded form.
///
/// Example JSON:
/// `{"username":"ada","password":"correct horse"}`
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Signup request body, accepted as JSON or as a urlencoded form.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

/// Echo of the account a request acted on.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    #[schema(example = "ada")]
    pub username: String,
}

impl From<&User> for AccountResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username().to_string(),
        }
    }
}

/// Public profile fields.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "Counting machines and tracks.")]
    pub bio: String,
}

/// JSON or urlencoded body. Urlencoded posts carry no CSRF token and rely on
/// the session cookie's `SameSite=Lax` policy against cross-site submission.
type Payload<T> = web::Either<web::Json<T>, web::Form<T>>;

fn into_inner<T>(payload: Payload<T>) -> T {
    match payload {
        web::Either::Left(json) => json.into_inner(),
        web::Either::Right(form) => form.into_inner(),
    }
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AccountResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Missing fields or invalid credentials", body = Error),
        (status = 405, description = "Method not allowed", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: Payload<LoginRequest>,
) -> ApiResult<web::Json<AccountResponse>> {
    let LoginRequest { username, password } = into_inner(payload);
    let credentials = LoginCredentials::validate_all(&username, &password)
        .map_err(|errors| login_validation_error(&errors))?;
    let user = state.login.authenticate(&credentials).await?;
    session.sign_in(user.id())?;
    info!(username = %user.username(), "user signed in via api");
    Ok(web::Json(AccountResponse::from(&user)))
}

/// Create an account.
///
/// The new account is not signed in; clients follow up with a login.
#[utoipa::path(
    post,
    path = "/api/signup/",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid fields or duplicate username", body = Error),
        (status = 405, description = "Method not allowed", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "signup",
    security([])
)]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: Payload<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let SignupRequest {
        username,
        password1,
        password2,
    } = into_inner(payload);
    let account = NewAccount::try_from_parts(&username, &password1, &password2)
        .map_err(|rejection| signup_rejection_error(&rejection))?;
    let user = state.signup.register(&account).await?;
    info!(username = %user.username(), "account created via api");
    Ok(HttpResponse::Created().json(AccountResponse::from(&user)))
}

/// Fetch a profile. Requires a session.
#[utoipa::path(
    get,
    path = "/api/profile/{username}/",
    params(("username" = String, Path, description = "Account username")),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 403, description = "No session", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "profile"
)]
pub async fn profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    username: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let signed_in = match session.user_id()? {
        Some(id) => state.profiles.user_by_id(&id).await?.is_some(),
        None => false,
    };
    if !signed_in {
        return Err(Error::forbidden(NOT_AUTHENTICATED_MESSAGE));
    }

    let user = state.profiles.profile(&username).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(ProfileResponse {
            username: user.username().to_string(),
            bio: user.bio().as_ref().to_owned(),
        }))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
