//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix session so handlers deal in domain operations: signing a
//! user in, reading the signed-in user id, signing out and checking the
//! per-session CSRF token that guards every HTML form.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use rand::RngCore;
use tracing::{debug, warn};

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const CSRF_KEY: &str = "csrf_token";

/// Form field carrying the CSRF token.
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";
/// Message returned when a form's CSRF token is missing or wrong.
pub const CSRF_FAILURE_MESSAGE: &str = "CSRF verification failed. Request aborted.";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

fn session_write_error(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to persist session: {error}"))
}

fn session_read_error(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to read session: {error}"))
}

/// Compare without short-circuiting on the first differing byte.
fn tokens_match(expected: &str, candidate: &str) -> bool {
    let (expected, candidate) = (expected.as_bytes(), candidate.as_bytes());
    if expected.len() != candidate.len() {
        return false;
    }
    expected
        .iter()
        .zip(candidate)
        .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Start an authenticated session for `user_id`.
    ///
    /// The session is renewed and the CSRF token rotated so nothing issued
    /// before login stays valid afterwards.
    pub fn sign_in(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0.remove(CSRF_KEY);
        self.0
            .insert(USER_ID_KEY, user_id.as_ref())
            .map_err(session_write_error)
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let id = self.0.get::<String>(USER_ID_KEY).map_err(session_read_error)?;
        match id {
            Some(raw) => match UserId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// End the session, discarding every stored value.
    pub fn purge(&self) {
        self.0.purge();
    }

    /// The session's CSRF token, minting one on first use.
    pub fn csrf_token(&self) -> Result<String, Error> {
        if let Some(token) = self.0.get::<String>(CSRF_KEY).map_err(session_read_error)? {
            return Ok(token);
        }
        let mut bytes = [0_u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        self.0
            .insert(CSRF_KEY, &token)
            .map_err(session_write_error)?;
        Ok(token)
    }

    /// Check a submitted CSRF token against the session's token.
    ///
    /// Fails with `403 Forbidden` when either side is missing or they differ.
    pub fn verify_csrf(&self, submitted: Option<&str>) -> Result<(), Error> {
        let expected = self.0.get::<String>(CSRF_KEY).map_err(session_read_error)?;
        match (expected, submitted) {
            (Some(expected), Some(candidate)) if tokens_match(&expected, candidate) => Ok(()),
            _ => {
                debug!("csrf token rejected");
                Err(Error::forbidden(CSRF_FAILURE_MESSAGE))
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
