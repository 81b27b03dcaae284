//! Form payloads posted by the HTML pages and the error bag they render.
//!
//! Every field defaults to empty so a partially filled form still
//! deserialises; validation happens in the domain constructors and surfaces
//! through [`FormErrors`].

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::{Error, ErrorCode};

/// `POST /login/` body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(rename = "csrfmiddlewaretoken", default)]
    pub csrf_token: Option<String>,
}

/// `POST /signup/` body.
#[derive(Debug, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
    #[serde(rename = "csrfmiddlewaretoken", default)]
    pub csrf_token: Option<String>,
}

/// `POST /search/` body.
#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub query: String,
    #[serde(rename = "csrfmiddlewaretoken", default)]
    pub csrf_token: Option<String>,
}

/// `POST /update-profile` body.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub bio: String,
    #[serde(rename = "csrfmiddlewaretoken", default)]
    pub csrf_token: Option<String>,
}

/// Bodies that only carry the CSRF token, such as `POST /logout`.
#[derive(Debug, Default, Deserialize)]
pub struct CsrfForm {
    #[serde(rename = "csrfmiddlewaretoken", default)]
    pub csrf_token: Option<String>,
}

/// `?next=` on the login page.
#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    #[serde(default)]
    pub next: Option<String>,
}

/// `?query=` on the search page.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: Option<String>,
}

/// Inline errors keyed by form field, plus errors that belong to no field.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<String, Vec<String>>,
    non_field: Vec<String>,
}

impl FormErrors {
    /// Convert a validation failure into inline errors.
    ///
    /// Anything other than `invalid_request` is not a form problem and is
    /// handed back so the caller can render an error page instead.
    pub fn from_error(error: Error) -> Result<Self, Error> {
        if error.code() != ErrorCode::InvalidRequest {
            return Err(error);
        }
        let fields = super::validation::field_messages(&error);
        let non_field = if fields.is_empty() {
            vec![error.message().to_owned()]
        } else {
            Vec::new()
        };
        Ok(Self { fields, non_field })
    }

    /// Messages for `name`, empty when the field is valid.
    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether `name` has at least one message.
    pub fn has(&self, name: &str) -> bool {
        !self.field(name).is_empty()
    }

    /// Messages not tied to a field, such as rejected credentials.
    pub fn non_field(&self) -> &[String] {
        &self.non_field
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }
}

/// Local redirect target from `next`, if it is safe to follow.
///
/// Only absolute paths on this host are accepted: `//host` and backslash
/// tricks that browsers treat as scheme-relative are refused.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    let next = next?.trim();
    let local = next.starts_with('/')
        && !next.starts_with("//")
        && !next.contains('\\')
        && !next.chars().any(char::is_control);
    local.then_some(next)
}
