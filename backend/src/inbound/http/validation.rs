//! Shared validation helpers for inbound HTTP adapters.
//!
//! Domain validation failures become `invalid_request` errors whose details
//! carry the offending field and a stable code, plus an `errors` map of
//! field name to messages so forms can show every inline error at once:
//!
//! ```json
//! {"field":"password2","code":"password_mismatch",
//!  "errors":{"password2":["The two password fields didn’t match."]}}
//! ```

use std::collections::BTreeMap;
use std::fmt;

use actix_web::web;
use serde_json::{Value, json};
use tracing::debug;

use crate::domain::{
    Error, LoginValidationError, REQUIRED_FIELD_MESSAGE, SearchTermError, SignupRejection,
    UserValidationError,
};

/// Message for bodies or query strings that fail to deserialise.
pub const INVALID_PAYLOAD_MESSAGE: &str = "Invalid request payload.";

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const USERNAME: FieldName = FieldName::new("username");
pub(crate) const PASSWORD: FieldName = FieldName::new("password");
pub(crate) const QUERY: FieldName = FieldName::new("query");
pub(crate) const BIO: FieldName = FieldName::new("bio");

/// Collects per-field messages before turning them into one [`Error`].
#[derive(Debug, Default)]
struct ValidationErrors {
    first: Option<(String, &'static str, String)>,
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    fn push(&mut self, field: &str, code: &'static str, message: impl Into<String>) {
        let message = message.into();
        if self.first.is_none() {
            self.first = Some((field.to_owned(), code, message.clone()));
        }
        self.fields.entry(field.to_owned()).or_default().push(message);
    }

    fn into_error(self) -> Error {
        let Some((field, code, message)) = self.first else {
            return Error::invalid_request(REQUIRED_FIELD_MESSAGE);
        };
        Error::invalid_request(message).with_details(json!({
            "field": field,
            "code": code,
            "errors": self.fields,
        }))
    }
}

/// Build an error for a single invalid field.
pub(crate) fn field_error(field: FieldName, code: &'static str, message: impl Into<String>) -> Error {
    let mut errors = ValidationErrors::default();
    errors.push(field.as_str(), code, message);
    errors.into_error()
}

/// Map missing login fields to one error naming every field.
pub(crate) fn login_validation_error(errors: &[LoginValidationError]) -> Error {
    let mut collected = ValidationErrors::default();
    for error in errors {
        collected.push(error.field(), "required", error.to_string());
    }
    collected.into_error()
}

/// Map a rejected signup to one error naming every field.
pub(crate) fn signup_rejection_error(rejection: &SignupRejection) -> Error {
    let mut collected = ValidationErrors::default();
    for error in rejection.errors() {
        collected.push(error.field().as_str(), error.code(), error.message());
    }
    collected.into_error()
}

/// Map an invalid search query.
pub(crate) fn search_term_error(error: &SearchTermError) -> Error {
    let code = match error {
        SearchTermError::Empty => "required",
        SearchTermError::TooLong { .. } => "max_length",
    };
    field_error(QUERY, code, error.to_string())
}

/// Map an invalid bio.
pub(crate) fn bio_error(error: &UserValidationError) -> Error {
    field_error(BIO, "max_length", error.to_string())
}

/// Per-field messages carried by an error's details, if any.
pub(crate) fn field_messages(error: &Error) -> BTreeMap<String, Vec<String>> {
    let mut messages: BTreeMap<String, Vec<String>> = BTreeMap::new();
    if let Some(Value::Object(map)) = error.details().and_then(|d| d.get("errors")) {
        for (field, values) in map {
            let entry = messages.entry(field.clone()).or_default();
            if let Value::Array(values) = values {
                entry.extend(values.iter().filter_map(Value::as_str).map(str::to_owned));
            }
        }
    } else if let Some(field) = error.field() {
        messages
            .entry(field.to_owned())
            .or_default()
            .push(error.message().to_owned());
    }
    messages
}

fn payload_error(kind: &'static str, error: &impl fmt::Display) -> Error {
    debug!(kind, %error, "request payload rejected");
    Error::invalid_request(INVALID_PAYLOAD_MESSAGE)
        .with_details(json!({ "code": "invalid_payload", "reason": error.to_string() }))
}

/// JSON extractor configuration returning domain errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|error, _req| payload_error("json", &error).into())
}

/// Form extractor configuration returning domain errors.
pub fn form_config() -> web::FormConfig {
    web::FormConfig::default()
        .limit(16 * 1024)
        .error_handler(|error, _req| payload_error("form", &error).into())
}

/// Query-string extractor configuration returning domain errors.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|error, _req| payload_error("query", &error).into())
}
