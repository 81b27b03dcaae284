//! Authentication primitives: login credentials, signup requests and stored
//! password hashes.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{UserValidationError, Username};

/// Message shown for a missing form field.
pub const REQUIRED_FIELD_MESSAGE: &str = "This field is required.";
/// Message shown when login credentials do not match an account.
pub const INVALID_LOGIN_MESSAGE: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";
/// Message shown when the signup password confirmation differs.
pub const PASSWORD_MISMATCH_MESSAGE: &str = "The two password fields didn\u{2019}t match.";
/// Message shown when a signup username is already registered.
pub const DUPLICATE_USERNAME_MESSAGE: &str = "A user with that username already exists.";

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl LoginValidationError {
    /// Form field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "username",
            Self::EmptyPassword => "password",
        }
    }
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REQUIRED_FIELD_MESSAGE)
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use tracklist::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("admin", "password").unwrap();
/// assert_eq!(creds.username(), "admin");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    ///
    /// The username is checked first, matching the order fields appear on
    /// the login form. Use [`LoginCredentials::validate_all`] to collect
    /// errors for every field.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        Self::validate_all(username, password).map_err(|errors| {
            errors
                .into_iter()
                .next()
                .unwrap_or(LoginValidationError::EmptyUsername)
        })
    }

    /// Construct credentials, reporting every invalid field at once.
    pub fn validate_all(
        username: &str,
        password: &str,
    ) -> Result<Self, Vec<LoginValidationError>> {
        let normalized = username.trim();
        let mut errors = Vec::new();
        if normalized.is_empty() {
            errors.push(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            errors.push(LoginValidationError::EmptyPassword);
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Stored password hash in PHC string format (for example `$argon2id$...`).
///
/// The value is opaque to the domain; only a
/// [`PasswordHasher`](crate::domain::ports::PasswordHasher) can interpret it.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded PHC string.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Fields on the signup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupField {
    /// Requested username.
    Username,
    /// Chosen password.
    Password1,
    /// Password confirmation.
    Password2,
}

impl SignupField {
    /// Wire name used by forms and JSON payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Password1 => "password1",
            Self::Password2 => "password2",
        }
    }
}

/// One inline error on the signup form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupFieldError {
    field: SignupField,
    code: &'static str,
    message: String,
}

impl SignupFieldError {
    fn new(field: SignupField, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }

    /// Field the message is attached to.
    pub fn field(&self) -> SignupField {
        self.field
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Human readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// All field errors raised by a signup attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRejection(Vec<SignupFieldError>);

impl SignupRejection {
    /// Errors in form order.
    pub fn errors(&self) -> &[SignupFieldError] {
        &self.0
    }
}

impl fmt::Display for SignupRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{}", error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for SignupRejection {}

/// Validated signup request.
///
/// ## Invariants
/// - `username` satisfies [`Username`] rules.
/// - Both passwords were supplied and are identical.
///
/// # Examples
/// ```
/// use tracklist::domain::{NewAccount, SignupField};
///
/// let account = NewAccount::try_from_parts("dana", "s3cret!", "s3cret!").unwrap();
/// assert_eq!(account.username().as_ref(), "dana");
///
/// let rejection = NewAccount::try_from_parts("dana", "one", "two").unwrap_err();
/// assert_eq!(rejection.errors()[0].field(), SignupField::Password2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    username: Username,
    password: Zeroizing<String>,
}

impl NewAccount {
    /// Validate raw signup inputs, collecting every field error.
    pub fn try_from_parts(
        username: &str,
        password1: &str,
        password2: &str,
    ) -> Result<Self, SignupRejection> {
        let mut errors = Vec::new();

        let username = match Username::new(username) {
            Ok(value) => Some(value),
            Err(error) => {
                errors.push(username_error(&error));
                None
            }
        };
        if password1.is_empty() {
            errors.push(SignupFieldError::new(
                SignupField::Password1,
                "required",
                REQUIRED_FIELD_MESSAGE,
            ));
        }
        if password2.is_empty() {
            errors.push(SignupFieldError::new(
                SignupField::Password2,
                "required",
                REQUIRED_FIELD_MESSAGE,
            ));
        } else if !password1.is_empty() && password1 != password2 {
            errors.push(SignupFieldError::new(
                SignupField::Password2,
                "password_mismatch",
                PASSWORD_MISMATCH_MESSAGE,
            ));
        }

        match username {
            Some(username) if errors.is_empty() => Ok(Self {
                username,
                password: Zeroizing::new(password1.to_owned()),
            }),
            _ => Err(SignupRejection(errors)),
        }
    }

    /// Requested username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Chosen password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

fn username_error(error: &UserValidationError) -> SignupFieldError {
    let code = match error {
        UserValidationError::EmptyUsername => "required",
        UserValidationError::UsernameTooLong { .. } => "max_length",
        _ => "invalid",
    };
    SignupFieldError::new(SignupField::Username, code, error.to_string())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn validate_all_reports_both_fields() {
        let errors = LoginCredentials::validate_all(" ", "").expect_err("both missing");
        let fields: Vec<_> = errors.iter().map(LoginValidationError::field).collect();
        assert_eq!(fields, vec!["username", "password"]);
        assert!(errors.iter().all(|e| e.to_string() == REQUIRED_FIELD_MESSAGE));
    }

    #[rstest]
    #[case("  admin  ", "secret")]
    #[case("alice", " correct horse battery staple ")]
    fn valid_credentials_trim_username_only(#[case] username: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username(), username.trim());
        assert_eq!(creds.password(), password);
    }

    fn rejection_fields(rejection: &SignupRejection) -> Vec<(&'static str, &str)> {
        rejection
            .errors()
            .iter()
            .map(|e| (e.field().as_str(), e.message()))
            .collect()
    }

    #[rstest]
    fn signup_rejects_mismatched_passwords() {
        let rejection =
            NewAccount::try_from_parts("erin", "password123", "password456").expect_err("mismatch");
        assert_eq!(
            rejection_fields(&rejection),
            vec![("password2", "The two password fields didn’t match.")]
        );
    }

    #[rstest]
    fn signup_collects_all_missing_fields() {
        let rejection = NewAccount::try_from_parts("", "", "").expect_err("empty");
        assert_eq!(
            rejection_fields(&rejection),
            vec![
                ("username", REQUIRED_FIELD_MESSAGE),
                ("password1", REQUIRED_FIELD_MESSAGE),
                ("password2", REQUIRED_FIELD_MESSAGE),
            ]
        );
    }

    #[rstest]
    fn signup_reports_invalid_username_alongside_password_errors() {
        let rejection = NewAccount::try_from_parts("bad name", "pw", "").expect_err("invalid");
        let codes: Vec<_> = rejection.errors().iter().map(SignupFieldError::code).collect();
        assert_eq!(codes, vec!["invalid", "required"]);
    }

    #[rstest]
    fn signup_accepts_matching_passwords() {
        let account = NewAccount::try_from_parts(" frank ", "hunter2", "hunter2").expect("valid");
        assert_eq!(account.username().as_ref(), "frank");
        assert_eq!(account.password(), "hunter2");
    }

    #[rstest]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::new("$argon2id$v=19$secret");
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }
}
