//! Account identity: ids, usernames, bios and the user aggregate.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

use super::auth::PasswordHash;

/// Maximum username length, counted in characters.
pub const USERNAME_MAX: usize = 150;
/// Maximum bio length, counted in characters.
pub const BIO_MAX: usize = 500;

/// Validation errors raised by the account value types.
///
/// Display strings are the inline form messages shown to end users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Identifier was empty.
    EmptyId,
    /// Identifier was not a canonical UUID.
    InvalidId,
    /// Username was blank once trimmed.
    EmptyUsername,
    /// Username exceeded [`USERNAME_MAX`] characters.
    UsernameTooLong {
        /// Permitted maximum.
        max: usize,
        /// Submitted length.
        actual: usize,
    },
    /// Username contained characters outside letters, digits and `@.+-_`.
    UsernameInvalidCharacters,
    /// Bio exceeded [`BIO_MAX`] characters.
    BioTooLong {
        /// Permitted maximum.
        max: usize,
        /// Submitted length.
        actual: usize,
    },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyUsername => write!(f, "This field is required."),
            Self::UsernameTooLong { max, actual } | Self::BioTooLong { max, actual } => write!(
                f,
                "Ensure this value has at most {max} characters (it has {actual})."
            ),
            Self::UsernameInvalidCharacters => write!(
                f,
                "Enter a valid username. This value may contain only letters, numbers, \
                 and @/./+/-/_ characters."
            ),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id.to_owned()))
    }

    /// Wrap an existing UUID, e.g. one read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // `\w` is Unicode-aware, so accented letters are accepted.
        Regex::new(r"^[\w.@+-]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Unique login name.
///
/// ## Invariants
/// - Surrounding whitespace is trimmed.
/// - Between 1 and [`USERNAME_MAX`] characters.
/// - Only letters, digits and `@ . + - _`.
///
/// # Examples
/// ```
/// use tracklist::domain::Username;
///
/// let name = Username::new("  ada.l@example ").unwrap();
/// assert_eq!(name.as_ref(), "ada.l@example");
/// assert!(Username::new("no spaces").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }

        let actual = trimmed.chars().count();
        if actual > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong {
                max: USERNAME_MAX,
                actual,
            });
        }

        if !username_regex().is_match(trimmed) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }

        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

/// Free-text profile bio. Empty means "no bio".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bio(String);

impl Bio {
    /// Validate and construct a [`Bio`]; surrounding whitespace is trimmed.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        let actual = trimmed.chars().count();
        if actual > BIO_MAX {
            return Err(UserValidationError::BioTooLong {
                max: BIO_MAX,
                actual,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Whether the user has left their bio blank.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for Bio {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    bio: Bio,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(id: UserId, username: Username, bio: Bio) -> Self {
        Self { id, username, bio }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Login name, also used in profile URLs.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Profile bio.
    pub fn bio(&self) -> &Bio {
        &self.bio
    }

    /// Return a copy of the user carrying a different bio.
    #[must_use]
    pub fn with_bio(mut self, bio: Bio) -> Self {
        self.bio = bio;
        self
    }
}

/// A user together with their stored credential. Never leaves the domain
/// and persistence layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    user: User,
    password_hash: PasswordHash,
}

impl UserAccount {
    /// Pair a user with their password hash.
    pub fn new(user: User, password_hash: PasswordHash) -> Self {
        Self {
            user,
            password_hash,
        }
    }

    /// Public part of the account.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Stored PHC-format password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Drop the credential and keep the public view.
    pub fn into_user(self) -> User {
        self.user
    }
}
