//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! adapters. Types validate on construction so adapters only ever hold values
//! that satisfy their invariants.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic failure payload.
//! - User, Username, Bio: account identity and profile.
//! - Track, TrackSlug: catalogue entries.
//! - SearchTerm, SearchResults: transient search values.
//! - AccountService, CatalogueService: use-case implementations behind the
//!   driving ports in [`ports`].

pub mod account_service;
pub mod auth;
pub mod catalogue_service;
pub mod error;
pub mod ports;
pub mod search;
pub mod trace_id;
pub mod track;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    DUPLICATE_USERNAME_MESSAGE, INVALID_LOGIN_MESSAGE, LoginCredentials, LoginValidationError,
    NewAccount, PASSWORD_MISMATCH_MESSAGE, PasswordHash, REQUIRED_FIELD_MESSAGE, SignupField,
    SignupFieldError, SignupRejection,
};
pub use self::catalogue_service::CatalogueService;
pub use self::error::{Error, ErrorCode};
pub use self::search::{SearchResult, SearchResults, SearchTerm, SearchTermError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::track::{Track, TrackDuration, TrackRecord, TrackSlug, TrackValidationError};
pub use self::user::{Bio, User, UserAccount, UserId, UserValidationError, Username};
