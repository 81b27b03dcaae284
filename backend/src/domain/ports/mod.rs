//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (called by inbound adapters): [`LoginService`],
//! [`SignupService`], [`ProfileQuery`], [`ProfileCommand`], [`MusicQuery`],
//! [`TrackSearch`].
//!
//! Driven ports (implemented by outbound adapters): [`UserRepository`],
//! [`TrackRepository`], [`PasswordHasher`].

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod music_query;
mod password_hasher;
mod profile_command;
mod profile_query;
mod signup_service;
mod track_repository;
mod track_search;
mod user_repository;

#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use music_query::MockMusicQuery;
pub use music_query::MusicQuery;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use profile_command::MockProfileCommand;
pub use profile_command::ProfileCommand;
#[cfg(test)]
pub use profile_query::MockProfileQuery;
pub use profile_query::ProfileQuery;
#[cfg(test)]
pub use signup_service::MockSignupService;
pub use signup_service::SignupService;
#[cfg(test)]
pub use track_repository::MockTrackRepository;
pub use track_repository::{TrackPersistenceError, TrackRepository};
#[cfg(test)]
pub use track_search::MockTrackSearch;
pub use track_search::TrackSearch;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
