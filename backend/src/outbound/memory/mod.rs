//! In-process adapters for the storage ports.
//!
//! These back the server when no `DATABASE_URL` is configured and give the
//! HTTP tests a real repository without a database. Data lives for the
//! lifetime of the process.

mod track_repository;
mod user_repository;

pub use track_repository::InMemoryTrackRepository;
pub use user_repository::InMemoryUserRepository;
