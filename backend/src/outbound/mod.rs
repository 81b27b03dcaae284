//! Outbound adapters implementing the driven ports.
//!
//! - **memory**: process-local repositories used when no database is
//!   configured and by the test suites
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **security**: Argon2id password hashing
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod security;
