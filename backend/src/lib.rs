//! Tracklist library modules.
//!
//! A session-authenticated music catalogue: HTML pages for accounts, music and
//! search, JSON mirrors of the same operations, and a stylesheet server.

pub mod catalogue_seed;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
