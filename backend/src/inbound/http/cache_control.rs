//! Shared cache-control policies for HTTP handlers.

/// Per-user responses must be revalidated before reuse.
pub const PRIVATE_NO_CACHE_MUST_REVALIDATE: &str = "private, no-cache, must-revalidate";

/// Build the cache-control header tuple for per-user responses (profile
/// pages, the profile API and forms carrying a CSRF token).
pub const fn private_no_cache_header() -> (&'static str, &'static str) {
    ("Cache-Control", PRIVATE_NO_CACHE_MUST_REVALIDATE)
}
