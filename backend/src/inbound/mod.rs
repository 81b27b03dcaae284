//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! Browsers and API clients both arrive through [`http`].

pub mod http;
