//! HTTP inbound adapter: HTML pages, their JSON mirrors and stylesheets.

pub mod api;
pub mod cache_control;
pub mod error;
pub mod forms;
pub mod health;
pub mod pages;
pub mod routes;
pub mod session;
pub mod session_config;
pub mod state;
pub mod stylesheets;
pub mod templates;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
