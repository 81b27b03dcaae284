//! Startup wiring for catalogue seeding.

mod config;
mod startup;

pub use config::CatalogueSeedSettings;
pub use startup::{CatalogueSeedError, seed_catalogue_on_startup};
