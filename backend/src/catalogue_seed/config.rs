//! Catalogue seeding configuration loaded via OrthoConfig.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

fn default_seed_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("catalogue")
        .join("tracks.json")
}

/// Configuration values controlling catalogue seeding at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CATALOGUE_SEED")]
pub struct CatalogueSeedSettings {
    /// Load the seed file into the track repository on startup.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Optional seed file override.
    pub path: Option<PathBuf>,
}

impl CatalogueSeedSettings {
    /// Return the configured seed file, falling back to the bundled fixture.
    pub fn seed_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_seed_path)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for catalogue seed configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> CatalogueSeedSettings {
        CatalogueSeedSettings::load_from_iter([OsString::from("tracklist")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("CATALOGUE_SEED_ENABLED", None::<String>),
            ("CATALOGUE_SEED_PATH", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert!(!settings.enabled);
        assert_eq!(settings.seed_path(), default_seed_path());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CATALOGUE_SEED_ENABLED", Some("true".to_owned())),
            ("CATALOGUE_SEED_PATH", Some("/tmp/tracks.json".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.enabled);
        assert_eq!(settings.seed_path(), PathBuf::from("/tmp/tracks.json"));
    }

    #[rstest]
    fn bundled_fixture_exists() {
        assert!(default_seed_path().is_file());
    }
}
