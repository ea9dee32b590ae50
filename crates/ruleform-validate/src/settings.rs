//! Engine-wide settings.
//!
//! # Example
//!
//! ```ignore
//! use ruleform_validate::settings::{load_dotenv, EngineSettings};
//!
//! load_dotenv();
//! // RULEFORM_ALL_ERRORS=true collects every failing rule per field
//! let settings = EngineSettings::from_env()?;
//! ```

use serde::{Deserialize, Serialize};

/// Prefix for settings read from the environment.
pub const ENV_PREFIX: &str = "RULEFORM_";

/// Settings shared by every field an engine validates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Collect every failing rule of a field instead of stopping at the
    /// first. A field with an override message always stops at the first.
    pub all_errors: bool,
}

impl EngineSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all_errors(mut self, all_errors: bool) -> Self {
        self.all_errors = all_errors;
        self
    }
}

#[cfg(feature = "config")]
mod env {
    use super::{EngineSettings, ENV_PREFIX};
    use thiserror::Error;

    /// Failure to load settings from the environment.
    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("configuration error: {0}")]
        Env(#[from] envy::Error),
    }

    impl EngineSettings {
        /// Read `RULEFORM_`-prefixed environment variables.
        ///
        /// Unset variables keep their defaults.
        pub fn from_env() -> Result<Self, ConfigError> {
            Self::from_vars(std::env::vars())
        }

        /// Read settings from `(name, value)` pairs, as `from_env` does.
        pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
        where
            I: IntoIterator<Item = (String, String)>,
        {
            Ok(envy::prefixed(ENV_PREFIX).from_iter(vars)?)
        }
    }

    /// Load variables from a `.env` file in the current directory or its
    /// parents, if one exists.
    pub fn load_dotenv() {
        let _ = dotenvy::dotenv();
    }

    /// Load variables from a specific `.env` file, if it exists.
    pub fn load_dotenv_from<P: AsRef<std::path::Path>>(path: P) {
        let _ = dotenvy::from_path(path);
    }
}

#[cfg(feature = "config")]
pub use env::{load_dotenv, load_dotenv_from, ConfigError};
