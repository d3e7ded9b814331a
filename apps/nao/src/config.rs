//! # Configuration
//!
//! Where the database lives and whether buckets are bootstrapped on open.
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. TOML file given with `--config`
//! 3. `NAO_DATABASE` environment variable
//! 4. `--database` flag

use crate::cli::CliError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the database file.
pub const DATABASE_ENV: &str = "NAO_DATABASE";

/// Default database file, relative to the working directory.
pub const DEFAULT_DATABASE: &str = "nao.redb";

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path of the redb file.
    pub database: PathBuf,
    /// Create every missing bucket when the store is opened.
    pub create_buckets: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            create_buckets: true,
        }
    }
}

impl Config {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml(text: &str) -> Result<Self, CliError> {
        toml::from_str(text).map_err(|e| CliError::Config(e.to_string()))
    }

    /// Read the TOML file at `path`, or use defaults when there is none.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Apply the environment value and then the flag on top of `self`.
    #[must_use]
    pub fn overridden(mut self, env: Option<PathBuf>, flag: Option<PathBuf>) -> Self {
        if let Some(database) = flag.or(env) {
            self.database = database;
        }
        self
    }

    /// Settings for this process: file, then `NAO_DATABASE`, then the flag.
    pub fn resolve(file: Option<&Path>, flag: Option<PathBuf>) -> Result<Self, CliError> {
        let env = std::env::var_os(DATABASE_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Ok(Self::load(file)?.overridden(env, flag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let config = Config::load(None).expect("defaults");
        assert_eq!(config, Config::default());
        assert!(config.create_buckets);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = Config::from_toml("database = \"/srv/nao/media.redb\"").expect("parse");
        assert_eq!(config.database, PathBuf::from("/srv/nao/media.redb"));
        assert!(config.create_buckets);
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = Config::from_toml("databse = \"typo.redb\"").expect_err("typo");
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn flag_beats_env_beats_file() {
        let file = Config {
            database: PathBuf::from("file.redb"),
            create_buckets: false,
        };

        let env_only = file
            .clone()
            .overridden(Some(PathBuf::from("env.redb")), None);
        assert_eq!(env_only.database, PathBuf::from("env.redb"));
        assert!(!env_only.create_buckets);

        let both = file.overridden(
            Some(PathBuf::from("env.redb")),
            Some(PathBuf::from("flag.redb")),
        );
        assert_eq!(both.database, PathBuf::from("flag.redb"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::load(Some(Path::new("/nonexistent/nao.toml"))).expect_err("missing");
        assert!(matches!(err, CliError::Io { .. }));
    }
}
