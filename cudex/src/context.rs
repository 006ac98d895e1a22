//! Application context that holds resolved configuration
//!
//! The context is built following the precedence order:
//! 1. Default values
//! 2. Config file values
//! 3. Environment variables
//! 4. CLI flags
//!
//! Once built, the context is passed as read-only throughout the application.

use crate::format::ColorChoice;
use libcudex::{Config, Credentials, Cudex};
use std::env;
use std::path::{Path, PathBuf};

pub const ENV_CONCURRENCY: &str = "CUDEX_CONCURRENCY";
pub const ENV_REGISTRY_URL: &str = "CUDEX_REGISTRY_URL";
pub const ENV_USERNAME: &str = "CUDEX_USERNAME";
pub const ENV_PASSWORD: &str = "CUDEX_PASSWORD";

/// How much diagnostic output to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbosityLevel {
    Normal,
    Verbose,
    VeryVerbose,
    Trace,
}

impl VerbosityLevel {
    /// Map the number of `-v` flags to a level
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => VerbosityLevel::Normal,
            1 => VerbosityLevel::Verbose,
            2 => VerbosityLevel::VeryVerbose,
            _ => VerbosityLevel::Trace,
        }
    }

    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        match self {
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "warn,libcudex=info,cudex=info",
            VerbosityLevel::VeryVerbose => "warn,libcudex=debug,cudex=debug",
            VerbosityLevel::Trace => "trace",
        }
    }
}

/// Application context with resolved configuration and runtime state
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Resolved configuration
    pub config: Config,
    /// Config file that was loaded, if any
    pub config_path: Option<PathBuf>,
    /// Credentials for registry token requests
    pub credentials: Option<Credentials>,
    pub color: ColorChoice,
    pub verbosity: VerbosityLevel,
}

impl AppContext {
    /// Build context with precedence: defaults > config file > env vars
    ///
    /// An explicit `config_path` must exist; the default location is only
    /// read when present.
    pub fn build(
        color: ColorChoice,
        verbosity: VerbosityLevel,
        config_path: Option<&Path>,
    ) -> Result<Self, String> {
        let config_path = match config_path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|path| path.exists()),
        };

        Self::build_with_env(color, verbosity, config_path, |key| env::var(key).ok())
    }

    /// Same as [`AppContext::build`] with an injectable environment lookup
    pub fn build_with_env<F>(
        color: ColorChoice,
        verbosity: VerbosityLevel,
        config_path: Option<PathBuf>,
        lookup: F,
    ) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 1 + 2. Defaults overlaid with the config file
        let mut config = Config::load(config_path.as_deref())
            .map_err(|e| crate::commands::describe_error(&e))?;

        // 3. Environment variable overrides
        if let Some(value) = lookup(ENV_CONCURRENCY) {
            config.catalog.concurrency = value.trim().parse().map_err(|_| {
                format!(
                    "{} must be a positive integer, got {:?}",
                    ENV_CONCURRENCY, value
                )
            })?;
        }
        if let Some(url) = lookup(ENV_REGISTRY_URL) {
            config.registry.url = url;
        }

        let credentials = match (lookup(ENV_USERNAME), lookup(ENV_PASSWORD)) {
            (Some(username), Some(password)) => Some(Credentials::basic(username, password)),
            _ => None,
        };

        Ok(Self {
            config,
            config_path,
            credentials,
            color,
            verbosity,
        })
    }

    /// 4. Apply the `--concurrency` flag
    pub fn with_concurrency(mut self, concurrency: Option<usize>) -> Self {
        if let Some(concurrency) = concurrency {
            self.config.catalog.concurrency = concurrency;
        }
        self
    }

    /// Create the library entry point from the resolved settings
    pub fn cudex(&self) -> Result<Cudex, String> {
        let mut builder = Cudex::builder().with_config(self.config.clone());
        if let Some(credentials) = &self.credentials {
            builder = builder.with_credentials(credentials.clone());
        }

        builder
            .build()
            .map_err(|e| crate::commands::describe_error(&e))
    }
}

/// Default config file location (`~/.config/cudex/config.yaml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cudex").join("config.yaml"))
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
