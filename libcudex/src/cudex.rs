//! High-level API for the cudex library.
//!
//! [`Cudex`] wires the tag source, the registry inspector and the catalog
//! builder together from a single [`Config`].
//!
//! # Examples
//!
//! ```no_run
//! use libcudex::Cudex;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cudex = Cudex::builder().with_concurrency(4).build()?;
//!
//!     for record in cudex.build_catalog().await? {
//!         println!("{} cuda={} cudnn={}", record.tag, record.toolkit_version, record.lib_version);
//!     }
//!
//!     Ok(())
//! }
//! ```

use crate::auth::Credentials;
use crate::catalog::{CatalogBuilder, select_base_image};
use crate::client::{Client, ClientConfig};
use crate::config::Config;
use crate::error::{CudexError, Result};
use crate::extract::ImageRecord;
use crate::inspect::RegistryInspector;
use crate::oci::TargetPlatform;
use crate::tags::{fetch_all_tags, select_candidates};
use std::path::PathBuf;
use tracing::info;

/// Catalog builder for CUDA base images.
///
/// Create one with [`Cudex::new`] for the defaults or [`Cudex::builder`]
/// for a custom configuration.
pub struct Cudex {
    client: Client,
    catalog: CatalogBuilder<RegistryInspector>,
    config: Config,
}

impl Cudex {
    /// Creates an instance with the default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use libcudex::Cudex;
    ///
    /// let cudex = Cudex::new().unwrap();
    /// assert_eq!(cudex.config().registry.image, "nvidia/cuda");
    /// ```
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Creates a builder for advanced configuration.
    pub fn builder() -> CudexBuilder {
        CudexBuilder::new()
    }

    /// Returns the effective configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lists every tag published at the configured tag source.
    pub async fn fetch_tags(&self) -> Result<Vec<String>> {
        fetch_all_tags(&self.client, &self.config.source.tags_url).await
    }

    /// Lists the catalog candidates, filtered and sorted.
    pub async fn candidate_tags(&self) -> Result<Vec<String>> {
        let tags = self.fetch_tags().await?;
        let total = tags.len();
        let candidates = select_candidates(tags);
        info!(total, candidates = candidates.len(), "selected candidate tags");
        Ok(candidates)
    }

    /// Builds the full catalog: list, filter, sort, inspect, parse.
    pub async fn build_catalog(&self) -> Result<Vec<ImageRecord>> {
        let candidates = self.candidate_tags().await?;
        self.catalog.build(candidates).await
    }

    /// Builds the catalog and picks a base image for a toolkit version.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no devel image matches.
    pub async fn select(&self, toolkit: &str, lib: Option<&str>) -> Result<ImageRecord> {
        let records = self.build_catalog().await?;

        select_base_image(&records, toolkit, lib)
            .cloned()
            .ok_or_else(|| {
                let wanted = match lib {
                    Some(lib) => format!("cuda {} with cudnn {}", toolkit, lib),
                    None => format!("cuda {}", toolkit),
                };
                CudexError::not_found("base image".to_string(), wanted)
            })
    }
}

/// Builder for [`Cudex`].
///
/// # Examples
///
/// ```
/// use libcudex::{Config, Cudex};
///
/// let mut config = Config::default();
/// config.registry.platform = "linux/arm64".to_string();
///
/// let cudex = Cudex::builder().with_config(config).with_concurrency(8).build().unwrap();
/// assert_eq!(cudex.config().catalog.concurrency, 8);
/// ```
#[derive(Default)]
pub struct CudexBuilder {
    config: Option<Config>,
    config_file: Option<PathBuf>,
    credentials: Option<Credentials>,
    concurrency: Option<usize>,
}

impl CudexBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the configuration from a YAML file at build time.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Sets the configuration directly. Takes precedence over a file.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets credentials for registry token requests.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Overrides `catalog.concurrency`.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    /// Builds the [`Cudex`] instance.
    ///
    /// # Errors
    ///
    /// Returns `Config` errors for an unreadable file or invalid settings.
    pub fn build(self) -> Result<Cudex> {
        let mut config = match (self.config, self.config_file) {
            (Some(config), _) => config,
            (None, path) => Config::load(path.as_deref())?,
        };

        if let Some(concurrency) = self.concurrency {
            config.catalog.concurrency = concurrency;
        }

        config.validate()?;

        let platform: TargetPlatform = config.registry.platform.parse()?;
        let client = Client::with_config(
            &config.registry.url,
            self.credentials,
            ClientConfig::new().with_timeout(config.network.timeout),
        )?;

        let inspector = RegistryInspector::new(client.clone(), &config.registry.image, platform);
        let catalog = CatalogBuilder::new(inspector).with_concurrency(config.catalog.concurrency);

        Ok(Cudex {
            client,
            catalog,
            config,
        })
    }
}

#[cfg(test)]
#[path = "cudex_tests.rs"]
mod tests;
