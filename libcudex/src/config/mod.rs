//! Catalog configuration.
//!
//! Settings are layered with the `config` crate: serde defaults first, then
//! an optional YAML file. Environment and command-line overrides are applied
//! by the caller on top of the loaded value.

use crate::error::{CudexError, Result};
use crate::oci::TargetPlatform;
use config::{Config as ConfigRs, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;


/// Docker Hub listing of `nvidia/cuda` devel tags, most recently updated first.
pub const DEFAULT_TAGS_URL: &str = "https://hub.docker.com/v2/repositories/nvidia/cuda/tags/?page_size=1000&name=devel-ubuntu&ordering=last_updated";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub registry: Registry,
    #[serde(default)]
    pub catalog: Catalog,
    #[serde(default)]
    pub network: Network,
}

impl Config {
    /// Parses a `Config` from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let builder = ConfigRs::builder()
            .add_source(ConfigRs::try_from(&Config::default())?)
            .add_source(File::from_str(s, FileFormat::Yaml));

        Self::from_builder(builder, None)
    }

    /// Loads a `Config` from an optional YAML file.
    ///
    /// Without a path the defaults are returned. A path that does not exist
    /// is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigRs::builder().add_source(ConfigRs::try_from(&Config::default())?);

        if let Some(p) = path {
            builder = builder.add_source(File::from(p).format(FileFormat::Yaml).required(true));
        }

        Self::from_builder(builder, path)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        path: Option<&Path>,
    ) -> Result<Self> {
        builder
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| {
                CudexError::config_with_source(
                    "Failed to deserialize configuration".to_string(),
                    path.map(|p| p.display().to_string()),
                    e,
                )
            })
    }

    /// Checks settings that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.concurrency == 0 {
            return Err(CudexError::config(
                "catalog.concurrency must be at least 1",
                None,
            ));
        }

        Url::parse(&self.source.tags_url).map_err(|e| {
            CudexError::config_with_source(
                format!("source.tags_url is not a valid URL: {}", self.source.tags_url),
                None,
                e,
            )
        })?;

        if self.registry.url.trim().is_empty() {
            return Err(CudexError::config("registry.url cannot be empty", None));
        }

        if self.registry.image.trim().is_empty() {
            return Err(CudexError::config("registry.image cannot be empty", None));
        }

        self.registry.platform.parse::<TargetPlatform>()?;

        Ok(())
    }
}

/// Where candidate tags are listed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    #[serde(default = "default_tags_url")]
    pub tags_url: String,
}

impl Default for Source {
    fn default() -> Self {
        Self {
            tags_url: default_tags_url(),
        }
    }
}

fn default_tags_url() -> String {
    DEFAULT_TAGS_URL.to_string()
}

/// Where images are inspected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Registry {
    #[serde(default = "default_registry_url")]
    pub url: String,

    #[serde(default = "default_registry_image")]
    pub image: String,

    #[serde(default = "default_registry_platform")]
    pub platform: String,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            url: default_registry_url(),
            image: default_registry_image(),
            platform: default_registry_platform(),
        }
    }
}

fn default_registry_url() -> String {
    "https://registry-1.docker.io".to_string()
}

fn default_registry_image() -> String {
    "nvidia/cuda".to_string()
}

fn default_registry_platform() -> String {
    "linux/amd64".to_string()
}

/// Catalog assembly settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Catalog {
    /// Maximum number of images inspected at once.
    #[serde(default = "default_catalog_concurrency")]
    pub concurrency: usize,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            concurrency: default_catalog_concurrency(),
        }
    }
}

fn default_catalog_concurrency() -> usize {
    1 // Docker Hub throttles token-authenticated manifest pulls
}

/// Network settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Network {
    /// Request timeout in seconds.
    #[serde(default = "default_network_timeout")]
    pub timeout: u64,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            timeout: default_network_timeout(),
        }
    }
}

fn default_network_timeout() -> u64 {
    30
}
