//! OCI specification data structures.
//!
//! Re-exports the `oci-spec` types the inspector works with and adds the
//! manifest/index detection and platform selection needed to get from a tag
//! to an image configuration.

pub use oci_spec::image::{Descriptor, ImageConfiguration, ImageIndex, ImageManifest, Platform};

use crate::error::{CudexError, Result};
use std::fmt;
use std::str::FromStr;


/// Manifest media types accepted when fetching a manifest by tag.
pub const MANIFEST_ACCEPT: &str = "application/vnd.oci.image.manifest.v1+json, \
     application/vnd.oci.image.index.v1+json, \
     application/vnd.docker.distribution.manifest.v2+json, \
     application/vnd.docker.distribution.manifest.list.v2+json";

/// Either a single-platform image manifest or a multi-platform image index.
///
/// `nvidia/cuda` tags are published as indexes covering amd64 and arm64, so
/// the inspector has to resolve an index to one platform manifest first.
#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum ManifestOrIndex {
    /// A single-platform image manifest
    Manifest(ImageManifest),
    /// A multi-platform image index
    Index(ImageIndex),
}

impl ManifestOrIndex {
    /// Parse manifest bytes, detecting whether they hold a manifest or an index.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| CudexError::format_with_source("Failed to parse manifest JSON", e))?;

        let media_type = value
            .get("mediaType")
            .and_then(|v| v.as_str())
            .unwrap_or("");

        let is_index = if media_type.contains("index") || media_type.contains("list") {
            true
        } else if media_type.contains("manifest") {
            false
        } else if value.get("manifests").is_some() {
            true
        } else if value.get("layers").is_some() || value.get("config").is_some() {
            false
        } else {
            return Err(CudexError::format(
                "Unable to determine if content is a manifest or index",
            ));
        };

        if is_index {
            let index: ImageIndex = serde_json::from_value(value)
                .map_err(|e| CudexError::format_with_source("Failed to parse image index", e))?;
            Ok(ManifestOrIndex::Index(index))
        } else {
            let manifest: ImageManifest = serde_json::from_value(value)
                .map_err(|e| CudexError::format_with_source("Failed to parse image manifest", e))?;
            Ok(ManifestOrIndex::Manifest(manifest))
        }
    }

    /// Returns true if this is a multi-platform index.
    pub fn is_index(&self) -> bool {
        matches!(self, ManifestOrIndex::Index(_))
    }

    /// Find the manifest descriptor for a platform in an index.
    ///
    /// Always `None` for a single-platform manifest.
    pub fn find_platform(&self, platform: &TargetPlatform) -> Option<&Descriptor> {
        match self {
            ManifestOrIndex::Manifest(_) => None,
            ManifestOrIndex::Index(index) => index.manifests().iter().find(|desc| {
                desc.platform().as_ref().is_some_and(|p| {
                    p.os().to_string() == platform.os
                        && p.architecture().to_string() == platform.architecture
                })
            }),
        }
    }
}

/// Platform an index is resolved to, written `os/arch` (e.g. `linux/amd64`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPlatform {
    pub os: String,
    pub architecture: String,
}

impl Default for TargetPlatform {
    fn default() -> Self {
        Self {
            os: "linux".to_string(),
            architecture: "amd64".to_string(),
        }
    }
}

impl FromStr for TargetPlatform {
    type Err = CudexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((os, arch)) if !os.is_empty() && !arch.is_empty() && !arch.contains('/') => {
                Ok(Self {
                    os: os.to_string(),
                    architecture: arch.to_string(),
                })
            }
            _ => Err(CudexError::validation(format!(
                "Invalid platform {:?}, expected os/arch",
                s
            ))),
        }
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.architecture)
    }
}

/// Decodes a config blob and returns its environment list.
///
/// A configuration without a `config` section or without `Env` yields an
/// empty list.
pub fn env_from_config(bytes: &[u8]) -> Result<Vec<String>> {
    let configuration: ImageConfiguration = serde_json::from_slice(bytes)
        .map_err(|e| CudexError::format_with_source("Failed to parse image configuration", e))?;

    Ok(configuration
        .config()
        .as_ref()
        .and_then(|c| c.env().clone())
        .unwrap_or_default())
}
