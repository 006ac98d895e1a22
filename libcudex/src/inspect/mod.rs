//! Image inspection.
//!
//! Turns a tag into the environment list of its image configuration. The
//! [`ImageInspector`] trait is the seam between catalog assembly and the
//! network; [`RegistryInspector`] is the OCI Distribution implementation.

use crate::client::Client;
use crate::digest::Digest;
use crate::error::{CudexError, Result};
use crate::oci::{ManifestOrIndex, TargetPlatform, env_from_config};
use crate::reference::Reference;
use async_trait::async_trait;
use std::str::FromStr;
use tracing::debug;


/// Fetches the environment of the image published under a tag.
#[async_trait]
pub trait ImageInspector: Send + Sync {
    /// Returns the raw `NAME=value` environment entries of the image for `tag`.
    async fn inspect(&self, tag: &str) -> Result<Vec<String>>;
}

/// Inspects images through the registry manifest and blob endpoints.
#[derive(Debug, Clone)]
pub struct RegistryInspector {
    client: Client,
    image: String,
    platform: TargetPlatform,
}

impl RegistryInspector {
    /// Creates an inspector for `image` (e.g. `nvidia/cuda`).
    pub fn new(client: Client, image: impl Into<String>, platform: TargetPlatform) -> Self {
        Self {
            client,
            image: image.into(),
            platform,
        }
    }

    /// Returns the image name tags are resolved in.
    pub fn image(&self) -> &str {
        &self.image
    }

    async fn inspect_reference(&self, reference: &Reference) -> Result<Vec<String>> {
        let repository = reference.repository();

        let bytes = self
            .client
            .fetch_manifest(repository, reference.manifest_reference())
            .await?;

        let manifest = match ManifestOrIndex::from_bytes(&bytes)? {
            ManifestOrIndex::Manifest(manifest) => manifest,
            index @ ManifestOrIndex::Index(_) => {
                let descriptor = index.find_platform(&self.platform).ok_or_else(|| {
                    CudexError::not_found("platform".to_string(), self.platform.to_string())
                })?;
                let digest = descriptor.digest().to_string();
                debug!(%reference, %digest, platform = %self.platform, "resolved image index");

                let bytes = self.client.fetch_manifest(repository, &digest).await?;
                match ManifestOrIndex::from_bytes(&bytes)? {
                    ManifestOrIndex::Manifest(manifest) => manifest,
                    ManifestOrIndex::Index(_) => {
                        return Err(CudexError::format(format!(
                            "platform entry {} of {} is itself an index",
                            digest, reference
                        )));
                    }
                }
            }
        };

        let config_digest = Digest::from_str(&manifest.config().digest().to_string())?;
        let config = self.client.fetch_blob(repository, &config_digest).await?;

        env_from_config(&config)
    }
}

#[async_trait]
impl ImageInspector for RegistryInspector {
    async fn inspect(&self, tag: &str) -> Result<Vec<String>> {
        let reference = Reference::for_tag(&self.image, tag)?;
        debug!(%reference, "inspecting image");

        self.inspect_reference(&reference)
            .await
            .map_err(|e| with_tag_context(e, tag))
    }
}

/// Prefixes transport and format errors with the tag that caused them.
fn with_tag_context(error: CudexError, tag: &str) -> CudexError {
    match error {
        CudexError::Network { message, source } => CudexError::Network {
            message: format!("{}: {}", tag, message),
            source,
        },
        CudexError::Format { message, source } => CudexError::Format {
            message: format!("{}: {}", tag, message),
            source,
        },
        CudexError::Validation { message, source } => CudexError::Validation {
            message: format!("{}: {}", tag, message),
            source,
        },
        CudexError::NotFound {
            resource_type,
            name,
        } => CudexError::NotFound {
            resource_type,
            name: format!("{} (tag {})", name, tag),
        },
        other => other,
    }
}
