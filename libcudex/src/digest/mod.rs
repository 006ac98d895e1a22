//! OCI content digests.
//!
//! Wraps `oci_spec::image::Digest` and adds verification of downloaded
//! content against the digest it was requested by.

use crate::error::{CudexError, Result};
use oci_spec::image::Digest as OciDigest;
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;
use std::str::FromStr;

#[cfg(test)]
mod tests;

/// Represents a content digest, wrapping the `oci_spec::image::Digest` type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest(OciDigest);

impl FromStr for Digest {
    type Err = CudexError;

    fn from_str(s: &str) -> Result<Self> {
        let oci_digest = OciDigest::from_str(s).map_err(|e| {
            CudexError::format_with_source(format!("Invalid digest format {:?}", s), e)
        })?;
        Ok(Digest(oci_digest))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Digest {
    /// Returns the algorithm part of the digest (e.g. `sha256`).
    pub fn algorithm(&self) -> String {
        self.0.algorithm().to_string()
    }

    /// Returns the hex-encoded hash part of the digest.
    pub fn hex(&self) -> &str {
        self.0.digest()
    }

    /// Checks that `content` hashes to this digest.
    ///
    /// Only sha256 is supported, which is what registries use for config blobs.
    pub fn verify(&self, content: &[u8]) -> Result<()> {
        let algorithm = self.algorithm();
        if algorithm != "sha256" {
            return Err(CudexError::validation(format!(
                "Unsupported digest algorithm: {}. Only sha256 is supported",
                algorithm
            )));
        }

        let computed = format!("{:x}", Sha256::digest(content));
        if computed != self.hex() {
            return Err(CudexError::validation(format!(
                "Digest mismatch: expected {}, computed sha256:{}",
                self, computed
            )));
        }

        Ok(())
    }
}
