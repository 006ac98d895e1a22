//! Image reference resolution.
//!
//! Wraps `oci_spec::distribution::Reference` so that a bare tag from the
//! listing API can be turned into a validated `<namespace>/<image>:<tag>`
//! reference before any registry call is made.

use crate::error::{CudexError, Result};
use oci_spec::distribution::Reference as OciReference;
use std::fmt;
use std::str::FromStr;


/// Represents an OCI image reference, wrapping `oci_spec::distribution::Reference`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference(OciReference);

impl FromStr for Reference {
    type Err = CudexError;

    fn from_str(s: &str) -> Result<Self> {
        let oci_reference = OciReference::from_str(s).map_err(|e| {
            CudexError::format_with_source(format!("Invalid image reference {:?}", s), e)
        })?;
        Ok(Reference(oci_reference))
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Reference {
    /// Resolves `tag` within `image` (e.g. `nvidia/cuda`).
    ///
    /// # Examples
    ///
    /// ```
    /// use libcudex::reference::Reference;
    ///
    /// let reference = Reference::for_tag("nvidia/cuda", "12.2.0-cudnn8-devel-ubuntu22.04").unwrap();
    /// assert_eq!(reference.repository(), "nvidia/cuda");
    /// assert_eq!(reference.tag(), Some("12.2.0-cudnn8-devel-ubuntu22.04"));
    /// ```
    pub fn for_tag(image: &str, tag: &str) -> Result<Self> {
        if tag.is_empty() {
            return Err(CudexError::format(format!(
                "Invalid image reference: empty tag for {}",
                image
            )));
        }
        Self::from_str(&format!("{}:{}", image, tag))
    }

    /// Returns the registry part of the reference.
    pub fn registry(&self) -> &str {
        self.0.registry()
    }

    /// Returns the repository part of the reference.
    pub fn repository(&self) -> &str {
        self.0.repository()
    }

    /// Returns the tag part of the reference, if present.
    pub fn tag(&self) -> Option<&str> {
        self.0.tag()
    }

    /// Returns the digest part of the reference, if present.
    pub fn digest(&self) -> Option<&str> {
        self.0.digest()
    }

    /// Returns the tag or digest used to address the manifest.
    pub fn manifest_reference(&self) -> &str {
        self.digest().or_else(|| self.tag()).unwrap_or("latest")
    }
}
