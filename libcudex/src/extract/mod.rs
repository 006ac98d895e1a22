//! Version extraction from tags and image environments.
//!
//! Everything here is pure: a tag and its environment list go in, an
//! [`ImageRecord`] or an error comes out. Any unexpected shape is an error
//! rather than a skipped entry, because a silently wrong record would feed
//! bad data into base-image selection.

use crate::error::{CudexError, Result};
use serde::{Deserialize, Serialize};


/// Token separating the OS version from the rest of a tag.
pub const OS_MARKER: &str = "ubuntu";

/// Marker of development images (compilers and headers included).
pub const DEVEL_MARKER: &str = "-devel";

/// Environment variable holding the CUDA toolkit version.
pub const TOOLKIT_ENV: &str = "CUDA_VERSION";

/// Environment variable holding the full cuDNN version.
pub const LIB_ENV: &str = "NV_CUDNN_VERSION";

/// A validated catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Exact registry tag.
    pub tag: String,
    /// Whether this is a development image.
    pub is_devel: bool,
    /// OS version parsed from the tag (e.g. `22.04`).
    pub os_version: String,
    /// CUDA toolkit version from the image environment (e.g. `11.8.0`).
    pub toolkit_version: String,
    /// cuDNN major version from the image environment (e.g. `8`).
    pub lib_version: String,
}

impl ImageRecord {
    /// Full image reference for this record within `image`.
    ///
    /// # Examples
    ///
    /// ```
    /// use libcudex::extract::parse_image_record;
    ///
    /// let env = vec!["NV_CUDNN_VERSION=8.9.0.131".to_string()];
    /// let record = parse_image_record("11.8.0-cudnn8-devel-ubuntu22.04", &env).unwrap();
    /// assert_eq!(record.image_ref("nvidia/cuda"), "nvidia/cuda:11.8.0-cudnn8-devel-ubuntu22.04");
    /// ```
    pub fn image_ref(&self, image: &str) -> String {
        format!("{}:{}", image, self.tag)
    }
}

/// Builds an [`ImageRecord`] from a tag and the image's environment list.
///
/// # Errors
///
/// - `Format` when the tag does not contain [`OS_MARKER`] exactly once
/// - `Format` when an environment entry has no `=`
/// - `Validation` when [`LIB_ENV`] is absent
///
/// # Examples
///
/// ```
/// use libcudex::extract::parse_image_record;
///
/// let env = vec![
///     "CUDA_VERSION=11.8.0".to_string(),
///     "NV_CUDNN_VERSION=8.9.1".to_string(),
/// ];
/// let record = parse_image_record("11.8.0-cudnn8-devel-ubuntu22.04", &env).unwrap();
/// assert!(record.is_devel);
/// assert_eq!(record.os_version, "22.04");
/// assert_eq!(record.toolkit_version, "11.8.0");
/// assert_eq!(record.lib_version, "8");
/// ```
pub fn parse_image_record(tag: &str, env: &[String]) -> Result<ImageRecord> {
    let os_version = parse_os_version(tag)?;

    let mut toolkit_version = String::new();
    let mut lib_version = String::new();

    for entry in env {
        let (name, value) = entry.split_once('=').ok_or_else(|| {
            CudexError::format(format!(
                "invalid environment variable {:?} in tag {}",
                entry, tag
            ))
        })?;

        match name {
            TOOLKIT_ENV => toolkit_version = value.to_string(),
            LIB_ENV => lib_version = major_component(value).to_string(),
            _ => {}
        }
    }

    if lib_version.is_empty() {
        return Err(CudexError::validation(format!(
            "required version {} not found in tag {}",
            LIB_ENV, tag
        )));
    }

    Ok(ImageRecord {
        tag: tag.to_string(),
        is_devel: tag.contains(DEVEL_MARKER),
        os_version,
        toolkit_version,
        lib_version,
    })
}

/// Returns the text after the single [`OS_MARKER`] in `tag`.
pub fn parse_os_version(tag: &str) -> Result<String> {
    let parts: Vec<&str> = tag.split(OS_MARKER).collect();
    match parts.as_slice() {
        [_, os_version] => Ok(os_version.to_string()),
        _ => Err(CudexError::format(format!(
            "invalid tag format {:?}, must contain {}<version> exactly once",
            tag, OS_MARKER
        ))),
    }
}

fn major_component(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}
