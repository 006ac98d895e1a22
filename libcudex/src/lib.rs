//! Cudex - CUDA Base Image Catalog Library
//!
//! Cudex builds a catalog of the `nvidia/cuda` images that ship cuDNN. It
//! lists the published tags, keeps the candidates, inspects each image's
//! configuration over the OCI Distribution protocol and records the CUDA
//! toolkit and cuDNN versions baked into it.
//!
//! # Quick Start
//!
//! ```no_run
//! use libcudex::Cudex;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cudex = Cudex::new()?;
//!
//!     let records = cudex.build_catalog().await?;
//!     for record in &records {
//!         println!("{} -> cuda {} cudnn {}", record.tag, record.toolkit_version, record.lib_version);
//!     }
//!
//!     let base = cudex.select("11.8", Some("8")).await?;
//!     println!("FROM {}", base.image_ref(&cudex.config().registry.image));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Main Types
//!
//! - [`Cudex`] - Main entry point
//! - [`CudexBuilder`] - Builder for advanced configuration
//! - [`ImageRecord`] - One catalog entry
//! - [`CatalogBuilder`] - Bounded-concurrency catalog assembly over any [`ImageInspector`]
//! - [`Config`] - Layered configuration
//!
//! # Pipeline
//!
//! 1. [`tags::fetch_all_tags`] follows the paginated tag listing.
//! 2. [`tags::select_candidates`] drops non-cuDNN and release-candidate tags
//!    and sorts the rest in descending order.
//! 3. [`inspect::RegistryInspector`] resolves each tag to its image config.
//! 4. [`extract::parse_image_record`] turns the tag and environment into a record.

#![warn(clippy::all)]

/// Returns the libcudex crate version.
///
/// # Examples
///
/// ```
/// let version = libcudex::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// High-level public API (main entry point)
mod cudex;
pub use cudex::{Cudex, CudexBuilder};

// Re-export commonly used types for convenience
pub use auth::Credentials;
pub use catalog::{CatalogBuilder, select_base_image};
pub use config::Config;
pub use error::{CudexError, Result};
pub use extract::ImageRecord;
pub use inspect::{ImageInspector, RegistryInspector};

pub mod catalog;
pub mod extract;
pub mod inspect;
pub mod tags;

// Protocol plumbing, public for advanced use
#[doc(hidden)]
pub mod auth;
#[doc(hidden)]
pub mod client;
pub mod config;
#[doc(hidden)]
pub mod digest;
pub mod error;
#[doc(hidden)]
pub mod oci;
#[doc(hidden)]
pub mod reference;
