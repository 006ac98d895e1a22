//! Catalog assembly.
//!
//! [`CatalogBuilder`] inspects every candidate tag with a bounded number of
//! concurrent inspections and returns the records in input order. The first
//! failure cancels the remaining work and is returned as the only result.

use crate::error::{CudexError, Result};
use crate::extract::{ImageRecord, parse_image_record, parse_os_version};
use crate::inspect::ImageInspector;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};


/// Default number of concurrent inspections.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Builds catalogs from tags using an [`ImageInspector`].
pub struct CatalogBuilder<I> {
    inspector: Arc<I>,
    concurrency: usize,
}

impl<I: ImageInspector + 'static> CatalogBuilder<I> {
    /// Creates a builder running one inspection at a time.
    pub fn new(inspector: I) -> Self {
        Self::from_arc(Arc::new(inspector))
    }

    /// Creates a builder around a shared inspector.
    pub fn from_arc(inspector: Arc<I>) -> Self {
        Self {
            inspector,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Sets the maximum number of in-flight inspections (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Returns the concurrency limit.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Inspects and parses every tag, returning records in `tags` order.
    ///
    /// # Errors
    ///
    /// Returns the first inspection or parse error observed. No partial
    /// catalog is returned; tasks still running are cancelled.
    pub async fn build(&self, tags: Vec<String>) -> Result<Vec<ImageRecord>> {
        let total = tags.len();
        info!(tags = total, concurrency = self.concurrency, "building catalog");

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let cancel = CancellationToken::new();
        let mut tasks = JoinSet::new();

        for (index, tag) in tags.into_iter().enumerate() {
            let inspector = Arc::clone(&self.inspector);
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();

            tasks.spawn(async move {
                let result = inspect_tag(inspector.as_ref(), &semaphore, &cancel, &tag).await;
                (index, tag, result)
            });
        }

        let mut slots: Vec<Option<ImageRecord>> = vec![None; total];

        while let Some(joined) = tasks.join_next().await {
            let (index, tag, result) = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    cancel.cancel();
                    return Err(CudexError::task(format!("Inspection task failed: {}", e)));
                }
            };

            match result {
                Ok(record) => slots[index] = Some(record),
                Err(CudexError::Cancelled) => {}
                Err(err) => {
                    cancel.cancel();
                    warn!(%tag, error = %err, "catalog build aborted");
                    return Err(err);
                }
            }
        }

        let records = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| {
                    CudexError::task(format!("No record produced for tag at position {}", index))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(records = records.len(), "catalog built");
        Ok(records)
    }
}

async fn inspect_tag<I: ImageInspector + ?Sized>(
    inspector: &I,
    semaphore: &Semaphore,
    cancel: &CancellationToken,
    tag: &str,
) -> Result<ImageRecord> {
    // A malformed tag never reaches the registry
    parse_os_version(tag)?;

    let _permit = tokio::select! {
        _ = cancel.cancelled() => return Err(CudexError::Cancelled),
        permit = semaphore.acquire() => permit.map_err(|_| CudexError::Cancelled)?,
    };

    let env = tokio::select! {
        _ = cancel.cancelled() => return Err(CudexError::Cancelled),
        env = inspector.inspect(tag) => env?,
    };
    debug!(%tag, entries = env.len(), "inspected image");

    parse_image_record(tag, &env)
}

/// Picks the first devel record matching a toolkit version and, optionally,
/// a cuDNN major version.
///
/// The toolkit matches when it equals `toolkit` or extends it at a dot
/// boundary, so `11.8` selects `11.8.0` but not `11.80`.
///
/// # Examples
///
/// ```
/// use libcudex::catalog::select_base_image;
/// use libcudex::extract::ImageRecord;
///
/// let records = vec![ImageRecord {
///     tag: "11.8.0-cudnn8-devel-ubuntu22.04".to_string(),
///     is_devel: true,
///     os_version: "22.04".to_string(),
///     toolkit_version: "11.8.0".to_string(),
///     lib_version: "8".to_string(),
/// }];
///
/// assert!(select_base_image(&records, "11.8", Some("8")).is_some());
/// assert!(select_base_image(&records, "11.8", Some("9")).is_none());
/// ```
pub fn select_base_image<'a>(
    records: &'a [ImageRecord],
    toolkit: &str,
    lib: Option<&str>,
) -> Option<&'a ImageRecord> {
    records.iter().find(|record| {
        record.is_devel
            && toolkit_matches(&record.toolkit_version, toolkit)
            && lib.is_none_or(|lib| record.lib_version == lib)
    })
}

fn toolkit_matches(version: &str, requested: &str) -> bool {
    match version.strip_prefix(requested) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}
