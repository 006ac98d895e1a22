use crate::context::AppContext;
use crate::format;
use libcudex::{CudexError, ImageRecord};
use std::error::Error;
use tracing::info;

/// Catalog command handlers
pub mod catalog;

/// Base image selection
pub mod select;

/// Version command handlers
pub mod version;

/// Render an error with its source chain on one line
pub fn describe_error(err: &CudexError) -> String {
    let mut message = err.to_string();

    if let CudexError::Config {
        path: Some(path), ..
    } = err
    {
        message.push_str(&format!(" ({})", path));
    }

    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {}", cause));
        source = cause.source();
    }

    message
}

/// Build the catalog behind a spinner
pub async fn load_catalog(ctx: &AppContext) -> Result<Vec<ImageRecord>, String> {
    let cudex = ctx.cudex()?;
    if let Some(path) = &ctx.config_path {
        info!(path = %path.display(), "using config file");
    }

    let spinner = format::spinner(ctx, "Building CUDA image catalog...");
    let result = cudex.build_catalog().await;
    spinner.finish_and_clear();

    result.map_err(|e| describe_error(&e))
}
