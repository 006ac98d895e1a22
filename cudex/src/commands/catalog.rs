use crate::context::AppContext;
use crate::format::{self, Formattable, OutputFormat};
use libcudex::ImageRecord;
use serde::Serialize;
use std::path::Path;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// One table row of the pretty catalog output
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct CatalogRow {
    #[tabled(rename = "TAG")]
    pub tag: String,
    #[tabled(rename = "CUDA")]
    pub cuda: String,
    #[tabled(rename = "CUDNN")]
    pub cudnn: String,
    #[tabled(rename = "UBUNTU")]
    pub ubuntu: String,
    #[tabled(rename = "DEVEL")]
    pub devel: String,
}

impl From<&ImageRecord> for CatalogRow {
    fn from(record: &ImageRecord) -> Self {
        Self {
            tag: record.tag.clone(),
            cuda: record.toolkit_version.clone(),
            cudnn: record.lib_version.clone(),
            ubuntu: record.os_version.clone(),
            devel: if record.is_devel { "yes" } else { "no" }.to_string(),
        }
    }
}

/// The whole catalog, serialized as a plain list of records
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct CatalogListing {
    records: Vec<ImageRecord>,
}

impl CatalogListing {
    pub fn new(records: Vec<ImageRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Formattable for CatalogListing {
    fn format_pretty(&self) -> String {
        let rows: Vec<CatalogRow> = self.records.iter().map(CatalogRow::from).collect();
        Table::new(rows).with(Style::empty()).to_string()
    }
}

/// Handle the catalog command
pub async fn handle_catalog(ctx: &AppContext, format: OutputFormat, output: Option<&Path>) {
    let records = match crate::commands::load_catalog(ctx).await {
        Ok(records) => records,
        Err(e) => {
            format::error(ctx, &e);
            std::process::exit(1);
        }
    };

    let listing = CatalogListing::new(records);
    if listing.is_empty() && format == OutputFormat::Pretty && output.is_none() {
        format::warning(ctx, "No images found.");
        return;
    }

    let rendered = match format::format_output(&listing, format) {
        Ok(rendered) => rendered,
        Err(e) => {
            format::error(ctx, &e);
            std::process::exit(1);
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = write_output(path, &rendered) {
                format::error(ctx, &e);
                std::process::exit(1);
            }
            format::success(
                ctx,
                &format!("Wrote {} images to {}", listing.len(), path.display()),
            );
        }
        None => println!("{}", rendered.trim_end()),
    }
}

/// Write rendered output to a file, ending with a newline
pub fn write_output(path: &Path, rendered: &str) -> Result<(), String> {
    let mut contents = rendered.trim_end().to_string();
    contents.push('\n');

    std::fs::write(path, contents)
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
