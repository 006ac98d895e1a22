use crate::context::AppContext;
use crate::format::{self, Formattable, OutputFormat};
use libcudex::{ImageRecord, select_base_image};
use serde::Serialize;

/// The chosen base image
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedImage {
    /// Full reference, ready for a `FROM` line
    pub image: String,
    #[serde(flatten)]
    pub record: ImageRecord,
}

impl SelectedImage {
    pub fn new(image: &str, record: ImageRecord) -> Self {
        Self {
            image: record.image_ref(image),
            record,
        }
    }
}

impl Formattable for SelectedImage {
    fn format_pretty(&self) -> String {
        self.image.clone()
    }
}

/// Describe what was asked for, for the no-match message
pub fn describe_request(cuda: &str, cudnn: Option<&str>) -> String {
    match cudnn {
        Some(cudnn) => format!("CUDA {} with cuDNN {}", cuda, cudnn),
        None => format!("CUDA {}", cuda),
    }
}

/// Handle the select command
pub async fn handle_select(
    ctx: &AppContext,
    cuda: &str,
    cudnn: Option<&str>,
    format: OutputFormat,
) {
    let records = match crate::commands::load_catalog(ctx).await {
        Ok(records) => records,
        Err(e) => {
            format::error(ctx, &e);
            std::process::exit(1);
        }
    };

    let record = match select_base_image(&records, cuda, cudnn) {
        Some(record) => record.clone(),
        None => {
            format::error(
                ctx,
                &format!(
                    "No devel image found for {} among {} catalog entries",
                    describe_request(cuda, cudnn),
                    records.len()
                ),
            );
            std::process::exit(1);
        }
    };

    let selected = SelectedImage::new(&ctx.config.registry.image, record);
    match format::format_output(&selected, format) {
        Ok(rendered) => println!("{}", rendered.trim_end()),
        Err(e) => {
            format::error(ctx, &e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
#[path = "select_tests.rs"]
mod tests;
