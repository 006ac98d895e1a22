//! Basic usage example for the cudex library.
//!
//! Lists the cuDNN-enabled `nvidia/cuda` tags on Docker Hub and prints the
//! versions found in the newest few images.
//!
//! Run with: cargo run --example basic_usage

use libcudex::{CatalogBuilder, Cudex, RegistryInspector};
use libcudex::client::Client;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Cudex Library - Basic Usage Example\n");

    let cudex = Cudex::new()?;
    let config = cudex.config();

    println!("Fetching candidate tags...");
    let candidates = match cudex.candidate_tags().await {
        Ok(tags) => tags,
        Err(e) => {
            eprintln!("✗ Failed to list tags: {}", e);
            return Ok(());
        }
    };
    println!("✓ Found {} candidate tags\n", candidates.len());

    // Inspect only a handful so the example stays quick
    let sample: Vec<String> = candidates.into_iter().take(5).collect();

    let client = Client::new(&config.registry.url, None)?;
    let inspector = RegistryInspector::new(
        client,
        &config.registry.image,
        config.registry.platform.parse()?,
    );

    let records = CatalogBuilder::new(inspector)
        .with_concurrency(2)
        .build(sample)
        .await?;

    for record in &records {
        println!(
            "  {:<40} cuda {:<8} cudnn {}",
            record.tag, record.toolkit_version, record.lib_version
        );
    }

    Ok(())
}
