use anyhow::Result;
use chrono::Local;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

mod browser;
mod catalog;
mod config;
mod extract;
mod models;
mod parsers;

use crate::catalog::CatalogWalker;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shufersal_scraper=info".parse()?),
        )
        .init();

    info!(
        "Starting Shufersal modal scraper at {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    // Load configuration
    let config = Arc::new(Config::load()?);

    // Connect to the WebDriver session
    let driver = browser::connect(&config).await?;

    let walker = CatalogWalker::new(config.clone());
    let result = walker.run(&driver).await;

    // Release the browser session even when the walk failed.
    driver.quit().await.ok();

    let products = result?;
    catalog::write_results(Path::new(&config.output_file), &products)?;

    Ok(())
}
