use anyhow::Result;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::browser;
use crate::config::Config;
use crate::extract::extract_product;
use crate::models::{ExtractedProduct, PanelSnapshot};

const CARD_SELECTOR: &str = "li.miglog-prod";
const CARD_TRIGGER_SELECTOR: &str = "a.imgContainer[data-target='#productModal']";
const PANEL_VISIBLE_SELECTOR: &str = "#productModal.show, #productModal.in";
const CLOSE_BUTTON_SELECTOR: &str = "#productModal button.close";

/// Page-level scroll passes that force the listing to lazy-load its cards.
const LISTING_SCROLL_ROUNDS: u32 = 6;

const PANEL_TIMEOUT: Duration = Duration::from_secs(10);
const PANEL_SETTLE: Duration = Duration::from_millis(800);

const PANEL_SCROLL_JS: &str = r#"
    var body = document.querySelector('#productModal .modal-body')
        || document.querySelector('#productModal');
    if (body) { body.scrollBy(0, 600); }
"#;

/// Why a single catalog entry was skipped. Entry failures never abort the
/// walk; they are logged and the next card is visited.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("product card {0} is no longer present")]
    CardGone(usize),
    #[error("product card has no detail-panel trigger")]
    MissingTrigger,
    #[error("failed to open detail panel: {0}")]
    OpenFailed(WebDriverError),
    #[error("detail panel did not become visible within {0:?}")]
    PanelTimeout(Duration),
    #[error("failed to capture panel contents: {0}")]
    CaptureFailed(WebDriverError),
}

/// Walks the category listing one card at a time: open the detail panel,
/// hand a snapshot of it to the extractor, dismiss it, wait, repeat.
pub struct CatalogWalker {
    config: Arc<Config>,
}

impl CatalogWalker {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub async fn run(&self, driver: &WebDriver) -> Result<Vec<ExtractedProduct>> {
        info!("Opening category page: {}", self.config.category_url);
        driver.goto(&self.config.category_url).await?;
        sleep(Duration::from_secs(3)).await;

        // Scroll the listing so lazy cards materialize before counting.
        for _ in 0..LISTING_SCROLL_ROUNDS {
            driver.execute("window.scrollBy(0, 1500);", Vec::new()).await?;
            sleep(Duration::from_millis(500)).await;
        }

        let total = driver.find_all(By::Css(CARD_SELECTOR)).await?.len();
        info!("Found {} product cards", total);
        let limit = total.min(self.config.product_limit);

        let mut results = Vec::with_capacity(limit);
        for index in 0..limit {
            info!("[{}/{}] opening detail panel", index + 1, limit);
            match self.visit_entry(driver, index).await {
                Ok(product) => {
                    if product.title.is_empty() {
                        info!("Extracted product without a title");
                    } else {
                        info!("Extracted: {}", product.title);
                    }
                    results.push(product);
                }
                Err(e) => {
                    error!("Skipping entry {}: {}", index + 1, e);
                    self.dismiss_panel(driver).await;
                }
            }
            sleep(Duration::from_secs(self.config.delay_seconds)).await;
        }

        Ok(results)
    }

    async fn visit_entry(
        &self,
        driver: &WebDriver,
        index: usize,
    ) -> Result<ExtractedProduct, EntryError> {
        // Cards are re-queried every visit: opening and closing the panel
        // can invalidate element references held across entries.
        let cards = driver
            .find_all(By::Css(CARD_SELECTOR))
            .await
            .map_err(EntryError::OpenFailed)?;
        let card = cards.into_iter().nth(index).ok_or(EntryError::CardGone(index))?;

        let trigger = card
            .find(By::Css(CARD_TRIGGER_SELECTOR))
            .await
            .map_err(|_| EntryError::MissingTrigger)?;
        trigger
            .scroll_into_view()
            .await
            .map_err(EntryError::OpenFailed)?;
        trigger.click().await.map_err(EntryError::OpenFailed)?;

        let Some(panel) =
            browser::wait_for_visible(driver, PANEL_VISIBLE_SELECTOR, PANEL_TIMEOUT).await
        else {
            return Err(EntryError::PanelTimeout(PANEL_TIMEOUT));
        };
        sleep(PANEL_SETTLE).await;

        // Nudge the panel's scrollable body so lazy sections render before
        // the snapshot is taken.
        for _ in 0..self.config.scroll_rounds {
            if let Err(e) = driver.execute(PANEL_SCROLL_JS, Vec::new()).await {
                warn!("Panel scroll failed: {}", e);
                break;
            }
            sleep(Duration::from_millis(400)).await;
        }

        let snapshot = snapshot_panel(&panel)
            .await
            .map_err(EntryError::CaptureFailed)?;
        let product = extract_product(&snapshot, &self.config.base_url);

        self.dismiss_panel(driver).await;
        Ok(product)
    }

    /// Close the panel via its close control if present, else Escape.
    /// Best-effort: dismissal failures are swallowed so the walk continues.
    async fn dismiss_panel(&self, driver: &WebDriver) {
        let closed = match driver.find(By::Css(CLOSE_BUTTON_SELECTOR)).await {
            Ok(button) => button.click().await.is_ok(),
            Err(_) => false,
        };
        if !closed {
            if let Ok(body) = driver.find(By::Tag("body")).await {
                let _ = body.send_keys(Key::Escape + "").await;
            }
        }
        sleep(PANEL_SETTLE).await;
    }
}

async fn snapshot_panel(panel: &WebElement) -> Result<PanelSnapshot, WebDriverError> {
    let html = panel.outer_html().await?;
    // Text is best-effort: a failed read drops the text-derived fields but
    // not the whole entry.
    let text = panel.text().await.ok();
    Ok(PanelSnapshot { html, text })
}

/// Persist the run's ordered records as indented JSON. Non-ASCII text is
/// written literally, not escaped.
pub fn write_results(path: &Path, products: &[ExtractedProduct]) -> Result<()> {
    let json = serde_json::to_string_pretty(products)?;
    fs::write(path, json)?;
    info!("Saved {} products to {}", products.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn zero_entries_write_an_empty_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        write_results(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn hebrew_is_written_literally_not_escaped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        let product = ExtractedProduct {
            title: "חלב טרי".to_string(),
            ..Default::default()
        };
        write_results(&path, &[product]).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("חלב טרי"));
        assert!(contents.contains("שם המוצר"));
        assert!(!contents.contains("\\u"));
    }

    #[test]
    fn output_preserves_record_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        let first = ExtractedProduct {
            title: "ראשון".to_string(),
            ..Default::default()
        };
        let second = ExtractedProduct {
            title: "שני".to_string(),
            ..Default::default()
        };
        write_results(&path, &[first.clone(), second.clone()]).unwrap();

        let parsed: Vec<ExtractedProduct> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, vec![first, second]);
    }
}
