use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub category_url: String,
    pub base_url: String,
    pub webdriver_url: String,
    pub user_agent: String,
    pub output_file: String,
    /// Caps how many product cards are visited.
    pub product_limit: usize,
    /// Pause between detail-panel visits.
    pub delay_seconds: u64,
    /// Extra lazy-load scroll passes inside the detail panel.
    pub scroll_rounds: u32,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Constants, not flags: edit here and rebuild.
        Ok(Config {
            category_url:
                "https://www.shufersal.co.il/online/he/קטגוריות/סופרמרקט/חלב-וביצים/c/A01"
                    .to_string(),
            base_url: "https://www.shufersal.co.il".to_string(),
            webdriver_url: "http://localhost:9515".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36".to_string(),
            output_file: "shufersal_final_modal.json".to_string(),
            product_limit: 10,
            delay_seconds: 5,
            scroll_rounds: 3,
        })
    }
}
