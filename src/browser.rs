use anyhow::Result;
use std::time::{Duration, Instant};
use thirtyfour::prelude::*;
use tokio::time::sleep;

use crate::config::Config;

/// Connect to a running chromedriver and open a browser session.
pub async fn connect(config: &Config) -> Result<WebDriver> {
    let mut caps = DesiredCapabilities::chrome();
    caps.set_no_sandbox()?;
    caps.set_disable_dev_shm_usage()?;
    caps.add_arg("--disable-blink-features=AutomationControlled")?;
    caps.add_arg("window-size=1920,1080")?;
    caps.add_arg(&format!("user-agent={}", config.user_agent))?;

    let driver = WebDriver::new(&config.webdriver_url, caps).await?;
    Ok(driver)
}

/// Poll until the element matching `css` exists and is displayed.
/// Returns `None` on timeout; WebDriver errors during polling count as
/// "not there yet".
pub async fn wait_for_visible(
    driver: &WebDriver,
    css: &str,
    timeout: Duration,
) -> Option<WebElement> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Ok(element) = driver.find(By::Css(css)).await {
            if element.is_displayed().await.unwrap_or(false) {
                return Some(element);
            }
        }
        if Instant::now() >= deadline {
            return None;
        }
        sleep(Duration::from_millis(250)).await;
    }
}
