//! CDP browser lifecycle and the page-backed text fetcher.
//!
//! Holds a single browser instance and page, launched lazily on first use or
//! attached to an already-running browser via a CDP URL.

use crate::error::FetchError;
use crate::fetch::{FetchResult, LocateStrategy, Target, TextFetcher};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::RwLock;

/// Configuration for the BrowserManager.
#[derive(Debug, Clone)]
pub struct BrowserManagerConfig {
    /// Custom Chrome/Edge binary path.
    pub browser_path: Option<String>,
    /// Connect to an already-running browser via CDP URL.
    pub cdp_url: Option<String>,
    /// Run headless (default: true).
    pub headless: bool,
    /// Browser window size.
    pub window_size: (u32, u32),
}

impl Default for BrowserManagerConfig {
    fn default() -> Self {
        Self {
            browser_path: None,
            cdp_url: None,
            headless: true,
            window_size: (1280, 720),
        }
    }
}

pub struct BrowserManager {
    browser: RwLock<Option<Browser>>,
    page: RwLock<Option<Page>>,
    config: BrowserManagerConfig,
}

impl BrowserManager {
    pub fn new(config: BrowserManagerConfig) -> Self {
        Self {
            browser: RwLock::new(None),
            page: RwLock::new(None),
            config,
        }
    }

    /// Ensure a browser is running, launching or connecting if needed.
    pub async fn ensure_browser(&self) -> Result<()> {
        {
            let guard = self.browser.read().await;
            if guard.is_some() {
                return Ok(());
            }
        }

        let mut browser_guard = self.browser.write().await;
        // Another task may have launched while we waited for the write lock
        if browser_guard.is_some() {
            return Ok(());
        }

        let (browser, mut handler) = if let Some(ref cdp_url) = self.config.cdp_url {
            Browser::connect(cdp_url)
                .await
                .with_context(|| format!("Failed to connect to browser at {}", cdp_url))?
        } else {
            let mut builder = BrowserConfig::builder();

            if let Some(ref path) = self.config.browser_path {
                builder = builder.chrome_executable(path);
            }

            if !self.config.headless {
                builder = builder.with_head();
            }

            builder = builder
                .window_size(self.config.window_size.0, self.config.window_size.1)
                .arg("--disable-dev-shm-usage")
                .arg("--remote-allow-origins=*");

            let config = builder.build().map_err(|e| anyhow::anyhow!("{}", e))?;

            Browser::launch(config)
                .await
                .context("Failed to launch browser")?
        };

        tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        tracing::info!(
            cdp_url = ?self.config.cdp_url,
            headless = self.config.headless,
            "Browser ready"
        );

        *browser_guard = Some(browser);
        Ok(())
    }

    /// Get or create the active page.
    pub async fn page(&self) -> Result<Page> {
        self.ensure_browser().await?;

        {
            let guard = self.page.read().await;
            if let Some(ref page) = *guard {
                return Ok(page.clone());
            }
        }

        let mut page_guard = self.page.write().await;
        if let Some(ref page) = *page_guard {
            return Ok(page.clone());
        }

        let browser_guard = self.browser.read().await;
        let browser = browser_guard.as_ref().context("Browser not initialized")?;

        let page = browser
            .new_page("about:blank")
            .await
            .context("Failed to create new page")?;

        *page_guard = Some(page.clone());
        Ok(page)
    }

    /// Close the browser if one was started. Safe to call more than once.
    pub async fn shutdown(&self) {
        self.page.write().await.take();

        let Some(mut browser) = self.browser.write().await.take() else {
            return;
        };
        if let Err(e) = browser.close().await {
            tracing::warn!(error = %e, "Failed to close browser");
        }
        if let Err(e) = browser.wait().await {
            tracing::debug!(error = %e, "Browser process did not exit cleanly");
        }
    }
}

#[async_trait]
impl TextFetcher for BrowserManager {
    async fn get_text(&self, target: &Target) -> Result<FetchResult, FetchError> {
        let page = self
            .page()
            .await
            .map_err(|e| FetchError::Browser(format!("{:#}", e)))?;

        let found = match target.strategy {
            LocateStrategy::Css => page.find_element(target.selector.as_str()).await,
            LocateStrategy::Xpath => page.find_xpath(target.selector.as_str()).await,
        };

        let element = match found {
            Ok(element) => element,
            Err(e) => {
                tracing::debug!(selector = %target.selector, strategy = %target.strategy, error = %e, "element not found");
                return Ok(FetchResult::unavailable());
            }
        };

        // A node detached between lookup and read counts as not found
        match element.inner_text().await {
            Ok(text) => Ok(FetchResult {
                status_ok: true,
                value: text,
            }),
            Err(e) => {
                tracing::debug!(selector = %target.selector, error = %e, "failed to read element text");
                Ok(FetchResult::unavailable())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrowserManagerConfig::default();
        assert!(config.headless);
        assert!(config.cdp_url.is_none());
        assert_eq!(config.window_size, (1280, 720));
    }

    #[tokio::test]
    async fn test_shutdown_without_browser_is_noop() {
        let manager = BrowserManager::new(BrowserManagerConfig::default());
        manager.shutdown().await;
        manager.shutdown().await;
    }
}
