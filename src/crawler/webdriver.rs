//! Browser-backed renderer
//!
//! Drives a real browser through a WebDriver endpoint (chromedriver, geckodriver or a
//! Selenium grid). Each renderer owns one WebDriver session for its whole lifetime.

use crate::config::{BrowserConfig, SelectorConfig};
use crate::crawler::fetcher::{FetchResult, PageRenderer, RenderedPage, SessionFactory};
use crate::SessionError;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Map, Value};
use std::time::Duration;
use url::Url;

/// Builds the capabilities requested for every session
///
/// Browser arguments are passed to both Chrome and Firefox; each driver ignores the other's
/// options.
pub fn session_capabilities(config: &BrowserConfig) -> Map<String, Value> {
    let mut chrome_args = config.args.clone();
    let mut firefox_args = config.args.clone();
    if config.headless {
        chrome_args.push("--headless=new".to_string());
        firefox_args.push("-headless".to_string());
    }

    let mut caps = Map::new();
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": chrome_args }));
    caps.insert("moz:firefoxOptions".to_string(), json!({ "args": firefox_args }));
    caps
}

/// A page renderer backed by one WebDriver session
pub struct WebDriverRenderer {
    client: Client,
    results_selector: String,
    render_timeout: Duration,
}

impl WebDriverRenderer {
    /// Opens a new WebDriver session
    ///
    /// # Returns
    ///
    /// * `Ok(WebDriverRenderer)` - The browser is up and ready to navigate
    /// * `Err(SessionError)` - The endpoint refused or could not start a browser
    pub async fn connect(
        config: &BrowserConfig,
        selectors: &SelectorConfig,
    ) -> Result<Self, SessionError> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(session_capabilities(config));

        let client = builder
            .connect(&config.webdriver_url)
            .await
            .map_err(|e| SessionError::WebDriver {
                endpoint: config.webdriver_url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            results_selector: selectors.results_container.clone(),
            render_timeout: Duration::from_secs(config.render_timeout_secs),
        })
    }
}

impl PageRenderer for WebDriverRenderer {
    async fn render(&mut self, url: &Url) -> FetchResult {
        if let Err(e) = self.client.goto(url.as_str()).await {
            return FetchResult::failed(format!("navigation failed: {}", e));
        }

        let waited = self
            .client
            .wait()
            .at_most(self.render_timeout)
            .for_element(Locator::Css(&self.results_selector))
            .await;

        match waited {
            Ok(_) => {}
            Err(CmdError::WaitTimeout) => return FetchResult::Timeout,
            Err(e) => return FetchResult::failed(format!("waiting for results failed: {}", e)),
        }

        match self.client.source().await {
            Ok(markup) => FetchResult::Rendered(RenderedPage {
                url: url.clone(),
                markup,
            }),
            Err(e) => FetchResult::failed(format!("reading page source failed: {}", e)),
        }
    }

    async fn release(self) {
        if let Err(e) = self.client.close().await {
            tracing::warn!("Failed to close browser session: {}", e);
        } else {
            tracing::debug!("Browser session closed");
        }
    }
}

/// Starts one WebDriver session per worker
#[derive(Debug, Clone)]
pub struct WebDriverSessions {
    browser: BrowserConfig,
    selectors: SelectorConfig,
}

impl WebDriverSessions {
    pub fn new(browser: BrowserConfig, selectors: SelectorConfig) -> Self {
        Self { browser, selectors }
    }
}

impl SessionFactory for WebDriverSessions {
    type Renderer = WebDriverRenderer;

    async fn start(&self, worker: usize) -> Result<WebDriverRenderer, SessionError> {
        tracing::info!(
            "Starting browser session {} via {}",
            worker,
            self.browser.webdriver_url
        );
        WebDriverRenderer::connect(&self.browser, &self.selectors).await
    }
}
