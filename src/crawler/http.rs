//! Plain HTTP renderer
//!
//! Fetches pages with a single GET and no script execution. Useful for server-rendered
//! mirrors of the search pages and for fixtures. A body that lacks the results container
//! is treated the same way a browser that waited in vain would be: as a timeout.

use crate::config::{BrowserConfig, SelectorConfig};
use crate::crawler::fetcher::{FetchResult, PageRenderer, RenderedPage, SessionFactory};
use crate::{ConfigError, SessionError};
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

/// Builds an HTTP client for page fetches
///
/// The overall request timeout is the render timeout, so a server that never answers
/// behaves like a page that never renders.
pub fn build_http_client(config: &BrowserConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.render_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true if the document contains at least one element matching `selector`
fn has_results_container(markup: &str, selector: &Selector) -> bool {
    let document = Html::parse_document(markup);
    let found = document.select(selector).next().is_some();
    found
}

/// A page renderer that issues plain GET requests
pub struct HttpRenderer {
    client: Client,
    results_selector: Selector,
}

impl HttpRenderer {
    pub fn new(client: Client, results_selector: Selector) -> Self {
        Self {
            client,
            results_selector,
        }
    }
}

impl PageRenderer for HttpRenderer {
    async fn render(&mut self, url: &Url) -> FetchResult {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return FetchResult::Timeout,
            Err(e) => return FetchResult::failed(format!("request failed: {}", e)),
        };

        let status = response.status();
        if !status.is_success() {
            return FetchResult::failed(format!("HTTP {}", status.as_u16()));
        }

        let markup = match response.text().await {
            Ok(body) => body,
            Err(e) if e.is_timeout() => return FetchResult::Timeout,
            Err(e) => return FetchResult::failed(format!("reading body failed: {}", e)),
        };

        if !has_results_container(&markup, &self.results_selector) {
            return FetchResult::Timeout;
        }

        FetchResult::Rendered(RenderedPage {
            url: url.clone(),
            markup,
        })
    }

    async fn release(self) {
        tracing::debug!("HTTP session released");
    }
}

/// Starts HTTP sessions; every worker gets its own client
#[derive(Debug, Clone)]
pub struct HttpSessions {
    browser: BrowserConfig,
    results_selector: Selector,
}

impl HttpSessions {
    pub fn new(browser: BrowserConfig, selectors: &SelectorConfig) -> Result<Self, ConfigError> {
        let results_selector = Selector::parse(&selectors.results_container).map_err(|_| {
            ConfigError::InvalidSelector {
                name: "results-container",
                selector: selectors.results_container.clone(),
            }
        })?;

        Ok(Self {
            browser,
            results_selector,
        })
    }
}

impl SessionFactory for HttpSessions {
    type Renderer = HttpRenderer;

    async fn start(&self, worker: usize) -> Result<HttpRenderer, SessionError> {
        tracing::info!("Starting HTTP session {}", worker);
        let client = build_http_client(&self.browser)?;
        Ok(HttpRenderer::new(client, self.results_selector.clone()))
    }
}
