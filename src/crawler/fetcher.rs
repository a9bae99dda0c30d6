//! Page fetching abstraction
//!
//! The walker never talks to a browser directly. It asks a `PageRenderer` for a URL and
//! gets back one of three outcomes:
//! - the rendered markup
//! - a timeout (the results never appeared, an expected end-of-bracket signal)
//! - a failure (anything else, recorded and skipped)
//!
//! Renderers are created by a `SessionFactory`, one per worker. Creating a session is the
//! only step whose failure aborts a run.

use crate::SessionError;
use std::future::Future;
use url::Url;

/// Markup of a page whose results container rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// URL that was requested
    pub url: Url,
    /// Full rendered document
    pub markup: String,
}

/// Result of a render operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// The results container appeared; the page markup is attached
    Rendered(RenderedPage),

    /// The results container did not appear within the render timeout
    Timeout,

    /// Navigation or transport failed
    Failed {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    pub fn failed(error: impl ToString) -> Self {
        Self::Failed {
            error: error.to_string(),
        }
    }
}

/// A live page rendering session (one browser, one tab)
///
/// Sessions are used sequentially by a single worker; no method is ever called
/// concurrently on the same renderer.
pub trait PageRenderer {
    /// Navigates to `url` and waits for the search results to render
    fn render(&mut self, url: &Url) -> impl Future<Output = FetchResult>;

    /// Ends the session and frees the browser
    fn release(self) -> impl Future<Output = ()>
    where
        Self: Sized;
}

/// Starts page rendering sessions
pub trait SessionFactory {
    type Renderer: PageRenderer;

    /// Starts the session used by worker `worker`
    fn start(&self, worker: usize) -> impl Future<Output = Result<Self::Renderer, SessionError>>;
}
