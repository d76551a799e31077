//! The capability boundary between the scraper and whatever engine renders pages.
//!
//! Selectors that match nothing are reported as `Ok(None)` or an empty `Vec`.
//! Only engine or navigation failures are errors.

use std::time::Duration;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("browser driver error: {0}")]
    Driver(String),
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    type Browser: Browser;

    async fn launch(&self) -> Result<Self::Browser, SurfaceError>;
}

#[async_trait]
pub trait Browser: Send + Sync {
    type Page: Page;

    async fn new_page(&self) -> Result<Self::Page, SurfaceError>;

    async fn close(self) -> Result<(), SurfaceError>;
}

#[async_trait]
pub trait Page: Send + Sync {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), SurfaceError>;

    async fn fill_and_submit(&self, selector: &str, text: &str) -> Result<(), SurfaceError>;

    /// Value of `attribute` for every element matching `selector`, in document order.
    /// Elements without the attribute are left out.
    async fn attribute_all(
        &self,
        selector: &str,
        attribute: &str,
    ) -> Result<Vec<String>, SurfaceError>;

    async fn attribute_of(
        &self,
        selector: &str,
        attribute: &str,
    ) -> Result<Option<String>, SurfaceError>;

    async fn text_of(&self, selector: &str) -> Result<Option<String>, SurfaceError>;

    async fn title(&self) -> Result<String, SurfaceError>;

    async fn content(&self) -> Result<String, SurfaceError>;

    /// Scrolls the first element matching `container`, or the window when nothing matches.
    async fn scroll(&self, container: &str, delta: i64) -> Result<(), SurfaceError>;

    async fn close(self) -> Result<(), SurfaceError>;
}
