use crate::parser::Cookie;
use crate::ScraperResult;
use async_trait::async_trait;
use url::Url;

/// A single browser page driven one operation at a time.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn set_cookies(&self, cookies: &[Cookie]) -> ScraperResult<()>;

    /// Loads `url` and returns once network activity has settled.
    async fn navigate(&self, url: &Url) -> ScraperResult<()>;

    async fn current_url(&self) -> ScraperResult<Url>;

    /// Number of elements currently matching `selector`.
    async fn count(&self, selector: &str) -> ScraperResult<usize>;

    async fn scroll_to(&self, y: f64) -> ScraperResult<()>;

    /// Scrolls to `document.body.scrollHeight - offset`.
    async fn scroll_to_bottom(&self, offset: f64) -> ScraperResult<()>;

    /// Serialized HTML of the current document.
    async fn content(&self) -> ScraperResult<String>;

    /// PNG capture of the viewport.
    async fn screenshot(&self) -> ScraperResult<Vec<u8>>;

    async fn close(&mut self) -> ScraperResult<()>;
}
