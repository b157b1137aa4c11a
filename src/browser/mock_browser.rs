use super::BrowserSession;
use crate::parser::{selector, Cookie};
use crate::{ScraperError, ScraperResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use scraper::Html;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

const BLANK_PAGE: &str = "<html><head></head><body></body></html>";
const MOCK_PNG: &[u8] = b"\x89PNG\r\n\x1a\nmock";

/// Successive HTML snapshots of one page. Each scroll to the bottom moves to
/// the next snapshot, staying on the last one once reached.
#[derive(Debug, Clone)]
pub struct MockPage {
    pub frames: Vec<String>,
}

#[derive(Debug, Default)]
struct MockState {
    pages: HashMap<String, MockPage>,
    current: Option<Url>,
    frame: usize,
    cookies: Vec<Cookie>,
    navigations: Vec<Url>,
    scrolls: Vec<f64>,
    bottom_offsets: Vec<f64>,
    screenshots: usize,
    closed: bool,
}

/// Scripted [`BrowserSession`]; clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MockBrowser {
    state: Arc<RwLock<MockState>>,
}

impl MockBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, frames: Vec<String>) -> Self {
        self.state
            .write()
            .pages
            .insert(url.to_string(), MockPage { frames });
        self
    }

    pub fn cookies(&self) -> Vec<Cookie> {
        self.state.read().cookies.clone()
    }

    pub fn navigations(&self) -> Vec<Url> {
        self.state.read().navigations.clone()
    }

    pub fn scrolls(&self) -> Vec<f64> {
        self.state.read().scrolls.clone()
    }

    pub fn bottom_scrolls(&self) -> usize {
        self.state.read().bottom_offsets.len()
    }

    /// Offsets passed to each scroll to the bottom, in call order.
    pub fn bottom_offsets(&self) -> Vec<f64> {
        self.state.read().bottom_offsets.clone()
    }

    pub fn screenshots(&self) -> usize {
        self.state.read().screenshots
    }

    pub fn is_closed(&self) -> bool {
        self.state.read().closed
    }

    fn current_frame(&self) -> String {
        let state = self.state.read();
        state
            .current
            .as_ref()
            .and_then(|url| state.pages.get(url.as_str()))
            .and_then(|page| {
                let last = page.frames.len().checked_sub(1)?;
                page.frames.get(state.frame.min(last)).cloned()
            })
            .unwrap_or_else(|| BLANK_PAGE.to_string())
    }

    fn ensure_open(&self) -> ScraperResult<()> {
        if self.state.read().closed {
            return Err(ScraperError::SessionError("browser already closed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserSession for MockBrowser {
    async fn set_cookies(&self, cookies: &[Cookie]) -> ScraperResult<()> {
        self.ensure_open()?;
        self.state.write().cookies.extend_from_slice(cookies);
        Ok(())
    }

    async fn navigate(&self, url: &Url) -> ScraperResult<()> {
        self.ensure_open()?;
        let mut state = self.state.write();
        state.current = Some(url.clone());
        state.frame = 0;
        state.navigations.push(url.clone());
        Ok(())
    }

    async fn current_url(&self) -> ScraperResult<Url> {
        self.ensure_open()?;
        Ok(self
            .state
            .read()
            .current
            .clone()
            .unwrap_or_else(|| Url::parse("about:blank").expect("about:blank parses")))
    }

    async fn count(&self, css: &str) -> ScraperResult<usize> {
        self.ensure_open()?;
        let html = self.current_frame();
        let selector = selector(css)?;
        let document = Html::parse_document(&html);
        Ok(document.select(&selector).count())
    }

    async fn scroll_to(&self, y: f64) -> ScraperResult<()> {
        self.ensure_open()?;
        self.state.write().scrolls.push(y);
        Ok(())
    }

    async fn scroll_to_bottom(&self, offset: f64) -> ScraperResult<()> {
        self.ensure_open()?;
        let mut state = self.state.write();
        state.bottom_offsets.push(offset);
        state.frame += 1;
        Ok(())
    }

    async fn content(&self) -> ScraperResult<String> {
        self.ensure_open()?;
        Ok(self.current_frame())
    }

    async fn screenshot(&self) -> ScraperResult<Vec<u8>> {
        self.ensure_open()?;
        self.state.write().screenshots += 1;
        Ok(MOCK_PNG.to_vec())
    }

    async fn close(&mut self) -> ScraperResult<()> {
        self.state.write().closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_frames_advance_on_bottom_scroll() {
        let url = "https://example.com/list";
        let browser = MockBrowser::new().with_page(
            url,
            vec![
                "<ul><li>a</li></ul>".to_string(),
                "<ul><li>a</li><li>b</li></ul>".to_string(),
            ],
        );

        browser.navigate(&Url::parse(url).unwrap()).await.unwrap();
        assert_eq!(browser.count("li").await.unwrap(), 1);
        browser.scroll_to_bottom(12.5).await.unwrap();
        assert_eq!(browser.count("li").await.unwrap(), 2);
        browser.scroll_to_bottom(0.0).await.unwrap();
        assert_eq!(browser.count("li").await.unwrap(), 2);
        assert_eq!(browser.bottom_scrolls(), 2);
        assert_eq!(browser.bottom_offsets(), vec![12.5, 0.0]);
    }

    #[tokio::test]
    async fn test_unknown_page_is_blank() {
        let browser = MockBrowser::new();
        browser
            .navigate(&Url::parse("https://example.com/missing").unwrap())
            .await
            .unwrap();
        assert_eq!(browser.count("div").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_closed_browser_rejects_calls() {
        let mut browser = MockBrowser::new();
        let observer = browser.clone();
        browser.close().await.unwrap();

        assert!(observer.is_closed());
        assert!(browser.screenshot().await.is_err());
    }
}
