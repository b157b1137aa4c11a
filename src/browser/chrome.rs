use super::scripts;
use super::BrowserSession;
use crate::parser::Cookie;
use crate::{ScraperError, ScraperResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use log::{debug, info, trace, warn};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;
use url::Url;

#[derive(Debug, Clone)]
pub struct ChromeOptions {
    pub chrome_bin: Option<PathBuf>,
    pub navigation_timeout: Duration,
    /// How long the resource count must stay flat before a page counts as settled.
    pub network_idle: Duration,
}

impl Default for ChromeOptions {
    fn default() -> Self {
        Self {
            chrome_bin: None,
            navigation_timeout: Duration::from_secs(30),
            network_idle: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkIdle {
    ok: bool,
    waited_ms: u64,
    resource_count: u64,
}

pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    options: ChromeOptions,
}

impl ChromeSession {
    pub async fn launch(options: ChromeOptions) -> ScraperResult<Self> {
        let chrome_binary = resolve_chrome_binary(options.chrome_bin.clone())?;
        info!("Using Chrome binary: {}", chrome_binary.display());

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_binary)
            .args(vec![
                "--no-sandbox",
                "--disable-setuid-sandbox",
                "--disable-dev-shm-usage",
                "--disable-gpu",
                "--no-first-run",
                "--disable-extensions",
            ])
            .build()
            .map_err(|e| ScraperError::SessionError(format!("invalid browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(config).await?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    trace!("CDP handler event error: {}", e);
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser,
            page,
            handler,
            options,
        })
    }

    async fn wait_for_network_idle(&self) -> ScraperResult<()> {
        let idle_ms = self.options.network_idle.as_millis() as u64;
        let timeout_ms = self.options.navigation_timeout.as_millis() as u64;
        let idle: NetworkIdle = self
            .page
            .evaluate(scripts::network_idle(idle_ms, timeout_ms))
            .await?
            .into_value()?;

        if idle.ok {
            debug!(
                "Network settled after {}ms ({} resources)",
                idle.waited_ms, idle.resource_count
            );
        } else {
            warn!(
                "Network still busy after {}ms ({} resources), continuing",
                idle.waited_ms, idle.resource_count
            );
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn set_cookies(&self, cookies: &[Cookie]) -> ScraperResult<()> {
        let params = cookies
            .iter()
            .map(|cookie| {
                CookieParam::builder()
                    .name(cookie.name.clone())
                    .value(cookie.value.clone())
                    .domain(cookie.domain.clone())
                    .build()
                    .map_err(|e| ScraperError::SessionError(format!("invalid cookie {}: {}", cookie.name, e)))
            })
            .collect::<ScraperResult<Vec<_>>>()?;

        self.page.set_cookies(params).await?;
        Ok(())
    }

    async fn navigate(&self, url: &Url) -> ScraperResult<()> {
        let timeout = self.options.navigation_timeout;
        time::timeout(timeout, self.page.goto(url.as_str()))
            .await
            .map_err(|_| ScraperError::TimeoutError {
                what: format!("navigation to {}", url),
                after: timeout,
            })??;
        self.wait_for_network_idle().await
    }

    async fn current_url(&self) -> ScraperResult<Url> {
        let url = self
            .page
            .url()
            .await?
            .ok_or_else(|| ScraperError::SessionError("page has no URL".to_string()))?;
        Ok(Url::parse(&url)?)
    }

    async fn count(&self, selector: &str) -> ScraperResult<usize> {
        Ok(self.page.evaluate(scripts::count(selector)).await?.into_value()?)
    }

    async fn scroll_to(&self, y: f64) -> ScraperResult<()> {
        self.page.evaluate(scripts::scroll_to(y)).await?;
        Ok(())
    }

    async fn scroll_to_bottom(&self, offset: f64) -> ScraperResult<()> {
        self.page.evaluate(scripts::scroll_to_bottom(offset)).await?;
        Ok(())
    }

    async fn content(&self) -> ScraperResult<String> {
        Ok(self.page.content().await?)
    }

    async fn screenshot(&self) -> ScraperResult<Vec<u8>> {
        Ok(self.page.screenshot(ScreenshotParams::builder().build()).await?)
    }

    async fn close(&mut self) -> ScraperResult<()> {
        self.browser.close().await?;
        if let Err(e) = self.browser.wait().await {
            debug!("Browser process did not exit cleanly: {}", e);
        }
        self.handler.abort();
        Ok(())
    }
}

/// Explicit path first, then `CHROME_BIN`/`CHROMIUM_BIN`, then `PATH`, then
/// the usual install locations.
pub fn resolve_chrome_binary(override_path: Option<PathBuf>) -> ScraperResult<PathBuf> {
    if let Some(path) = override_path {
        if path.is_file() {
            return Ok(path);
        }
        return Err(ScraperError::SessionError(format!(
            "Chrome/Chromium binary not found at {}",
            path.display()
        )));
    }

    for key in ["CHROME_BIN", "CHROMIUM_BIN"] {
        if let Ok(val) = env::var(key) {
            let candidate = PathBuf::from(val);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }

    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(path_var) = env::var_os("PATH") {
        for dir in env::split_paths(&path_var) {
            for name in CANDIDATE_NAMES {
                candidates.push(dir.join(name));
                if cfg!(windows) {
                    candidates.push(dir.join(format!("{}.exe", name)));
                }
            }
        }
    }
    candidates.extend(known_locations());

    candidates.into_iter().find(|p| p.is_file()).ok_or_else(|| {
        ScraperError::SessionError(
            "could not locate Chrome/Chromium; pass --chrome-bin or set CHROME_BIN".to_string(),
        )
    })
}

const CANDIDATE_NAMES: [&str; 5] = [
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
];

fn known_locations() -> Vec<PathBuf> {
    let paths: &[&str] = if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ]
    } else if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ]
    };
    paths.iter().map(PathBuf::from).collect()
}
