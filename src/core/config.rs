use crate::core::pacing::PausePolicy;
use crate::ScraperResult;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.zhihu.com";
pub const DEFAULT_QUERY: &str = "壁纸";
pub const DEFAULT_SEARCH_TYPE: &str = "topic";
pub const DEFAULT_COOKIE_DOMAIN: &str = "www.zhihu.com";

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: Url,
    pub query: String,
    pub search_type: String,
    pub cookie: String,
    pub cookie_domain: String,
    pub scroll_steps: usize,
    pub scroll_step_px: f64,
    pub scroll_pause: PausePolicy,
    pub topic_pause: PausePolicy,
    pub answer_pause: PausePolicy,
    pub bottom_jitter_px: f64,
    pub answer_threshold: usize,
    pub max_scroll_passes: usize,
    pub selector_timeout: Duration,
    pub poll_interval: Duration,
    pub seed: Option<u64>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            query: DEFAULT_QUERY.to_string(),
            search_type: DEFAULT_SEARCH_TYPE.to_string(),
            cookie: String::new(),
            cookie_domain: DEFAULT_COOKIE_DOMAIN.to_string(),
            scroll_steps: 3,
            scroll_step_px: 30.0,
            scroll_pause: PausePolicy::Linear {
                base: Duration::from_millis(50),
                step: Duration::from_millis(10),
            },
            topic_pause: PausePolicy::Fixed(Duration::from_millis(500)),
            answer_pause: PausePolicy::Jitter {
                base: Duration::from_millis(100),
                spread: Duration::from_millis(200),
            },
            bottom_jitter_px: 100.0,
            answer_threshold: 100,
            max_scroll_passes: 500,
            selector_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(100),
            seed: None,
        }
    }
}

impl ScraperConfig {
    /// `<base>/search?q=<query>&type=<search_type>`
    pub fn search_url(&self) -> ScraperResult<Url> {
        let mut url = self.base_url.join("/search")?;
        url.query_pairs_mut()
            .append_pair("q", &self.query)
            .append_pair("type", &self.search_type);
        Ok(url)
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_search_type(mut self, search_type: impl Into<String>) -> Self {
        self.search_type = search_type.into();
        self
    }

    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = cookie.into();
        self
    }

    pub fn with_cookie_domain(mut self, domain: impl Into<String>) -> Self {
        self.cookie_domain = domain.into();
        self
    }

    pub fn with_scroll_steps(mut self, steps: usize, step_px: f64) -> Self {
        self.scroll_steps = steps;
        self.scroll_step_px = step_px;
        self
    }

    pub fn with_scroll_pause(mut self, policy: PausePolicy) -> Self {
        self.scroll_pause = policy;
        self
    }

    pub fn with_topic_pause(mut self, policy: PausePolicy) -> Self {
        self.topic_pause = policy;
        self
    }

    pub fn with_answer_pause(mut self, policy: PausePolicy) -> Self {
        self.answer_pause = policy;
        self
    }

    pub fn with_bottom_jitter(mut self, max_px: f64) -> Self {
        self.bottom_jitter_px = max_px;
        self
    }

    pub fn with_answer_threshold(mut self, threshold: usize) -> Self {
        self.answer_threshold = threshold;
        self
    }

    pub fn with_max_scroll_passes(mut self, passes: usize) -> Self {
        self.max_scroll_passes = passes.max(1);
        self
    }

    pub fn with_selector_timeout(mut self, timeout: Duration) -> Self {
        self.selector_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_search_url_matches_encoded_query() {
        let url = ScraperConfig::default().search_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.zhihu.com/search?q=%E5%A3%81%E7%BA%B8&type=topic"
        );
    }

    #[test]
    fn test_search_url_with_custom_query() {
        let config = ScraperConfig::default()
            .with_base_url(Url::parse("http://localhost:8080/").unwrap())
            .with_query("rust lang")
            .with_search_type("content");
        assert_eq!(
            config.search_url().unwrap().as_str(),
            "http://localhost:8080/search?q=rust+lang&type=content"
        );
    }

    #[test]
    fn test_max_scroll_passes_never_zero() {
        let config = ScraperConfig::default().with_max_scroll_passes(0);
        assert_eq!(config.max_scroll_passes, 1);
    }
}
