use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use topicscraper::browser::ChromeOptions;
use topicscraper::core::config::{
    DEFAULT_BASE_URL, DEFAULT_COOKIE_DOMAIN, DEFAULT_QUERY, DEFAULT_SEARCH_TYPE,
};
use topicscraper::ScraperConfig;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "topicscraper", version)]
#[command(about = "Collects topic search results and their top answers with a headless browser")]
pub struct Args {
    /// Search query
    #[arg(short, long, default_value = DEFAULT_QUERY)]
    pub query: String,

    /// Search result type
    #[arg(long, default_value = DEFAULT_SEARCH_TYPE)]
    pub search_type: String,

    /// Site origin the search path is joined to
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: Url,

    /// Cookie header value (`name=value; name=value`) installed before navigating
    #[arg(long, env = "TOPICSCRAPER_COOKIE", default_value = "", hide_env_values = true)]
    pub cookie: String,

    /// Domain the cookies are scoped to
    #[arg(long, default_value = DEFAULT_COOKIE_DOMAIN)]
    pub cookie_domain: String,

    /// Directory for topic.json, top.json and screenshots
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub output: PathBuf,

    /// Path to a Chrome/Chromium binary
    #[arg(long, value_name = "PATH")]
    pub chrome_bin: Option<PathBuf>,

    /// Answer count a detail page must exceed before scrolling stops
    #[arg(long, default_value = "100")]
    pub threshold: usize,

    /// Maximum scroll passes per topic
    #[arg(long, default_value = "500")]
    pub max_passes: usize,

    /// Timeout for navigation and element waits, in seconds
    #[arg(short, long, default_value = "30", value_name = "SECS")]
    pub timeout: u64,

    /// Seed for pause and scroll jitter
    #[arg(long)]
    pub seed: Option<u64>,

    /// Indent the JSON outputs
    #[arg(long)]
    pub pretty: bool,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn scraper_config(&self) -> ScraperConfig {
        let timeout = Duration::from_secs(self.timeout.max(1));
        ScraperConfig::default()
            .with_base_url(self.base_url.clone())
            .with_query(self.query.clone())
            .with_search_type(self.search_type.clone())
            .with_cookie(self.cookie.clone())
            .with_cookie_domain(self.cookie_domain.clone())
            .with_answer_threshold(self.threshold)
            .with_max_scroll_passes(self.max_passes)
            .with_selector_timeout(timeout)
            .with_seed(self.seed)
    }

    pub fn chrome_options(&self) -> ChromeOptions {
        ChromeOptions {
            chrome_bin: self.chrome_bin.clone(),
            navigation_timeout: Duration::from_secs(self.timeout.max(1)),
            ..ChromeOptions::default()
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_built_in_config() {
        let args = Args::try_parse_from(["topicscraper"]).unwrap();
        let config = args.scraper_config();
        let defaults = ScraperConfig::default();

        assert_eq!(config.search_url().unwrap(), defaults.search_url().unwrap());
        assert_eq!(config.answer_threshold, 100);
        assert_eq!(config.cookie_domain, "www.zhihu.com");
        assert_eq!(args.output, PathBuf::from("."));
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "topicscraper",
            "--query",
            "rust",
            "--cookie",
            "a=1",
            "--threshold",
            "20",
            "--max-passes",
            "0",
            "--timeout",
            "5",
            "--seed",
            "11",
        ])
        .unwrap();
        let config = args.scraper_config();

        assert_eq!(config.query, "rust");
        assert_eq!(config.cookie, "a=1");
        assert_eq!(config.answer_threshold, 20);
        assert_eq!(config.max_scroll_passes, 1);
        assert_eq!(config.selector_timeout, Duration::from_secs(5));
        assert_eq!(config.seed, Some(11));
        assert_eq!(
            args.chrome_options().navigation_timeout,
            Duration::from_secs(5)
        );
    }
}
