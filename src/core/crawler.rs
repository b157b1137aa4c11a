use crate::browser::BrowserSession;
use crate::core::config::ScraperConfig;
use crate::core::pacing::Pacer;
use crate::parser::answer::{ANSWER_ITEM_SELECTOR, ANSWER_WAIT_SELECTOR};
use crate::parser::topic::CARD_WAIT_SELECTOR;
use crate::parser::{parse_answers, parse_cookie_string, parse_topics, Answer, Cookie};
use crate::parser::{Topic, TopicAnswerMap};
use crate::stats::StatsTracker;
use crate::storage::{StorageBackend, StorageCategory};
use crate::{ScraperError, ScraperResult};
use log::{debug, info, warn};
use std::path::PathBuf;
use tokio::time::{sleep, Instant};
use url::Url;

/// Outcome of one scroll-and-count pass over a detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Fewer answer items than the threshold are loaded.
    Partial(usize),
    Complete(Vec<Answer>),
}

impl Extraction {
    pub fn count(&self) -> usize {
        match self {
            Extraction::Partial(count) => *count,
            Extraction::Complete(answers) => answers.len(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TopicCrawl {
    pub topic_id: String,
    pub answers: Vec<Answer>,
    pub passes: usize,
    /// The pass limit was reached before the threshold was exceeded.
    pub exhausted: bool,
    /// The page opened above the threshold, so the loop never ran.
    pub preloaded: bool,
}

#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub topics: Vec<Topic>,
    pub answers: TopicAnswerMap,
    pub topics_path: PathBuf,
    pub answers_path: PathBuf,
}

pub struct Crawler {
    browser: Box<dyn BrowserSession>,
    storage: Box<dyn StorageBackend>,
    config: ScraperConfig,
    pacer: Pacer,
    stats: StatsTracker,
}

impl Crawler {
    pub fn new(
        browser: Box<dyn BrowserSession>,
        storage: Box<dyn StorageBackend>,
        config: ScraperConfig,
    ) -> Self {
        info!("Initializing crawler");
        let pacer = Pacer::new(config.seed);
        Self {
            browser,
            storage,
            config,
            pacer,
            stats: StatsTracker::new(),
        }
    }

    pub fn stats(&self) -> StatsTracker {
        self.stats.clone()
    }

    /// Runs every phase in order and closes the browser, whether or not a
    /// phase failed.
    pub async fn run(mut self) -> ScraperResult<CrawlReport> {
        let result = self.crawl().await;

        info!("Closing browser");
        let closed = self.browser.close().await;
        self.stats.finish();

        let report = result?;
        closed?;
        info!("Run complete");
        Ok(report)
    }

    async fn crawl(&self) -> ScraperResult<CrawlReport> {
        self.install_cookies().await?;

        let search_url = self.config.search_url()?;
        info!("Loading search page {}", search_url);
        self.load(&search_url, CARD_WAIT_SELECTOR).await?;

        self.progressive_scroll().await?;
        self.capture(StorageCategory::SearchScreenshot).await?;

        let topics = self.extract_topics().await?;
        let topics_path = self
            .storage
            .store_serialized(StorageCategory::Topics, &topics)
            .await?;
        info!("Saved {} topics to {}", topics.len(), topics_path.display());

        let mut crawled = Vec::with_capacity(topics.len());
        for (index, topic) in topics.iter().enumerate() {
            info!(
                "Crawling topic {}/{}: {} ({})",
                index + 1,
                topics.len(),
                topic.id,
                topic.title.trim()
            );
            crawled.push(self.crawl_topic(topic).await?);
        }

        let answers: TopicAnswerMap = crawled
            .into_iter()
            .map(|crawl| (crawl.topic_id, crawl.answers))
            .collect();
        let answers_path = self
            .storage
            .store_serialized(StorageCategory::Answers, &answers)
            .await?;
        info!(
            "Saved {} answers across {} topics to {}",
            answers.total_answers(),
            answers.len(),
            answers_path.display()
        );

        Ok(CrawlReport {
            topics,
            answers,
            topics_path,
            answers_path,
        })
    }

    async fn install_cookies(&self) -> ScraperResult<()> {
        let (installable, skipped): (Vec<Cookie>, Vec<Cookie>) =
            parse_cookie_string(&self.config.cookie, &self.config.cookie_domain)
                .into_iter()
                .partition(Cookie::is_installable);

        if !skipped.is_empty() {
            warn!("Skipping {} cookie entries without a name", skipped.len());
        }
        if !installable.is_empty() {
            self.browser.set_cookies(&installable).await?;
        }

        self.stats.record_cookies(installable.len(), skipped.len());
        info!(
            "Installed {} cookies for {}",
            installable.len(),
            self.config.cookie_domain
        );
        Ok(())
    }

    async fn load(&self, url: &Url, wait_selector: &str) -> ScraperResult<usize> {
        self.browser.navigate(url).await?;
        self.stats.record_page();
        self.wait_for_selector(wait_selector).await
    }

    /// Polls until `selector` matches at least one element.
    async fn wait_for_selector(&self, selector: &str) -> ScraperResult<usize> {
        let timeout = self.config.selector_timeout;
        let deadline = Instant::now() + timeout;

        loop {
            let count = self.browser.count(selector).await?;
            if count > 0 {
                debug!("Selector {} matched {} elements", selector, count);
                return Ok(count);
            }
            if Instant::now() >= deadline {
                return Err(ScraperError::TimeoutError {
                    what: format!("selector {}", selector),
                    after: timeout,
                });
            }
            sleep(self.config.poll_interval).await;
        }
    }

    async fn progressive_scroll(&self) -> ScraperResult<()> {
        for step in 0..self.config.scroll_steps {
            self.browser
                .scroll_to(step as f64 * self.config.scroll_step_px)
                .await?;
            self.pacer.pause(&self.config.scroll_pause, step).await;
        }
        Ok(())
    }

    async fn capture(&self, category: StorageCategory) -> ScraperResult<()> {
        let png = self.browser.screenshot().await?;
        let path = self.storage.store_bytes(category, &png).await?;
        self.stats.record_screenshot();
        debug!("Saved screenshot to {}", path.display());
        Ok(())
    }

    async fn extract_topics(&self) -> ScraperResult<Vec<Topic>> {
        let page_url = self.browser.current_url().await?;
        let html = self.browser.content().await?;
        let topics = parse_topics(&html, &page_url)?;

        self.stats.record_topics(topics.len());
        info!("Extracted {} topics", topics.len());
        if let Some(first) = topics.first() {
            debug!("First topic: {:?}", first);
        }
        Ok(topics)
    }

    async fn crawl_topic(&self, topic: &Topic) -> ScraperResult<TopicCrawl> {
        self.pacer.pause(&self.config.topic_pause, 0).await;

        let url = Url::parse(&topic.top.link)?;
        self.load(&url, ANSWER_WAIT_SELECTOR).await?;
        self.capture(StorageCategory::TopicScreenshot(topic.id.clone()))
            .await?;

        let initial = self.browser.count(ANSWER_ITEM_SELECTOR).await?;
        debug!("Topic {} starts with {} answer items", topic.id, initial);

        let crawl = self.collect_answers(&topic.id, initial).await?;
        if crawl.preloaded {
            self.stats.record_topic_preloaded(&topic.id);
        }
        self.stats.record_topic_crawled(
            crawl.answers.len(),
            crawl.exhausted.then_some(topic.id.as_str()),
        );
        Ok(crawl)
    }

    /// Scrolls until a pass yields more answers than the threshold, or the
    /// pass limit is reached. A page whose `initial` count is already above
    /// the threshold gets no pass and an empty answer list.
    pub async fn collect_answers(
        &self,
        topic_id: &str,
        initial: usize,
    ) -> ScraperResult<TopicCrawl> {
        let threshold = self.config.answer_threshold;
        let mut answers = Vec::new();
        let mut passes = 0;

        if initial > threshold {
            warn!(
                "Topic {} opened with {} answer items (threshold {}), storing no answers",
                topic_id, initial, threshold
            );
            return Ok(TopicCrawl {
                topic_id: topic_id.to_string(),
                answers,
                passes,
                exhausted: false,
                preloaded: true,
            });
        }

        loop {
            let extraction = self.extraction_pass().await?;
            passes += 1;
            self.stats.record_scroll_pass();

            let count = extraction.count();
            debug!("Topic {} pass {}: {} answer items", topic_id, passes, count);
            if let Extraction::Complete(list) = extraction {
                answers = list;
            }

            self.pacer.pause(&self.config.answer_pause, passes).await;

            if count > threshold {
                return Ok(TopicCrawl {
                    topic_id: topic_id.to_string(),
                    answers,
                    passes,
                    exhausted: false,
                    preloaded: false,
                });
            }

            if passes >= self.config.max_scroll_passes {
                warn!(
                    "Topic {} stopped after {} passes with {} answer items (threshold {})",
                    topic_id, passes, count, threshold
                );
                return Ok(TopicCrawl {
                    topic_id: topic_id.to_string(),
                    answers: self.extract_answers().await?,
                    passes,
                    exhausted: true,
                    preloaded: false,
                });
            }
        }
    }

    async fn extraction_pass(&self) -> ScraperResult<Extraction> {
        let offset = self.pacer.jitter_px(self.config.bottom_jitter_px);
        self.browser.scroll_to_bottom(offset).await?;

        let count = self.browser.count(ANSWER_ITEM_SELECTOR).await?;
        if count < self.config.answer_threshold {
            return Ok(Extraction::Partial(count));
        }
        Ok(Extraction::Complete(self.extract_answers().await?))
    }

    async fn extract_answers(&self) -> ScraperResult<Vec<Answer>> {
        let page_url = self.browser.current_url().await?;
        let html = self.browser.content().await?;
        parse_answers(&html, &page_url)
    }
}
