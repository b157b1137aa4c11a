use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct ScrapingStats {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub pages_visited: usize,
    pub cookies_installed: usize,
    pub cookies_skipped: usize,
    pub topics_found: usize,
    pub topics_crawled: usize,
    pub topics_exhausted: Vec<String>,
    /// Topics whose page already held more answers than the threshold, so
    /// no scroll pass ran and an empty list was stored.
    pub topics_preloaded: Vec<String>,
    pub answers_collected: usize,
    pub scroll_passes: usize,
    pub screenshots: usize,
}

#[derive(Debug, Clone)]
pub struct StatsTracker {
    stats: Arc<RwLock<ScrapingStats>>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(RwLock::new(ScrapingStats {
                start_time: Utc::now(),
                end_time: None,
                pages_visited: 0,
                cookies_installed: 0,
                cookies_skipped: 0,
                topics_found: 0,
                topics_crawled: 0,
                topics_exhausted: Vec::new(),
                topics_preloaded: Vec::new(),
                answers_collected: 0,
                scroll_passes: 0,
                screenshots: 0,
            })),
        }
    }

    pub fn record_page(&self) {
        self.stats.write().pages_visited += 1;
    }

    pub fn record_cookies(&self, installed: usize, skipped: usize) {
        let mut stats = self.stats.write();
        stats.cookies_installed += installed;
        stats.cookies_skipped += skipped;
    }

    pub fn record_topics(&self, count: usize) {
        self.stats.write().topics_found += count;
    }

    pub fn record_scroll_pass(&self) {
        self.stats.write().scroll_passes += 1;
    }

    pub fn record_screenshot(&self) {
        self.stats.write().screenshots += 1;
    }

    pub fn record_topic_crawled(&self, answers: usize, exhausted_id: Option<&str>) {
        let mut stats = self.stats.write();
        stats.topics_crawled += 1;
        stats.answers_collected += answers;
        if let Some(id) = exhausted_id {
            stats.topics_exhausted.push(id.to_string());
        }
    }

    pub fn record_topic_preloaded(&self, id: &str) {
        self.stats.write().topics_preloaded.push(id.to_string());
    }

    pub fn finish(&self) {
        self.stats.write().end_time = Some(Utc::now());
    }

    pub fn get_stats(&self) -> ScrapingStats {
        self.stats.read().clone()
    }

    pub fn print_summary(&self) {
        let stats = self.stats.read();
        let duration = stats
            .end_time
            .unwrap_or_else(Utc::now)
            .signed_duration_since(stats.start_time);

        println!("\nScraping Statistics:");
        println!("===================");
        println!("Duration: {} seconds", duration.num_seconds());
        println!("Pages Visited: {}", stats.pages_visited);
        println!(
            "Cookies Installed: {} (skipped {})",
            stats.cookies_installed, stats.cookies_skipped
        );
        println!("Topics Found: {}", stats.topics_found);
        println!("Topics Crawled: {}", stats.topics_crawled);
        println!("Answers Collected: {}", stats.answers_collected);
        println!("Scroll Passes: {}", stats.scroll_passes);
        println!("Screenshots: {}", stats.screenshots);

        if !stats.topics_exhausted.is_empty() {
            println!("\nTopics stopped at the scroll pass limit:");
            for id in &stats.topics_exhausted {
                println!("  {}", id);
            }
        }

        if !stats.topics_preloaded.is_empty() {
            println!("\nTopics already above the answer threshold (stored empty):");
            for id in &stats.topics_preloaded {
                println!("  {}", id);
            }
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}
