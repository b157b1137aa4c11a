pub mod config;
mod crawler;
mod errors;
pub mod pacing;


pub use config::ScraperConfig;
pub use crawler::{CrawlReport, Crawler, Extraction, TopicCrawl};
pub use errors::{ScraperError, ScraperResult};
pub use pacing::{Pacer, PausePolicy};
