pub mod browser;
pub mod core;
pub mod parser;
pub mod stats;
pub mod storage;

pub use browser::BrowserSession;
pub use crate::core::{Crawler, ScraperConfig, ScraperError, ScraperResult};
pub use parser::{Answer, Topic, TopicAnswerMap};
pub use stats::StatsTracker;
pub use storage::DiskStorage;
