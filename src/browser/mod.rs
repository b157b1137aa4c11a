pub mod chrome;
pub mod mock_browser;
pub mod scripts;

mod session;

pub use chrome::{ChromeOptions, ChromeSession};
pub use mock_browser::MockBrowser;
pub use session::BrowserSession;
