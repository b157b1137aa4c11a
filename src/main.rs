mod cli;

use anyhow::Context;
use topicscraper::browser::ChromeSession;
use topicscraper::{Crawler, DiskStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if args.verbose {
        "debug"
    } else {
        "info"
    }))
    .filter_module("selectors", log::LevelFilter::Warn)
    .filter_module("html5ever", log::LevelFilter::Error)
    .filter_module("chromiumoxide", log::LevelFilter::Warn)
    .init();

    let storage = DiskStorage::new(&args.output)
        .with_context(|| format!("cannot prepare output directory {}", args.output.display()))?
        .with_pretty(args.pretty);

    let browser = ChromeSession::launch(args.chrome_options())
        .await
        .context("failed to launch browser")?;

    let crawler = Crawler::new(
        Box::new(browser),
        Box::new(storage),
        args.scraper_config(),
    );
    let stats = crawler.stats();
    let result = crawler.run().await;

    stats.print_summary();
    let report = result.context("scrape aborted")?;
    log::info!(
        "Wrote {} and {}",
        report.topics_path.display(),
        report.answers_path.display()
    );
    Ok(())
}
