mod catalog;
mod chrome;
mod config;
mod crawler;
mod extract;
#[cfg(test)]
mod fixture;
mod models;
mod output;
mod pipeline;
mod session;

use anyhow::Context;
use dotenv::dotenv;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::catalog::CATALOG_PAGES;
use crate::chrome::ChromeSession;
use crate::config::ScraperConfig;
use crate::crawler::PageScraper;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = ScraperConfig::from_env();
    let run_id = Uuid::new_v4();

    run(&config)
        .instrument(info_span!("scrape_run", %run_id))
        .await
}

async fn run(config: &ScraperConfig) -> anyhow::Result<()> {
    info!("🚀 Scraping {} catalog pages into {}", CATALOG_PAGES.len(), config.output_dir.display());

    // Closes Chrome on drop
    let session = ChromeSession::launch(config).context("could not start the browser session")?;
    let scraper = PageScraper::new(&session, config);

    let summaries = pipeline::run(&scraper, &CATALOG_PAGES, &config.output_dir)
        .await
        .context("catalog scrape aborted")?;

    let total: usize = summaries.iter().map(|s| s.products).sum();
    for summary in &summaries {
        info!("{:>10}: {:>4} products -> {}", summary.key, summary.products, summary.path.display());
    }
    info!("✅ Done: {} products across {} files", total, summaries.len());
    Ok(())
}
