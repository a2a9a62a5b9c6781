use anyhow::{Context, Result};
use lowes_catalog_scraper::{Aggregator, Extractor, Fetcher, ScraperConfig, logging, scrape_catalog};
use tracing::{error, info};

fn main() -> Result<()> {
    let config = ScraperConfig::load().context("Failed to load configuration")?;
    let _guard = logging::init(&config.log_level, &config.log_file)?;

    let fetcher = Fetcher::from_config(&config)?;
    let extractor = Extractor::new(&config.origin)?;
    let mut aggregator = Aggregator::new(fetcher, extractor);

    let report = match scrape_catalog(&config.input, &config.output, &mut aggregator) {
        Ok(report) => report,
        Err(e) => {
            error!("Scraping aborted: {}", e);
            return Err(e.into());
        }
    };

    info!(
        "Scraping completed. Scraped {} pages ({} succeeded, {} failed).",
        report.total_pages,
        report.succeeded(),
        report.failed()
    );
    Ok(())
}
