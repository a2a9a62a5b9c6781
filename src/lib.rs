pub mod aggregator;
pub mod archiver;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod models;
pub mod parser;
pub mod tree;

use std::path::Path;

use tracing::info;

pub use aggregator::{Aggregator, PageSource, collect_leaves};
pub use config::ScraperConfig;
pub use error::{FetchError, MalformedInputError, ScrapeError};
pub use fetcher::{FetchedPage, Fetcher};
pub use models::{PageOutcome, PageResult, ProductRecord, RunReport};
pub use parser::Extractor;
pub use tree::Node;

/// One full run: load the tree, scrape every leaf, write the report.
///
/// A malformed tree fails before any request is made and leaves `output`
/// untouched.
pub fn scrape_catalog<S: PageSource>(
    input: &Path,
    output: &Path,
    aggregator: &mut Aggregator<S>,
) -> error::Result<RunReport> {
    info!("Loading pages from {}", input.display());
    let root = archiver::load_tree(input)?;

    info!("Starting to scrape final pages");
    let report = aggregator.run(&root);

    info!("Saving results to {}", output.display());
    archiver::save_report(&report, output)?;

    Ok(report)
}
