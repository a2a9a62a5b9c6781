use tracing::{error, info, warn};

use crate::error::FetchError;
use crate::fetcher::{FetchedPage, Fetcher};
use crate::models::{PageResult, RunReport};
use crate::parser::Extractor;
use crate::tree::{Node, is_leaf};

/// Where listing HTML comes from.
pub trait PageSource {
    fn fetch(&mut self, url: &str) -> Result<FetchedPage, FetchError>;
}

impl PageSource for Fetcher {
    fn fetch(&mut self, url: &str) -> Result<FetchedPage, FetchError> {
        Fetcher::fetch(self, url)
    }
}

/// Depth-first, pre-order list of the leaves under `root`, in document order.
pub fn collect_leaves(root: &Node) -> Vec<&Node> {
    let mut leaves = Vec::new();
    collect_into(root, &mut leaves);
    leaves
}

fn collect_into<'a>(node: &'a Node, leaves: &mut Vec<&'a Node>) {
    if is_leaf(node) {
        leaves.push(node);
        return;
    }
    for child in &node.children {
        info!("Entering subpage with category: {}", child.name);
        collect_into(child, leaves);
    }
}

pub struct Aggregator<S> {
    source: S,
    extractor: Extractor,
}

impl<S: PageSource> Aggregator<S> {
    pub fn new(source: S, extractor: Extractor) -> Self {
        Self { source, extractor }
    }

    /// Scrapes every leaf in order. A leaf that fails is recorded with its
    /// error and the run moves on.
    pub fn run(&mut self, root: &Node) -> RunReport {
        let leaves = collect_leaves(root);
        info!("Found {} final pages to scrape", leaves.len());
        self.scrape_leaves(&leaves)
    }

    pub fn scrape_leaves(&mut self, leaves: &[&Node]) -> RunReport {
        let mut results = Vec::with_capacity(leaves.len());
        for leaf in leaves {
            results.push(self.scrape_page(leaf));
        }

        let report = RunReport::new(leaves.len(), results);
        if report.failed() > 0 {
            warn!(
                "{} of {} pages failed to scrape",
                report.failed(),
                report.total_pages
            );
        }
        report
    }

    pub fn scrape_page(&mut self, page: &Node) -> PageResult {
        info!("Scraping page: {} - {}", page.name, page.url);

        match self.source.fetch(&page.url) {
            Ok(fetched) => {
                let products = self.extractor.extract(&fetched.html);
                info!(
                    "Extracted {} products from {} (HTTP {})",
                    products.len(),
                    page.name,
                    fetched.status
                );
                PageResult::success(&page.name, &page.url, products)
            }
            Err(e) => {
                error!("Error scraping {}: {}", page.url, e);
                PageResult::failure(&page.name, &page.url, e.message)
            }
        }
    }

    pub fn into_source(self) -> S {
        self.source
    }
}
