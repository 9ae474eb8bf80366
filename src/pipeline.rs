use std::path::{Path, PathBuf};

use tracing::info;

use crate::catalog::CatalogPage;
use crate::crawler::{PageScraper, ScrapeError};
use crate::output::{output_path, write_products};
use crate::session::BrowserSession;

/// What one catalog page produced
#[derive(Debug, Clone)]
pub struct PageSummary {
    pub key: &'static str,
    pub path: PathBuf,
    pub products: usize,
}

/// Scrape every page in order and write `<key>.csv` for each.
///
/// Stops at the first failure. Pages already written stay on disk; the failing
/// page gets no file.
pub async fn run<S: BrowserSession>(
    scraper: &PageScraper<'_, S>,
    pages: &[CatalogPage],
    output_dir: &Path,
) -> Result<Vec<PageSummary>, ScrapeError> {
    let mut summaries = Vec::with_capacity(pages.len());

    for page in pages {
        let products = scraper.scrape_catalog_page(&page.url).await?;

        let path = output_path(output_dir, page.key);
        write_products(&path, &products).map_err(|source| ScrapeError::Output {
            path: path.clone(),
            source,
        })?;
        info!("💾 [{}] {} products saved to {}", page.key, products.len(), path.display());

        summaries.push(PageSummary {
            key: page.key,
            path,
            products: products.len(),
        });
    }

    Ok(summaries)
}
