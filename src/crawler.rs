use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::extract::{parse_price, parse_review_count, ExtractionError};
use crate::models::Product;
use crate::session::{BrowserSession, SessionError};

pub const PRODUCT_TILE: &str = ".thumbnail";
pub const COOKIE_ACCEPT_BUTTON: &str = ".acceptCookies";
pub const LOAD_MORE_BUTTON: &str = ".ecomerce-items-scroll-more";

const TITLE_LINK: &str = ".caption > h4 > a";
const DESCRIPTION: &str = ".caption > .description";
const PRICE: &str = ".caption > .price";
const RATING_GLYPHS: &str = ".ratings > p:nth-of-type(2) > span";
const REVIEW_COUNT: &str = ".ratings > .review-count";

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("product #{index} on {url}")]
    Extraction {
        url: String,
        index: usize,
        #[source]
        source: ExtractionError,
    },

    #[error("failed to write {}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Where the load-more polling loop stands after one check
enum LoadMore<E> {
    Visible(E),
    AbsentOrHidden,
}

/// Turns catalog pages into product records over one browser session
pub struct PageScraper<'a, S: BrowserSession> {
    session: &'a S,
    load_more_delay: Duration,
    settle_delay: Duration,
    max_load_more_clicks: usize,
}

impl<'a, S: BrowserSession> PageScraper<'a, S> {
    pub fn new(session: &'a S, config: &ScraperConfig) -> Self {
        Self {
            session,
            load_more_delay: config.load_more_delay,
            settle_delay: config.settle_delay,
            max_load_more_clicks: config.max_load_more_clicks,
        }
    }

    pub fn open(&self, url: &str) -> Result<(), SessionError> {
        self.session.navigate(url)
    }

    /// Click the cookie consent button if the page shows one.
    ///
    /// Returns whether a click happened. A missing or hidden button is not an
    /// error; only a failing browser is.
    pub fn dismiss_cookie_banner(&self) -> Result<bool, SessionError> {
        let button = match self.session.find_element(COOKIE_ACCEPT_BUTTON) {
            Ok(button) => button,
            Err(e) if e.is_not_found() => {
                debug!("No cookie banner");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };
        match self.session.click(&button) {
            Ok(()) => Ok(true),
            Err(SessionError::ElementNotFound { .. } | SessionError::NotInteractable { .. }) => {
                debug!("Cookie banner present but not clickable, ignoring");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn check_load_more(&self) -> Result<LoadMore<S::Element>, SessionError> {
        let button = match self.session.find_element(LOAD_MORE_BUTTON) {
            Ok(button) => button,
            Err(e) if e.is_not_found() => return Ok(LoadMore::AbsentOrHidden),
            Err(e) => return Err(e),
        };
        match self.session.is_displayed(&button) {
            Ok(true) => Ok(LoadMore::Visible(button)),
            Ok(false) => Ok(LoadMore::AbsentOrHidden),
            // Detached between lookup and check
            Err(e) if e.is_not_found() => Ok(LoadMore::AbsentOrHidden),
            Err(e) => Err(e),
        }
    }

    /// Click "load more" until the control disappears or is hidden.
    ///
    /// Returns the number of clicks. Stops after `max_load_more_clicks` even if
    /// the control is still showing.
    pub async fn expand_all_products(&self) -> Result<usize, SessionError> {
        let mut clicks = 0;
        while let LoadMore::Visible(button) = self.check_load_more()? {
            if clicks >= self.max_load_more_clicks {
                warn!(
                    "⚠️ Load-more control still visible after {} clicks, extracting what is loaded",
                    clicks
                );
                break;
            }
            self.session.click(&button)?;
            clicks += 1;
            debug!("Clicked load more ({})", clicks);
            sleep(self.load_more_delay).await;
        }

        sleep(self.settle_delay).await;
        Ok(clicks)
    }

    /// Product tiles currently in the document, in document order
    pub fn collect_product_tiles(&self) -> Result<Vec<S::Element>, SessionError> {
        self.session.find_elements(PRODUCT_TILE)
    }

    fn required(&self, tile: &S::Element, field: &'static str, selector: &'static str) -> Result<S::Element, ExtractionError> {
        self.session.find_child(tile, selector).map_err(|e| match e {
            SessionError::ElementNotFound { .. } => ExtractionError::MissingElement { field, selector },
            other => ExtractionError::Session(other),
        })
    }

    pub fn parse_product(&self, tile: &S::Element) -> Result<Product, ExtractionError> {
        // The link text is truncated on the site; the full name lives in `title`.
        let link = self.required(tile, "title", TITLE_LINK)?;
        let title = match self.session.attribute(&link, "title")? {
            Some(title) if !title.trim().is_empty() => title,
            _ => self.session.text(&link)?,
        };
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(ExtractionError::EmptyField { field: "title" });
        }

        let description = self.required(tile, "description", DESCRIPTION)?;
        let description = self.session.text(&description)?.trim().to_string();

        let price = self.required(tile, "price", PRICE)?;
        let price = parse_price(&self.session.text(&price)?)?;

        let rating = self.session.find_children(tile, RATING_GLYPHS)?.len() as u32;

        let reviews = self.required(tile, "num_of_reviews", REVIEW_COUNT)?;
        let num_of_reviews = parse_review_count(&self.session.text(&reviews)?)?;

        Ok(Product {
            title,
            description,
            price,
            rating,
            num_of_reviews,
        })
    }

    /// Load `url`, expand it fully and parse every tile.
    ///
    /// One bad tile fails the whole page.
    pub async fn scrape_catalog_page(&self, url: &str) -> Result<Vec<Product>, ScrapeError> {
        info!("📄 Scraping {}", url);
        self.open(url)?;

        if self.dismiss_cookie_banner()? {
            info!("🍪 Accepted cookies");
        }

        let clicks = self.expand_all_products().await?;
        let tiles = self.collect_product_tiles()?;
        info!("Found {} product tiles after {} load-more clicks", tiles.len(), clicks);

        tiles
            .iter()
            .enumerate()
            .map(|(index, tile)| {
                self.parse_product(tile).map_err(|source| ScrapeError::Extraction {
                    url: url.to_string(),
                    index,
                    source,
                })
            })
            .collect()
    }
}
