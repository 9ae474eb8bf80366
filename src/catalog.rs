use once_cell::sync::Lazy;

pub const BASE_URL: &str = "https://webscraper.io/";

/// A catalog page and the key its CSV file is named after
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage {
    pub key: &'static str,
    pub url: String,
}

/// The six demo pages, in scrape order.
pub static CATALOG_PAGES: Lazy<Vec<CatalogPage>> = Lazy::new(|| {
    [
        ("home", "test-sites/e-commerce/more/"),
        ("computers", "test-sites/e-commerce/more/computers"),
        ("laptops", "test-sites/e-commerce/more/computers/laptops"),
        ("tablets", "test-sites/e-commerce/more/computers/tablets"),
        ("phones", "test-sites/e-commerce/more/phones"),
        ("touch", "test-sites/e-commerce/more/phones/touch"),
    ]
    .into_iter()
    .map(|(key, path)| CatalogPage {
        key,
        url: format!("{}{}", BASE_URL, path),
    })
    .collect()
});
