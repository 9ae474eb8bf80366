use serde::{Deserialize, Serialize};

/// Column order of the exported CSV files. Matches the field order of [`Product`].
pub const PRODUCT_FIELDS: [&str; 5] = ["title", "description", "price", "rating", "num_of_reviews"];

/// One listing on a catalog page
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    pub title: String,
    pub description: String,
    pub price: f64,
    /// Number of filled rating glyphs
    pub rating: u32,
    pub num_of_reviews: u32,
}
