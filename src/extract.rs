use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::session::SessionError;

static REVIEW_COUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(\d+)\s*reviews?$").unwrap());

/// Why a product tile could not be turned into a complete record
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("missing {field} element `{selector}`")]
    MissingElement {
        field: &'static str,
        selector: &'static str,
    },

    #[error("{field} is empty")]
    EmptyField { field: &'static str },

    #[error("cannot parse {field} from {raw:?}")]
    InvalidNumber { field: &'static str, raw: String },

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Parse a currency label such as `$1139.54`.
pub fn parse_price(raw: &str) -> Result<f64, ExtractionError> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    match cleaned.trim().parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(ExtractionError::InvalidNumber {
            field: "price",
            raw: raw.to_string(),
        }),
    }
}

/// Parse a `"<N> reviews"` label.
pub fn parse_review_count(raw: &str) -> Result<u32, ExtractionError> {
    REVIEW_COUNT_RE
        .captures(raw.trim())
        .and_then(|caps| caps[1].parse().ok())
        .ok_or_else(|| ExtractionError::InvalidNumber {
            field: "num_of_reviews",
            raw: raw.to_string(),
        })
}
