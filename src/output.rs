use std::path::{Path, PathBuf};

use csv::WriterBuilder;

use crate::models::{Product, PRODUCT_FIELDS};

/// `<dir>/<key>.csv`
pub fn output_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.csv", key))
}

/// Write `products` to `path` as CSV, replacing any existing file.
///
/// The header row is always written, so an empty page still yields a valid file.
pub fn write_products(path: &Path, products: &[Product]) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(PRODUCT_FIELDS)?;
    for product in products {
        writer.serialize(product)?;
    }
    writer.flush()?;
    Ok(())
}
