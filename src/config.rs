use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Runtime settings for a scrape run.
///
/// Defaults reproduce the stock behaviour: headless Chrome, one second between
/// "load more" clicks, CSV files in the working directory.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Run Chrome without a visible window
    pub headless: bool,
    pub window_size: (u32, u32),
    /// Default timeout for navigation and element lookups in the browser
    pub element_timeout: Duration,
    /// Pause after each "load more" click
    pub load_more_delay: Duration,
    /// Pause once the page is fully expanded, before tiles are collected
    pub settle_delay: Duration,
    /// Upper bound on "load more" clicks per page
    pub max_load_more_clicks: usize,
    /// Directory receiving `<key>.csv`
    pub output_dir: PathBuf,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_size: (1920, 1080),
            element_timeout: Duration::from_secs(20),
            load_more_delay: Duration::from_millis(1000),
            settle_delay: Duration::from_millis(1000),
            max_load_more_clicks: 200,
            output_dir: PathBuf::from("."),
        }
    }
}

impl ScraperConfig {
    /// Build the config from `SCRAPER_*` environment variables.
    /// Missing or unparsable values keep their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |name: &str| lookup(name).and_then(|raw| raw.trim().parse::<u64>().ok());

        Self {
            headless: lookup("SCRAPER_HEADLESS")
                .and_then(|raw| parse_bool(&raw))
                .unwrap_or(defaults.headless),
            window_size: (
                parse_or(&lookup, "SCRAPER_WINDOW_WIDTH", defaults.window_size.0),
                parse_or(&lookup, "SCRAPER_WINDOW_HEIGHT", defaults.window_size.1),
            ),
            element_timeout: parsed("SCRAPER_ELEMENT_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.element_timeout),
            load_more_delay: parsed("SCRAPER_LOAD_MORE_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.load_more_delay),
            settle_delay: parsed("SCRAPER_SETTLE_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.settle_delay),
            max_load_more_clicks: parse_or(&lookup, "SCRAPER_MAX_LOAD_MORE_CLICKS", defaults.max_load_more_clicks),
            output_dir: lookup("SCRAPER_OUTPUT_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T {
    lookup(name)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
