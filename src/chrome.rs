use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::protocol::cdp::DOM::NodeId;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::session::{BrowserSession, SessionError};

const COUNT_MATCHES_JS: &str = "function(selector) { return this.querySelectorAll(selector).length; }";

// Attached to the document and laid out with a visible style.
const IS_DISPLAYED_JS: &str = r#"
    function() {
        if (!this.isConnected) return false;
        const style = window.getComputedStyle(this);
        if (style.display === 'none' || style.visibility === 'hidden') return false;
        return this.offsetParent !== null || style.position === 'fixed';
    }
"#;

const GET_ATTRIBUTE_JS: &str = "function(name) { return this.getAttribute(name); }";

/// DOM node handle; re-bound to the tab whenever it is used
#[derive(Debug)]
pub struct ChromeNode {
    node_id: NodeId,
    selector: String,
}

/// One headless Chrome process with a single tab.
///
/// Dropping the session closes the tab and shuts Chrome down, so the browser is
/// released exactly once however the run ends.
pub struct ChromeSession {
    // Kept alive for the lifetime of the tab; dropping it kills the process.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSession {
    pub fn launch(config: &ScraperConfig) -> Result<Self, SessionError> {
        let mut args = vec![
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new("--disable-infobars"),
            OsStr::new("--window-position=0,0"),
        ];
        if config.headless {
            // Use modern headless mode
            args.push(OsStr::new("--headless=new"));
        }

        info!(
            "🌐 Launching Chrome (headless: {}, window: {}x{})",
            config.headless, config.window_size.0, config.window_size.1
        );
        let browser = Browser::new(LaunchOptions {
            headless: false, // headless is driven by the args above
            window_size: Some(config.window_size),
            idle_browser_timeout: Duration::from_secs(300),
            args,
            ..Default::default()
        })
        .map_err(|e| SessionError::Browser(format!("failed to launch Chrome: {}", e)))?;

        let tab = browser.new_tab().map_err(browser_error)?;
        tab.set_default_timeout(config.element_timeout);

        Ok(Self { _browser: browser, tab })
    }

    fn bind(&self, node: &ChromeNode) -> Result<Element<'_>, SessionError> {
        Element::new(&self.tab, node.node_id).map_err(|_| SessionError::not_found(&node.selector))
    }

    fn count_in_document(&self, selector: &str) -> Result<u64, SessionError> {
        let expression = format!("document.querySelectorAll({}).length", Value::from(selector));
        let result = self.tab.evaluate(&expression, false).map_err(browser_error)?;
        Ok(result.value.as_ref().and_then(Value::as_u64).unwrap_or(0))
    }

    fn call(&self, element: &Element<'_>, function: &str, args: Vec<Value>) -> Result<Option<Value>, SessionError> {
        element
            .call_js_fn(function, args, false)
            .map(|remote| remote.value)
            .map_err(browser_error)
    }
}

impl BrowserSession for ChromeSession {
    type Element = ChromeNode;

    fn navigate(&self, url: &str) -> Result<(), SessionError> {
        debug!("Navigating to: {}", url);
        let navigation_error = |e: anyhow::Error| SessionError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        };
        self.tab.navigate_to(url).map_err(navigation_error)?;
        self.tab.wait_until_navigated().map_err(navigation_error)?;
        Ok(())
    }

    fn find_elements(&self, selector: &str) -> Result<Vec<ChromeNode>, SessionError> {
        // The tab's own lookup errors on zero matches; an empty page is not an error here.
        if self.count_in_document(selector)? == 0 {
            return Ok(Vec::new());
        }
        let elements = self.tab.find_elements(selector).map_err(browser_error)?;
        Ok(elements
            .iter()
            .map(|el| ChromeNode {
                node_id: el.node_id,
                selector: selector.to_string(),
            })
            .collect())
    }

    fn find_children(&self, parent: &ChromeNode, selector: &str) -> Result<Vec<ChromeNode>, SessionError> {
        let element = self.bind(parent)?;
        let matches = self
            .call(&element, COUNT_MATCHES_JS, vec![json!(selector)])?
            .as_ref()
            .and_then(Value::as_u64)
            .unwrap_or(0);
        if matches == 0 {
            return Ok(Vec::new());
        }
        let children = element.find_elements(selector).map_err(browser_error)?;
        Ok(children
            .iter()
            .map(|el| ChromeNode {
                node_id: el.node_id,
                selector: format!("{} {}", parent.selector, selector),
            })
            .collect())
    }

    fn is_displayed(&self, node: &ChromeNode) -> Result<bool, SessionError> {
        let element = self.bind(node)?;
        let visible = self.call(&element, IS_DISPLAYED_JS, Vec::new())?;
        Ok(visible.as_ref().and_then(Value::as_bool).unwrap_or(false))
    }

    fn click(&self, node: &ChromeNode) -> Result<(), SessionError> {
        if !self.is_displayed(node)? {
            return Err(SessionError::NotInteractable {
                selector: node.selector.clone(),
            });
        }
        self.bind(node)?.click().map_err(browser_error)?;
        Ok(())
    }

    fn text(&self, node: &ChromeNode) -> Result<String, SessionError> {
        self.bind(node)?.get_inner_text().map_err(browser_error)
    }

    fn attribute(&self, node: &ChromeNode, name: &str) -> Result<Option<String>, SessionError> {
        let element = self.bind(node)?;
        match self.call(&element, GET_ATTRIBUTE_JS, vec![json!(name)])? {
            Some(Value::String(value)) => Ok(Some(value)),
            _ => Ok(None),
        }
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        info!("🧹 Closing browser session");
        if let Err(e) = self.tab.close(true) {
            warn!("Failed to close tab cleanly: {}", e);
        }
    }
}

fn browser_error(e: anyhow::Error) -> SessionError {
    SessionError::Browser(e.to_string())
}
