//! In-memory [`BrowserSession`] for tests.
//!
//! Each URL maps to a list of HTML snapshots. Clicking the load-more control
//! moves the page to its next snapshot, the way the live page appends tiles.

use std::cell::RefCell;
use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};

use crate::session::{BrowserSession, SessionError};

pub const LOAD_MORE_CLASS: &str = "ecomerce-items-scroll-more";

#[derive(Debug, Clone)]
pub struct StaticElement {
    html: String,
    text: String,
    attributes: HashMap<String, String>,
    classes: Vec<String>,
    displayed: bool,
    selector: String,
}

impl StaticElement {
    fn capture(element: ElementRef<'_>, selector: &str, parent_displayed: bool) -> Self {
        let hidden = std::iter::once(element)
            .chain(element.ancestors().filter_map(ElementRef::wrap))
            .any(is_hidden);

        Self {
            html: element.html(),
            text: element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" "),
            attributes: element
                .value()
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            classes: element.value().classes().map(str::to_string).collect(),
            displayed: parent_displayed && !hidden,
            selector: selector.to_string(),
        }
    }
}

fn is_hidden(element: ElementRef<'_>) -> bool {
    let el = element.value();
    el.attr("hidden").is_some()
        || el.attr("style").map_or(false, |style| {
            let style: String = style.chars().filter(|c| !c.is_whitespace()).collect();
            style.contains("display:none") || style.contains("visibility:hidden")
        })
}

fn select(html: &Html, selector: &str, parent_displayed: bool) -> Result<Vec<StaticElement>, SessionError> {
    let parsed = Selector::parse(selector)
        .map_err(|e| SessionError::Browser(format!("invalid selector `{}`: {:?}", selector, e)))?;
    Ok(html
        .select(&parsed)
        .map(|el| StaticElement::capture(el, selector, parent_displayed))
        .collect())
}

#[derive(Default)]
pub struct StaticSession {
    pages: HashMap<String, Vec<String>>,
    current: RefCell<Option<(String, usize)>>,
    clicks: RefCell<Vec<String>>,
    detached: Vec<String>,
}

impl StaticSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `url`; `snapshots[0]` is what a fresh navigation shows.
    pub fn with_page(mut self, url: &str, snapshots: Vec<String>) -> Self {
        self.pages.insert(url.to_string(), snapshots);
        self
    }

    /// Elements found by `selector` vanish from the DOM before they can be inspected
    pub fn with_detached(mut self, selector: &str) -> Self {
        self.detached.push(selector.to_string());
        self
    }

    /// Selectors of every clicked element, in click order
    pub fn clicks(&self) -> Vec<String> {
        self.clicks.borrow().clone()
    }

    pub fn clicks_on(&self, selector: &str) -> usize {
        self.clicks.borrow().iter().filter(|s| s.as_str() == selector).count()
    }

    fn document(&self) -> Result<Html, SessionError> {
        let current = self.current.borrow();
        let (url, index) = current
            .as_ref()
            .ok_or_else(|| SessionError::Browser("no page loaded".to_string()))?;
        let snapshots = &self.pages[url];
        Ok(Html::parse_document(&snapshots[*index]))
    }
}

impl BrowserSession for StaticSession {
    type Element = StaticElement;

    fn navigate(&self, url: &str) -> Result<(), SessionError> {
        match self.pages.get(url) {
            Some(snapshots) if !snapshots.is_empty() => {
                *self.current.borrow_mut() = Some((url.to_string(), 0));
                Ok(())
            }
            _ => Err(SessionError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            }),
        }
    }

    fn find_elements(&self, selector: &str) -> Result<Vec<StaticElement>, SessionError> {
        select(&self.document()?, selector, true)
    }

    fn find_children(&self, parent: &StaticElement, selector: &str) -> Result<Vec<StaticElement>, SessionError> {
        select(&Html::parse_fragment(&parent.html), selector, parent.displayed)
    }

    fn is_displayed(&self, element: &StaticElement) -> Result<bool, SessionError> {
        if self.detached.contains(&element.selector) {
            return Err(SessionError::not_found(&element.selector));
        }
        Ok(element.displayed)
    }

    fn click(&self, element: &StaticElement) -> Result<(), SessionError> {
        if !element.displayed {
            return Err(SessionError::NotInteractable {
                selector: element.selector.clone(),
            });
        }
        self.clicks.borrow_mut().push(element.selector.clone());

        if element.classes.iter().any(|c| c == LOAD_MORE_CLASS) {
            let mut current = self.current.borrow_mut();
            if let Some((url, index)) = current.as_mut() {
                let last = self.pages[url.as_str()].len() - 1;
                *index = (*index + 1).min(last);
            }
        }
        Ok(())
    }

    fn text(&self, element: &StaticElement) -> Result<String, SessionError> {
        Ok(element.text.clone())
    }

    fn attribute(&self, element: &StaticElement, name: &str) -> Result<Option<String>, SessionError> {
        Ok(element.attributes.get(name).cloned())
    }
}

/// Markup of one product tile as served by the demo shop
pub struct Tile<'a> {
    pub title: &'a str,
    pub description: &'a str,
    /// Raw price label; `None` drops the price element
    pub price: Option<&'a str>,
    pub stars: usize,
    pub reviews: &'a str,
}

impl<'a> Tile<'a> {
    pub fn new(title: &'a str, price: &'a str, stars: usize, reviews: &'a str) -> Self {
        Self {
            title,
            description: "",
            price: Some(price),
            stars,
            reviews,
        }
    }

    pub fn html(&self) -> String {
        let price = self
            .price
            .map(|p| format!(r#"<h4 class="price float-end card-title pull-right">{}</h4>"#, p))
            .unwrap_or_default();
        let short_title: String = self.title.chars().take(16).collect();
        let stars = r#"<span class="ws-icon ws-icon-star"></span>"#.repeat(self.stars);
        format!(
            r#"<div class="col-md-4 col-xl-4 col-lg-4">
  <div class="card thumbnail">
    <div class="card-body">
      <img class="img-fluid card-img-top image img-responsive" alt="item" src="/images/test-sites/e-commerce/items/cart2.png">
      <div class="caption">
        {price}
        <h4><a href="/test-sites/e-commerce/more/product/1" class="title" title="{title}">{short_title}...</a></h4>
        <p class="description card-text">{description}</p>
      </div>
      <div class="ratings">
        <p class="review-count float-end">{reviews}</p>
        <p data-rating="{count}">{stars}</p>
      </div>
    </div>
  </div>
</div>"#,
            price = price,
            title = self.title,
            short_title = short_title,
            description = self.description,
            reviews = self.reviews,
            count = self.stars,
            stars = stars,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadMore {
    Absent,
    Visible,
    Hidden,
}

/// A full catalog page around `tiles`
pub fn page(tiles: &[Tile<'_>], cookie_banner: bool, load_more: LoadMore) -> String {
    let banner = if cookie_banner {
        r#"<div class="acceptContainer"><p>This website uses cookies</p><a class="acceptCookies" href="javascript:void(0)">Accept &amp; Continue</a></div>"#
    } else {
        ""
    };
    let button = match load_more {
        LoadMore::Absent => "",
        LoadMore::Visible => {
            r#"<a href="javascript:void(0)" class="btn btn-lg btn-block btn-primary ecomerce-items-scroll-more">More</a>"#
        }
        LoadMore::Hidden => {
            r#"<a href="javascript:void(0)" class="btn btn-lg btn-block btn-primary ecomerce-items-scroll-more" style="display: none;">More</a>"#
        }
    };
    let tiles: String = tiles.iter().map(Tile::html).collect();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><title>Web Scraper Test Sites</title></head>
<body>
  {banner}
  <div class="container test-site">
    <div class="row ecomerce-items ecomerce-items-more">{tiles}</div>
    {button}
  </div>
</body>
</html>"#,
        banner = banner,
        tiles = tiles,
        button = button,
    )
}
