//! Browser automation boundary
//!
//! The harness only needs a handful of operations from a browser: navigate, read the
//! current URL, look elements up by CSS class, read their text and click them. [`Browser`]
//! is that surface; [`webdriver::WebDriverClient`] implements it on top of `thirtyfour`.

pub mod webdriver;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

pub use webdriver::WebDriverClient;

/// Opaque reference to an element in the current page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef(pub String);

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Elements carrying a CSS class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    class: String,
}

impl Locator {
    pub fn class(name: impl Into<String>) -> Self {
        Self { class: name.into() }
    }

    /// W3C WebDriver dropped the "class name" strategy, so lookups go through CSS.
    pub fn css_selector(&self) -> String {
        format!(".{}", self.class)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.css_selector())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chrome,
    Firefox,
}

impl BrowserKind {
    pub fn name(&self) -> &'static str {
        match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::Firefox => "firefox",
        }
    }

    /// Driver executable that usually serves this browser.
    pub fn driver_binary(&self) -> &'static str {
        match self {
            BrowserKind::Chrome => "chromedriver",
            BrowserKind::Firefox => "geckodriver",
        }
    }
}

impl std::str::FromStr for BrowserKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chrome" | "chromium" => Ok(BrowserKind::Chrome),
            "firefox" => Ok(BrowserKind::Firefox),
            other => anyhow::bail!("Unsupported browser: {other} (expected chrome or firefox)"),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait Browser: Send + Sync {
    fn goto(&self, url: &str) -> Result<()>;

    fn current_url(&self) -> Result<String>;

    /// All elements matching `locator`, in document order.
    fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>>;

    /// Descendants of `parent` matching `locator`, in document order.
    fn find_child_elements(&self, parent: &ElementRef, locator: &Locator)
        -> Result<Vec<ElementRef>>;

    /// Rendered text of the element.
    fn text(&self, element: &ElementRef) -> Result<String>;

    fn click(&self, element: &ElementRef) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_locator_becomes_css() {
        assert_eq!(Locator::class("item_link").css_selector(), ".item_link");
        assert_eq!(Locator::class("sort_button").to_string(), ".sort_button");
    }

    #[test]
    fn test_browser_kind_parsing() {
        assert_eq!("Chrome".parse::<BrowserKind>().unwrap(), BrowserKind::Chrome);
        assert_eq!("chromium".parse::<BrowserKind>().unwrap(), BrowserKind::Chrome);
        assert_eq!("firefox".parse::<BrowserKind>().unwrap(), BrowserKind::Firefox);
        assert!("safari".parse::<BrowserKind>().is_err());
    }

    #[test]
    fn test_browser_kind_driver_binary() {
        assert_eq!(BrowserKind::Chrome.driver_binary(), "chromedriver");
        assert_eq!(BrowserKind::Firefox.driver_binary(), "geckodriver");
        assert_eq!(BrowserKind::default().name(), "chrome");
    }
}
