use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use thirtyfour::prelude::*;
use thirtyfour::{Capabilities, ChromiumLikeCapabilities};
use tokio::runtime::Runtime;

use super::{Browser, BrowserKind, ElementRef, Locator};
use crate::error::{HarnessError, Result};
use crate::logging;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub browser: BrowserKind,
    pub headless: bool,
    pub args: Vec<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            browser: BrowserKind::Chrome,
            headless: true,
            args: Vec::new(),
        }
    }
}

impl SessionOptions {
    /// Command-line arguments handed to the browser, extra `args` last.
    pub fn browser_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        match self.browser {
            BrowserKind::Chrome => {
                args.push("--window-size=1280,1024".to_string());
                if self.headless {
                    args.push("--headless=new".to_string());
                    args.push("--no-sandbox".to_string());
                }
            }
            BrowserKind::Firefox => {
                if self.headless {
                    args.push("-headless".to_string());
                }
            }
        }
        args.extend(self.args.iter().cloned());
        args
    }

    pub fn capabilities(&self) -> Result<Capabilities> {
        let invalid = |e: WebDriverError| HarnessError::webdriver("new session", e.to_string());
        let args = self.browser_args();

        let caps: Capabilities = match self.browser {
            BrowserKind::Chrome => {
                let mut caps = DesiredCapabilities::chrome();
                for arg in &args {
                    caps.add_arg(arg).map_err(invalid)?;
                }
                caps.into()
            }
            BrowserKind::Firefox => {
                let mut caps = DesiredCapabilities::firefox();
                for arg in &args {
                    caps.add_arg(arg).map_err(invalid)?;
                }
                caps.into()
            }
        };
        Ok(caps)
    }
}

#[derive(Default)]
struct ElementCache {
    next: usize,
    elements: HashMap<String, WebElement>,
}

/// Blocking [`Browser`] over a `thirtyfour` session.
///
/// Each call drives the async client on a private current-thread runtime. Elements are
/// handed out as opaque ids that stay valid until the next navigation. The session is
/// closed on [`WebDriverClient::quit`] or, failing that, on drop.
pub struct WebDriverClient {
    runtime: Runtime,
    driver: Option<WebDriver>,
    cache: Mutex<ElementCache>,
}

impl WebDriverClient {
    /// Opens a new session against the driver listening at `endpoint`.
    pub fn connect(endpoint: &str, options: &SessionOptions, timeout: Duration) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| HarnessError::webdriver("new session", e.to_string()))?;
        let caps = options.capabilities()?;

        let started = Instant::now();
        let connected = runtime
            .block_on(async { tokio::time::timeout(timeout, WebDriver::new(endpoint, caps)).await });
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let driver = match connected {
            Ok(Ok(driver)) => driver,
            Ok(Err(e)) => {
                logging::log_webdriver_command("new session", false, elapsed_ms);
                return Err(HarnessError::webdriver("new session", e.to_string()));
            }
            Err(_) => {
                logging::log_webdriver_command("new session", false, elapsed_ms);
                return Err(HarnessError::webdriver(
                    "new session",
                    format!("no answer from {endpoint} within {timeout:?}"),
                ));
            }
        };
        logging::log_webdriver_command("new session", true, elapsed_ms);

        tracing::info!(
            endpoint = endpoint,
            browser = options.browser.name(),
            headless = options.headless,
            "WebDriver session started"
        );
        Ok(Self {
            runtime,
            driver: Some(driver),
            cache: Mutex::new(ElementCache::default()),
        })
    }

    /// Ends the session and reports whether the driver accepted it.
    pub fn quit(mut self) -> Result<()> {
        self.end_session()
    }

    fn end_session(&mut self) -> Result<()> {
        if let Some(driver) = self.driver.take() {
            self.run("delete session", driver.quit())?;
            tracing::info!("WebDriver session closed");
        }
        Ok(())
    }

    fn driver(&self) -> Result<&WebDriver> {
        self.driver
            .as_ref()
            .ok_or_else(|| HarnessError::webdriver("session", "session already closed"))
    }

    fn run<T, F>(&self, command: &str, future: F) -> Result<T>
    where
        F: Future<Output = WebDriverResult<T>>,
    {
        let started = Instant::now();
        let result = self.runtime.block_on(future);
        logging::log_webdriver_command(
            command,
            result.is_ok(),
            started.elapsed().as_millis() as u64,
        );
        result.map_err(|e| HarnessError::webdriver(command, e.to_string()))
    }

    fn lock_cache(&self) -> MutexGuard<'_, ElementCache> {
        match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn remember(&self, elements: Vec<WebElement>) -> Vec<ElementRef> {
        let mut cache = self.lock_cache();
        elements
            .into_iter()
            .map(|element| {
                let id = format!("e{}", cache.next);
                cache.next += 1;
                cache.elements.insert(id.clone(), element);
                ElementRef(id)
            })
            .collect()
    }

    fn element(&self, command: &str, element: &ElementRef) -> Result<WebElement> {
        self.lock_cache()
            .elements
            .get(&element.0)
            .cloned()
            .ok_or_else(|| HarnessError::webdriver(command, format!("stale element {element}")))
    }
}

impl Browser for WebDriverClient {
    fn goto(&self, url: &str) -> Result<()> {
        let driver = self.driver()?;
        self.run("navigate", driver.goto(url))?;
        self.lock_cache().elements.clear();
        Ok(())
    }

    fn current_url(&self) -> Result<String> {
        let driver = self.driver()?;
        let url = self.run("get current url", driver.current_url())?;
        Ok(url.to_string())
    }

    fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>> {
        let driver = self.driver()?;
        let selector = locator.css_selector();
        let found = self.run("find elements", driver.find_all(By::Css(selector.as_str())))?;
        Ok(self.remember(found))
    }

    fn find_child_elements(
        &self,
        parent: &ElementRef,
        locator: &Locator,
    ) -> Result<Vec<ElementRef>> {
        let command = "find elements from element";
        let parent = self.element(command, parent)?;
        let selector = locator.css_selector();
        let found = self.run(command, parent.find_all(By::Css(selector.as_str())))?;
        Ok(self.remember(found))
    }

    fn text(&self, element: &ElementRef) -> Result<String> {
        let element = self.element("get element text", element)?;
        self.run("get element text", element.text())
    }

    fn click(&self, element: &ElementRef) -> Result<()> {
        let element = self.element("element click", element)?;
        self.run("element click", element.click())
    }
}

impl Drop for WebDriverClient {
    fn drop(&mut self) {
        if let Err(e) = self.end_session() {
            tracing::warn!(error = %e, "Failed to close WebDriver session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrome_headless_args() {
        let args = SessionOptions::default().browser_args();
        assert_eq!(args[0], "--window-size=1280,1024");
        assert!(args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--no-sandbox".to_string()));
    }

    #[test]
    fn test_chrome_headed_args() {
        let options = SessionOptions {
            headless: false,
            ..SessionOptions::default()
        };
        assert_eq!(options.browser_args(), vec!["--window-size=1280,1024"]);
    }

    #[test]
    fn test_firefox_args_keep_extras_last() {
        let options = SessionOptions {
            browser: BrowserKind::Firefox,
            headless: true,
            args: vec!["-private".to_string()],
        };
        assert_eq!(options.browser_args(), vec!["-headless", "-private"]);
    }

    #[test]
    fn test_capabilities_build_for_both_browsers() {
        assert!(SessionOptions::default().capabilities().is_ok());

        let firefox = SessionOptions {
            browser: BrowserKind::Firefox,
            ..SessionOptions::default()
        };
        assert!(firefox.capabilities().is_ok());
    }

    #[test]
    fn test_connect_to_closed_port_is_webdriver_error() {
        let err = WebDriverClient::connect(
            "http://127.0.0.1:9",
            &SessionOptions::default(),
            Duration::from_secs(5),
        )
        .err()
        .unwrap();
        assert!(matches!(err, HarnessError::WebDriver { .. }));
        assert!(err.plain_message().contains("new session"));
    }
}
