//! Bounded polling waits.

use std::thread;
use std::time::{Duration, Instant};

use crate::driver::{Browser, ElementRef, Locator};
use crate::error::Result;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitConfig {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }
}

/// Polls `probe` until it yields a value or the timeout elapses.
///
/// The probe always runs at least once. Errors from the probe end the wait immediately.
pub fn wait_until<T, F>(config: &WaitConfig, mut probe: F) -> Result<Option<T>>
where
    F: FnMut() -> Result<Option<T>>,
{
    let deadline = Instant::now() + config.timeout;
    loop {
        if let Some(value) = probe()? {
            return Ok(Some(value));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(config.poll_interval.min(deadline - now));
    }
}

/// Waits until at least one element matches `locator` and returns the matches.
pub fn wait_for_selector(
    browser: &dyn Browser,
    locator: &Locator,
    config: &WaitConfig,
) -> Result<Option<Vec<ElementRef>>> {
    wait_until(config, || {
        let found = browser.find_elements(locator)?;
        Ok((!found.is_empty()).then_some(found))
    })
}
