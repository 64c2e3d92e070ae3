//! Scripted browser for runner tests
//!
//! [`ScriptedTreePage`] renders a fixed sequence of listings ("frames"): frame `k` is shown
//! after `k` sort clicks since the last navigation. Navigating resets to frame 0, like the
//! real page does on reload.

use std::sync::Mutex;

use crate::driver::{Browser, ElementRef, Locator};
use crate::error::{HarnessError, Result};
use crate::page::{ITEM_LINK_CLASS, ITEM_NAME_CLASS, SORT_BUTTON_CLASS};

#[derive(Debug, Default)]
struct PageState {
    url: String,
    frame: usize,
    clicks: Vec<usize>,
    navigations: Vec<String>,
}

pub struct ScriptedTreePage {
    frames: Vec<Vec<String>>,
    buttons: usize,
    state: Mutex<PageState>,
}

impl ScriptedTreePage {
    pub fn new<S: Into<String>>(frames: Vec<Vec<S>>) -> Self {
        Self {
            frames: frames
                .into_iter()
                .map(|f| f.into_iter().map(Into::into).collect())
                .collect(),
            buttons: 3,
            state: Mutex::new(PageState::default()),
        }
    }

    pub fn with_buttons(mut self, buttons: usize) -> Self {
        self.buttons = buttons;
        self
    }

    /// Indexes of the sort buttons clicked, in order.
    pub fn clicks(&self) -> Vec<usize> {
        self.lock().clicks.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.lock().navigations.clone()
    }

    /// Moves the page somewhere else without resetting the frame.
    pub fn set_url(&self, url: impl Into<String>) {
        self.lock().url = url.into();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PageState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn current_frame(&self) -> Vec<String> {
        let frame = self.lock().frame;
        self.frames
            .get(frame.min(self.frames.len().saturating_sub(1)))
            .cloned()
            .unwrap_or_default()
    }

    fn index_of(element: &ElementRef, prefix: &str) -> Result<usize> {
        element
            .0
            .strip_prefix(prefix)
            .and_then(|rest| rest.parse().ok())
            .ok_or_else(|| {
                HarnessError::webdriver("scripted page", format!("stale element {element}"))
            })
    }
}

impl Browser for ScriptedTreePage {
    fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.lock();
        state.url = url.to_string();
        state.frame = 0;
        state.navigations.push(url.to_string());
        Ok(())
    }

    fn current_url(&self) -> Result<String> {
        Ok(self.lock().url.clone())
    }

    fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>> {
        let selector = locator.css_selector();
        let (prefix, count) = if selector == format!(".{ITEM_LINK_CLASS}") {
            ("link-", self.current_frame().len())
        } else if selector == format!(".{SORT_BUTTON_CLASS}") {
            ("button-", self.buttons)
        } else {
            return Ok(vec![]);
        };
        Ok((0..count)
            .map(|i| ElementRef(format!("{prefix}{i}")))
            .collect())
    }

    fn find_child_elements(
        &self,
        parent: &ElementRef,
        locator: &Locator,
    ) -> Result<Vec<ElementRef>> {
        if locator.css_selector() != format!(".{ITEM_NAME_CLASS}") {
            return Ok(vec![]);
        }
        let index = Self::index_of(parent, "link-")?;
        Ok(vec![ElementRef(format!("name-{index}"))])
    }

    fn text(&self, element: &ElementRef) -> Result<String> {
        let index = Self::index_of(element, "name-")?;
        self.current_frame().get(index).cloned().ok_or_else(|| {
            HarnessError::webdriver("get element text", format!("stale element {element}"))
        })
    }

    fn click(&self, element: &ElementRef) -> Result<()> {
        let index = Self::index_of(element, "button-")?;
        let mut state = self.lock();
        state.clicks.push(index);
        state.frame += 1;
        Ok(())
    }
}
