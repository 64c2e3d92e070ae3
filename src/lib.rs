//! Browser-driven checks of the notebook file-tree sort order.
//!
//! The harness opens the tree view of a running notebook server through WebDriver, clicks
//! its sort buttons, reads back the rendered order of a known set of file names and checks
//! it against the expected natural ordering.

pub mod config;
pub mod core;
pub mod doctor;
pub mod driver;
pub mod error;
pub mod logging;
pub mod page;
pub mod run;
pub mod scenario;
pub mod seed;
pub mod server;
pub mod test_utils;
pub mod wait;

pub use crate::core::{ExpectedOrder, Item, OrderMismatch};
pub use driver::{Browser, ElementRef, Locator};
pub use error::{HarnessError, PageError, Result};
pub use scenario::{builtin_scenarios, Harness, Scenario, SortKey, Step, SuiteReport};
