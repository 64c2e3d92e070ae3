//! Shared test utilities
//!
//! A scripted stand-in for the notebook tree page plus helpers that build one from the
//! scenarios it should satisfy, so the runner can be tested without a browser.

#[cfg(any(test, debug_assertions))]
pub mod mocks;

#[cfg(any(test, debug_assertions))]
pub mod fixtures;
