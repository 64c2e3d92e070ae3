//! Pure listing logic
//!
//! Everything in here works on labels that were already read from the page, so it can be
//! exercised without a browser. Page access lives in [`crate::page`].

pub mod listing;
pub mod order;

pub use listing::{filter_labels, Item};
pub use order::{ExpectedOrder, OrderMismatch};

#[cfg(test)]
mod listing_proptest;
