//! Data models for the marketplace.
//!
//! Defines the records persisted by the catalog and returned by the API.

mod category;
mod item;

pub use category::*;
pub use item::*;
