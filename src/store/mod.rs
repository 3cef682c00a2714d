//! Catalog state
//!
//! [`CatalogStore`] owns the canonical item list and derives the filtered
//! view from it. It also serves as the catalog lookup for recipe totals.

mod catalog;
mod filter;

pub use catalog::CatalogStore;
pub use filter::{FilterState, ViewFilter};
