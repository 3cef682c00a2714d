//! Recipe nutrient aggregation
//!
//! Turns an ingredient list and a serving count into per-serving totals,
//! reading per-100 g values from a catalog lookup.

mod aggregate;

pub use aggregate::{per_serving_totals, CatalogIndex, CatalogLookup, CatalogSource, REFERENCE_QUANTITY};
