//! Backend abstraction layer.
//!
//! The stores and gateways talk to the server only through these traits:
//! - `HttpBackend` for the REST API (feature `client`)
//! - `MockBackend` for tests and offline use

pub mod mock;
pub mod traits;

#[cfg(feature = "client")]
pub mod http;

#[cfg(feature = "client")]
pub use http::HttpBackend;
pub use mock::{MockBackend, MockFailure};
pub use traits::{CatalogBackend, NutritionBackend, RecipeBackend};
