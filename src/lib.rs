//! Nutrition SDK - diet and fitness client library
//!
//! Client-side state and orchestration for a diet/fitness REST API:
//! a food catalog with search and category views, recipe drafting with
//! live per-serving nutrient totals, and calorie/meal-plan requests.
//!
//! # Architecture
//!
//! - **nutrients**: pure per-serving aggregation over a catalog lookup
//! - **store**: canonical catalog list plus a derived filtered view
//! - **gateway**: auth-gated operations with shared loading/error state
//! - **draft**: recipe form with debounced recomputation
//! - **backend**: REST adapter (feature `client`) and an in-memory mock
//!
//! # Example
//!
//! ```rust,ignore
//! use nutrition_sdk::{ClientConfig, NutritionClient, SessionHandle};
//! use std::sync::Arc;
//!
//! let session = SessionHandle::default();
//! let client = NutritionClient::new(ClientConfig::from_file("nutrition.toml")?, Arc::new(session.clone()))?;
//!
//! client.catalog().fetch_all().await;
//! client.catalog().search("oat").await;
//!
//! let mut form = client.recipe_form();
//! form.select_item(0, client.catalog().get(7).await.as_ref());
//! form.set_quantity(0, 80.0);
//!
//! session.sign_in(42);
//! let saved = form.submit(client.recipes()).await;
//! ```

// Backend adapters
pub mod backend;

// Client facade
mod client;

// Configuration
pub mod config;

// Recipe drafting
pub mod draft;

// Error types
pub mod error;

// Auth-gated operations
pub mod gateway;

// Nutrient aggregation
pub mod nutrients;

// Catalog store
pub mod store;

// Wire and domain types
pub mod types;

pub use client::NutritionClient;

// Re-export backend types
#[cfg(feature = "client")]
pub use backend::HttpBackend;
pub use backend::{MockBackend, MockFailure};

pub use config::{ClientConfig, Messages};
pub use draft::{DebounceScheduler, RecipeDraft, RecipeField, RecipeForm, ValidationErrors};
pub use error::{ClientError, Result};
pub use gateway::{
    NutritionGateway, OperationTracker, RecipeGateway, Session, SessionHandle, SessionProvider,
};
pub use nutrients::{per_serving_totals, CatalogIndex, CatalogLookup, CatalogSource};
pub use store::{CatalogStore, FilterState};
pub use types::{
    CalorieRequest, CalorieResponse, CatalogItem, FoodCategory, IngredientLine, MealPlan,
    MealPlanConfig, NewCatalogItem, NutrientTotals, Recipe,
};
