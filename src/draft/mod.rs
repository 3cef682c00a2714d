//! Recipe drafting
//!
//! - [`RecipeDraft`]: the editable record
//! - [`DebounceScheduler`]: coalesces recompute requests
//! - [`RecipeForm`]: binds edits to recomputes and submits through the
//!   recipe gateway

mod debounce;
mod model;
mod recipe_form;
mod validation;

pub use debounce::DebounceScheduler;
pub use model::RecipeDraft;
pub use recipe_form::RecipeForm;
pub use validation::{validate, RecipeField, ValidationErrors};
