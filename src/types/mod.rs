//! Wire and domain types
//!
//! Field names follow the REST API (camelCase JSON).

mod catalog;
mod nutrition;
mod recipe;

pub use catalog::{CatalogItem, FoodCategory, ItemId, NewCatalogItem};
pub use nutrition::{
    ActivityLevel, CalorieRequest, CalorieResponse, GeneratedPlan, Gender, MacroDistribution,
    Meal, MealItem, MealPlan, MealPlanConfig, MealPlanDay, MealType, UserId,
};
pub use recipe::{
    Goal, IngredientLine, NutrientTotals, Recipe, RecipeId, RecipeIngredient, RecipeRequest,
};
