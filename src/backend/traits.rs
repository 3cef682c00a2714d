//! Core traits for backends.

use crate::error::Result;
use crate::types::{
    CalorieRequest, CalorieResponse, CatalogItem, GeneratedPlan, ItemId, MealPlan, MealPlanConfig,
    NewCatalogItem, Recipe, RecipeId, RecipeRequest, UserId,
};
use async_trait::async_trait;

/// Food catalog endpoints.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<CatalogItem>>;

    async fn create(&self, item: &NewCatalogItem) -> Result<CatalogItem>;

    async fn update(&self, id: ItemId, item: &NewCatalogItem) -> Result<CatalogItem>;

    async fn delete(&self, id: ItemId) -> Result<()>;

    /// Items whose name matches `query`
    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>>;

    async fn by_category(&self, category: &str) -> Result<Vec<CatalogItem>>;

    async fn categories(&self) -> Result<Vec<String>>;
}

/// Calorie calculator and plan generation endpoints.
///
/// The computations themselves happen server-side.
#[async_trait]
pub trait NutritionBackend: Send + Sync {
    async fn calculate(&self, request: &CalorieRequest) -> Result<CalorieResponse>;

    async fn calculate_and_save(
        &self,
        user_id: UserId,
        request: &CalorieRequest,
    ) -> Result<CalorieResponse>;

    async fn generate_training_program(
        &self,
        user_id: UserId,
        request: &CalorieRequest,
    ) -> Result<GeneratedPlan>;

    async fn generate_meal_plan(&self, user_id: UserId, request: &CalorieRequest)
        -> Result<MealPlan>;

    async fn generate_smart_meal_plan(
        &self,
        user_id: UserId,
        request: &CalorieRequest,
        include_workout_days: bool,
    ) -> Result<MealPlan>;

    async fn generate_smart_meal_plan_with_config(
        &self,
        user_id: UserId,
        request: &CalorieRequest,
        config: &MealPlanConfig,
    ) -> Result<MealPlan>;

    async fn generate_meal_plan_with_config(
        &self,
        user_id: UserId,
        request: &CalorieRequest,
        config: &MealPlanConfig,
    ) -> Result<MealPlan>;

    async fn generate_daily_plan(
        &self,
        user_id: UserId,
        request: &CalorieRequest,
    ) -> Result<GeneratedPlan>;
}

/// Recipe endpoints.
#[async_trait]
pub trait RecipeBackend: Send + Sync {
    async fn all_recipes(&self) -> Result<Vec<Recipe>>;

    async fn user_recipes(&self, user_id: UserId) -> Result<Vec<Recipe>>;

    async fn create_recipe(&self, request: &RecipeRequest) -> Result<Recipe>;

    async fn update_recipe(&self, id: RecipeId, request: &RecipeRequest) -> Result<Recipe>;

    async fn delete_recipe(&self, id: RecipeId) -> Result<()>;
}
