//! In-memory backend for tests and offline use.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::json;
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};
use std::time::Duration;

use super::traits::*;
use crate::error::{ClientError, Result};
use crate::types::{
    CalorieRequest, CalorieResponse, CatalogItem, FoodCategory, Gender, GeneratedPlan, Goal,
    ItemId, MacroDistribution, MealPlan, MealPlanConfig, MealPlanDay, NewCatalogItem, Recipe,
    RecipeId, RecipeRequest, UserId,
};

/// Failure a mock operation reports instead of succeeding
#[derive(Debug, Clone, PartialEq)]
pub struct MockFailure {
    /// `None` simulates a transport failure with no response
    pub status: Option<u16>,
    pub message: Option<String>,
}

impl MockFailure {
    pub fn network() -> Self {
        Self { status: None, message: None }
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: Some(message.into()),
        }
    }

    /// Server failure without a body
    pub fn status(status: u16) -> Self {
        Self {
            status: Some(status),
            message: None,
        }
    }

    fn to_error(&self) -> ClientError {
        match self.status {
            Some(status) => ClientError::Server {
                status,
                message: self.message.clone(),
            },
            None => ClientError::Network(
                self.message
                    .clone()
                    .unwrap_or_else(|| "mock transport failure".to_string()),
            ),
        }
    }
}

/// Mock backend for testing.
///
/// Operations are keyed by their trait method name (`"fetch_all"`,
/// `"search"`, `"create_recipe"`, ...) for failure injection, latency and
/// call counting.
pub struct MockBackend {
    items: DashMap<ItemId, CatalogItem>,
    recipes: DashMap<RecipeId, Recipe>,
    next_id: AtomicI64,
    failures: DashMap<String, MockFailure>,
    latency: DashMap<String, Duration>,
    calls: DashMap<String, u32>,
    call_count: AtomicU32,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
            recipes: DashMap::new(),
            next_id: AtomicI64::new(1),
            failures: DashMap::new(),
            latency: DashMap::new(),
            calls: DashMap::new(),
            call_count: AtomicU32::new(0),
        }
    }

    /// Seed the catalog. Ids already set on the items are kept.
    pub fn with_items(self, items: impl IntoIterator<Item = CatalogItem>) -> Self {
        for item in items {
            self.bump_next_id(item.id);
            self.items.insert(item.id, item);
        }
        self
    }

    pub fn with_recipes(self, recipes: impl IntoIterator<Item = Recipe>) -> Self {
        for recipe in recipes {
            self.bump_next_id(recipe.id);
            self.recipes.insert(recipe.id, recipe);
        }
        self
    }

    pub fn with_failure(self, operation: &str, failure: MockFailure) -> Self {
        self.set_failure(operation, failure);
        self
    }

    /// Delay every call to `operation` by `delay`
    pub fn with_latency(self, operation: &str, delay: Duration) -> Self {
        self.latency.insert(operation.to_string(), delay);
        self
    }

    pub fn set_failure(&self, operation: &str, failure: MockFailure) {
        self.failures.insert(operation.to_string(), failure);
    }

    pub fn clear_failure(&self, operation: &str) {
        self.failures.remove(operation);
    }

    pub fn set_latency(&self, operation: &str, delay: Duration) {
        self.latency.insert(operation.to_string(), delay);
    }

    /// Replace a stored item directly, bypassing call accounting
    pub fn put_item(&self, item: CatalogItem) {
        self.bump_next_id(item.id);
        self.items.insert(item.id, item);
    }

    /// Total calls across all operations.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Calls made to one operation.
    pub fn calls_to(&self, operation: &str) -> u32 {
        self.calls.get(operation).map(|c| *c).unwrap_or(0)
    }

    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
        self.calls.clear();
    }

    fn bump_next_id(&self, id: i64) {
        self.next_id.fetch_max(id + 1, Ordering::SeqCst);
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Count the call, apply latency, then report any injected failure.
    async fn enter(&self, operation: &str) -> Result<()> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self.calls.entry(operation.to_string()).or_insert(0) += 1;

        let delay = self.latency.get(operation).map(|d| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.failures.get(operation) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    fn sorted_items(&self, keep: impl Fn(&CatalogItem) -> bool) -> Vec<CatalogItem> {
        let mut items: Vec<CatalogItem> = self
            .items
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        items.sort_by_key(|item| item.id);
        items
    }

    fn food_not_found(id: ItemId) -> ClientError {
        ClientError::Server {
            status: 404,
            message: Some(format!("Food not found with ID: {}", id)),
        }
    }

    fn build_recipe(&self, id: RecipeId, request: &RecipeRequest) -> Result<Recipe> {
        for ingredient in &request.ingredients {
            if !self.items.contains_key(&ingredient.food_id) {
                return Err(Self::food_not_found(ingredient.food_id));
            }
        }
        let ingredients = request
            .ingredients
            .iter()
            .cloned()
            .map(|mut ingredient| {
                ingredient.recipe_id = id;
                ingredient
            })
            .collect();

        Ok(Recipe {
            id,
            name: request.name.clone(),
            description: request.description.clone(),
            instructions: request.instructions.clone(),
            ingredients,
            servings: request.servings,
            preparation_time: request.preparation_time,
            creator_id: request.creator_id,
            recommended_for: request.recommended_for,
            calories_per_serving: request.calories_per_serving,
            protein_per_serving: request.protein_per_serving,
            fat_per_serving: request.fat_per_serving,
            carbs_per_serving: request.carbs_per_serving,
        })
    }

    fn plan(&self, user_id: UserId, request: &CalorieRequest, config: &MealPlanConfig) -> MealPlan {
        let estimate = estimate(request);
        let days = config.duration_weeks.max(1) * 7;
        MealPlan {
            id: self.allocate_id(),
            user_id,
            name: config.plan_name.clone(),
            description: config.plan_description.clone(),
            start_date: Some(config.start_date),
            end_date: config
                .start_date
                .checked_add_days(chrono::Days::new(u64::from(days))),
            goal: Some(config.goal.unwrap_or(request.goal)),
            target_calories: estimate.daily_calories,
            target_protein: estimate.macro_distribution.protein_grams,
            target_fats: estimate.macro_distribution.fats_grams,
            target_carbs: estimate.macro_distribution.carbs_grams,
            days: (0..days)
                .map(|day| MealPlanDay {
                    id: 0,
                    day_of_week: (day % 7 + 1) as u8,
                    meals: Vec::new(),
                })
                .collect(),
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Local Mifflin-St Jeor estimate, mirroring what the server computes.
pub fn estimate(request: &CalorieRequest) -> CalorieResponse {
    let base = 10.0 * request.weight + 6.25 * request.height - 5.0 * f64::from(request.age);
    let bmr = match request.gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    };
    let tdee = bmr * request.activity_level.multiplier();
    let (adjustment, protein_per_kg) = match request.goal {
        Goal::LoseWeight => (-500.0, 2.2),
        Goal::MaintainWeight => (0.0, 2.0),
        Goal::GainWeight => (300.0, 2.4),
    };
    let daily_calories = tdee + adjustment;

    let protein_grams = request.weight * protein_per_kg;
    let fats_grams = daily_calories * 0.25 / 9.0;
    let protein_calories = protein_grams * 4.0;
    let fats_calories = fats_grams * 9.0;
    let carbs_calories = daily_calories - protein_calories - fats_calories;
    let percent = |calories: f64| {
        if daily_calories > 0.0 {
            calories / daily_calories * 100.0
        } else {
            0.0
        }
    };

    CalorieResponse {
        bmr,
        tdee,
        daily_calories,
        macro_distribution: MacroDistribution {
            total_calories: daily_calories,
            protein_grams,
            fats_grams,
            carbs_grams: carbs_calories / 4.0,
            protein_percentage: percent(protein_calories),
            fats_percentage: percent(fats_calories),
            carbs_percentage: percent(carbs_calories),
            protein_calories,
            fats_calories,
            carbs_calories,
        },
        calculation_date: None,
    }
}

#[async_trait]
impl CatalogBackend for MockBackend {
    async fn fetch_all(&self) -> Result<Vec<CatalogItem>> {
        self.enter("fetch_all").await?;
        Ok(self.sorted_items(|_| true))
    }

    async fn create(&self, item: &NewCatalogItem) -> Result<CatalogItem> {
        self.enter("create").await?;
        let created = CatalogItem::from_new(self.allocate_id(), item.clone());
        self.items.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: ItemId, item: &NewCatalogItem) -> Result<CatalogItem> {
        self.enter("update").await?;
        let mut entry = self.items.get_mut(&id).ok_or_else(|| Self::food_not_found(id))?;
        *entry = CatalogItem::from_new(id, item.clone());
        Ok(entry.value().clone())
    }

    async fn delete(&self, id: ItemId) -> Result<()> {
        self.enter("delete").await?;
        self.items
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::food_not_found(id))
    }

    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>> {
        self.enter("search").await?;
        Ok(self.sorted_items(|item| item.name_contains(query)))
    }

    async fn by_category(&self, category: &str) -> Result<Vec<CatalogItem>> {
        self.enter("by_category").await?;
        Ok(self.sorted_items(|item| item.in_category(category)))
    }

    async fn categories(&self) -> Result<Vec<String>> {
        self.enter("categories").await?;
        Ok(FoodCategory::ALL.iter().map(|c| c.as_str().to_string()).collect())
    }
}

#[async_trait]
impl NutritionBackend for MockBackend {
    async fn calculate(&self, request: &CalorieRequest) -> Result<CalorieResponse> {
        self.enter("calculate").await?;
        Ok(estimate(request))
    }

    async fn calculate_and_save(
        &self,
        _user_id: UserId,
        request: &CalorieRequest,
    ) -> Result<CalorieResponse> {
        self.enter("calculate_and_save").await?;
        Ok(estimate(request))
    }

    async fn generate_training_program(
        &self,
        user_id: UserId,
        request: &CalorieRequest,
    ) -> Result<GeneratedPlan> {
        self.enter("generate_training_program").await?;
        Ok(json!({
            "userId": user_id,
            "goal": request.goal,
            "activityLevel": request.activity_level,
            "workouts": [],
        }))
    }

    async fn generate_meal_plan(
        &self,
        user_id: UserId,
        request: &CalorieRequest,
    ) -> Result<MealPlan> {
        self.enter("generate_meal_plan").await?;
        Ok(self.plan(user_id, request, &MealPlanConfig::default()))
    }

    async fn generate_smart_meal_plan(
        &self,
        user_id: UserId,
        request: &CalorieRequest,
        include_workout_days: bool,
    ) -> Result<MealPlan> {
        self.enter("generate_smart_meal_plan").await?;
        let config = MealPlanConfig {
            include_workout_days,
            ..Default::default()
        };
        Ok(self.plan(user_id, request, &config))
    }

    async fn generate_smart_meal_plan_with_config(
        &self,
        user_id: UserId,
        request: &CalorieRequest,
        config: &MealPlanConfig,
    ) -> Result<MealPlan> {
        self.enter("generate_smart_meal_plan_with_config").await?;
        Ok(self.plan(user_id, request, config))
    }

    async fn generate_meal_plan_with_config(
        &self,
        user_id: UserId,
        request: &CalorieRequest,
        config: &MealPlanConfig,
    ) -> Result<MealPlan> {
        self.enter("generate_meal_plan_with_config").await?;
        Ok(self.plan(user_id, request, config))
    }

    async fn generate_daily_plan(
        &self,
        user_id: UserId,
        request: &CalorieRequest,
    ) -> Result<GeneratedPlan> {
        self.enter("generate_daily_plan").await?;
        let estimate = estimate(request);
        Ok(json!({
            "userId": user_id,
            "targetCalories": estimate.daily_calories,
            "meals": [],
        }))
    }
}

#[async_trait]
impl RecipeBackend for MockBackend {
    async fn all_recipes(&self) -> Result<Vec<Recipe>> {
        self.enter("all_recipes").await?;
        let mut recipes: Vec<Recipe> = self.recipes.iter().map(|entry| entry.value().clone()).collect();
        recipes.sort_by_key(|recipe| recipe.id);
        Ok(recipes)
    }

    async fn user_recipes(&self, user_id: UserId) -> Result<Vec<Recipe>> {
        self.enter("user_recipes").await?;
        let mut recipes: Vec<Recipe> = self
            .recipes
            .iter()
            .filter(|entry| entry.creator_id == Some(user_id))
            .map(|entry| entry.value().clone())
            .collect();
        recipes.sort_by_key(|recipe| recipe.id);
        Ok(recipes)
    }

    async fn create_recipe(&self, request: &RecipeRequest) -> Result<Recipe> {
        self.enter("create_recipe").await?;
        let recipe = self.build_recipe(self.allocate_id(), request)?;
        self.recipes.insert(recipe.id, recipe.clone());
        Ok(recipe)
    }

    async fn update_recipe(&self, id: RecipeId, request: &RecipeRequest) -> Result<Recipe> {
        self.enter("update_recipe").await?;
        let creator_id = match self.recipes.get(&id) {
            Some(existing) => existing.creator_id,
            None => {
                return Err(ClientError::Server {
                    status: 404,
                    message: Some(format!("Recipe not found with ID: {}", id)),
                })
            }
        };
        let mut recipe = self.build_recipe(id, request)?;
        recipe.creator_id = recipe.creator_id.or(creator_id);
        self.recipes.insert(id, recipe.clone());
        Ok(recipe)
    }

    async fn delete_recipe(&self, id: RecipeId) -> Result<()> {
        self.enter("delete_recipe").await?;
        self.recipes.remove(&id).map(|_| ()).ok_or_else(|| ClientError::Server {
            status: 404,
            message: Some(format!("Recipe not found with ID: {}", id)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActivityLevel;

    fn oats() -> CatalogItem {
        CatalogItem::from_new(7, NewCatalogItem::new("Oats", 389.0, 16.9, 6.9, 66.3))
    }

    #[tokio::test]
    async fn test_mock_catalog() {
        let backend = MockBackend::new().with_items([oats()]);
        assert_eq!(backend.call_count(), 0);

        let created = backend
            .create(&NewCatalogItem::new("Milk", 42.0, 3.4, 1.0, 5.0))
            .await
            .unwrap();
        assert_eq!(created.id, 8);

        let found = backend.search("oat").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(backend.call_count(), 2);
        assert_eq!(backend.calls_to("search"), 1);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let backend = MockBackend::new()
            .with_failure("fetch_all", MockFailure::server(503, "maintenance"));

        let err = backend.fetch_all().await.unwrap_err();
        assert_eq!(err.server_message(), Some("maintenance"));

        backend.clear_failure("fetch_all");
        assert!(backend.fetch_all().await.is_ok());

        backend.set_failure("delete", MockFailure::network());
        assert!(matches!(
            backend.delete(1).await,
            Err(ClientError::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_recipe_with_unknown_food_rejected() {
        let backend = MockBackend::new().with_items([oats()]);
        let request = RecipeRequest {
            name: "Porridge".into(),
            description: "Warm".into(),
            instructions: "Boil".into(),
            ingredients: vec![crate::types::RecipeIngredient {
                id: 0,
                recipe_id: 0,
                food_id: 99,
                food_name: "Ghost".into(),
                amount: 10.0,
                note: None,
            }],
            servings: 1,
            preparation_time: 5,
            creator_id: Some(1),
            recommended_for: Goal::MaintainWeight,
            calories_per_serving: 0.0,
            protein_per_serving: 0.0,
            fat_per_serving: 0.0,
            carbs_per_serving: 0.0,
        };

        let err = backend.create_recipe(&request).await.unwrap_err();
        assert!(err.server_message().unwrap().contains("Food not found with ID"));
    }

    #[test]
    fn test_estimate() {
        let request = CalorieRequest {
            weight: 80.0,
            height: 180.0,
            age: 30,
            gender: Gender::Male,
            activity_level: ActivityLevel::Sedentary,
            goal: Goal::MaintainWeight,
        };
        let response = estimate(&request);

        // 800 + 1125 - 150 + 5
        assert_eq!(response.bmr, 1780.0);
        assert!((response.tdee - 2136.0).abs() < 1e-9);
        assert_eq!(response.daily_calories, response.tdee);
        assert_eq!(response.macro_distribution.protein_grams, 160.0);
    }
}
