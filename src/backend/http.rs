//! REST backend over reqwest

use super::traits::{CatalogBackend, NutritionBackend, RecipeBackend};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::types::{
    CalorieRequest, CalorieResponse, CatalogItem, GeneratedPlan, ItemId, MealPlan, MealPlanConfig,
    NewCatalogItem, Recipe, RecipeId, RecipeRequest, UserId,
};
use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// HTTP client for the diet/fitness REST API
///
/// # Example
///
/// ```rust,no_run
/// use nutrition_sdk::{ClientConfig, HttpBackend};
/// use nutrition_sdk::backend::CatalogBackend;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpBackend::new(&ClientConfig::for_local("http://localhost:8080/api"))?;
/// let foods = backend.fetch_all().await?;
/// # Ok(())
/// # }
/// ```
pub struct HttpBackend {
    base: Url,
    client: Client,
}

/// Error body shape returned by the server
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Serialize)]
struct PlanWithConfig<'a> {
    request: &'a CalorieRequest,
    config: &'a MealPlanConfig,
}

impl HttpBackend {
    /// Create a backend from configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base_url: {}", e)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "base_url cannot carry paths: {}",
                config.base_url
            )));
        }

        let mut headers = header::HeaderMap::new();
        if let Some(ref api_key) = config.api_key {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| ClientError::Config(format!("invalid api_key: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self { base, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config("base_url cannot carry paths".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        let response = request.send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Map non-2xx responses to `ClientError`, keeping the server's message.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let path = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();
        let message = extract_message(&body);

        if status == StatusCode::NOT_FOUND && message.is_none() {
            return Err(ClientError::NotFound(path));
        }

        tracing::debug!(status = status.as_u16(), %path, "request rejected by server");
        Err(ClientError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

/// Server message from a JSON `{"message": ...}` body, or the body itself
/// when it is plain text.
fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.message.filter(|m| !m.trim().is_empty()),
        Err(_) if body.starts_with('{') || body.starts_with('<') => None,
        Err(_) => Some(body.to_string()),
    }
}

#[async_trait]
impl CatalogBackend for HttpBackend {
    async fn fetch_all(&self) -> Result<Vec<CatalogItem>> {
        let url = self.endpoint(&["foods"])?;
        self.send(self.client.get(url)).await
    }

    async fn create(&self, item: &NewCatalogItem) -> Result<CatalogItem> {
        let url = self.endpoint(&["foods"])?;
        self.send(self.client.post(url).json(item)).await
    }

    async fn update(&self, id: ItemId, item: &NewCatalogItem) -> Result<CatalogItem> {
        let url = self.endpoint(&["foods", &id.to_string()])?;
        self.send(self.client.put(url).json(item)).await
    }

    async fn delete(&self, id: ItemId) -> Result<()> {
        let url = self.endpoint(&["foods", &id.to_string()])?;
        self.send_empty(self.client.delete(url)).await
    }

    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>> {
        let url = self.endpoint(&["foods", "search"])?;
        self.send(self.client.get(url).query(&[("query", query)])).await
    }

    async fn by_category(&self, category: &str) -> Result<Vec<CatalogItem>> {
        let url = self.endpoint(&["foods", "category", category])?;
        self.send(self.client.get(url)).await
    }

    async fn categories(&self) -> Result<Vec<String>> {
        let url = self.endpoint(&["foods", "categories"])?;
        self.send(self.client.get(url)).await
    }
}

#[async_trait]
impl NutritionBackend for HttpBackend {
    async fn calculate(&self, request: &CalorieRequest) -> Result<CalorieResponse> {
        let url = self.endpoint(&["calorie-calculator", "calculate"])?;
        self.send(self.client.post(url).json(request)).await
    }

    async fn calculate_and_save(
        &self,
        user_id: UserId,
        request: &CalorieRequest,
    ) -> Result<CalorieResponse> {
        let url = self.endpoint(&["calorie-calculator", "calculate-and-save", &user_id.to_string()])?;
        self.send(self.client.post(url).json(request)).await
    }

    async fn generate_training_program(
        &self,
        user_id: UserId,
        request: &CalorieRequest,
    ) -> Result<GeneratedPlan> {
        let url = self.endpoint(&[
            "calorie-calculator",
            "generate-training-program",
            &user_id.to_string(),
        ])?;
        self.send(self.client.post(url).json(request)).await
    }

    async fn generate_meal_plan(
        &self,
        user_id: UserId,
        request: &CalorieRequest,
    ) -> Result<MealPlan> {
        let url = self.endpoint(&["calorie-calculator", "generate-meal-plan", &user_id.to_string()])?;
        self.send(self.client.post(url).json(request)).await
    }

    async fn generate_smart_meal_plan(
        &self,
        user_id: UserId,
        request: &CalorieRequest,
        include_workout_days: bool,
    ) -> Result<MealPlan> {
        let url = self.endpoint(&[
            "calorie-calculator",
            "generate-smart-meal-plan",
            &user_id.to_string(),
        ])?;
        let request = self
            .client
            .post(url)
            .query(&[("includeWorkoutDays", include_workout_days)])
            .json(request);
        self.send(request).await
    }

    async fn generate_smart_meal_plan_with_config(
        &self,
        user_id: UserId,
        request: &CalorieRequest,
        config: &MealPlanConfig,
    ) -> Result<MealPlan> {
        let url = self.endpoint(&[
            "calorie-calculator",
            "generate-smart-meal-plan-with-config",
            &user_id.to_string(),
        ])?;
        let body = PlanWithConfig { request, config };
        self.send(self.client.post(url).json(&body)).await
    }

    async fn generate_meal_plan_with_config(
        &self,
        user_id: UserId,
        request: &CalorieRequest,
        config: &MealPlanConfig,
    ) -> Result<MealPlan> {
        let url = self.endpoint(&[
            "calorie-calculator",
            "generate-meal-plan-with-config",
            &user_id.to_string(),
        ])?;
        let body = PlanWithConfig { request, config };
        self.send(self.client.post(url).json(&body)).await
    }

    async fn generate_daily_plan(
        &self,
        user_id: UserId,
        request: &CalorieRequest,
    ) -> Result<GeneratedPlan> {
        let url = self.endpoint(&["calorie-calculator", "generate-daily-plan", &user_id.to_string()])?;
        self.send(self.client.post(url).json(request)).await
    }
}

#[async_trait]
impl RecipeBackend for HttpBackend {
    async fn all_recipes(&self) -> Result<Vec<Recipe>> {
        let url = self.endpoint(&["recipes"])?;
        self.send(self.client.get(url)).await
    }

    async fn user_recipes(&self, user_id: UserId) -> Result<Vec<Recipe>> {
        let url = self.endpoint(&["recipes", "user", &user_id.to_string()])?;
        self.send(self.client.get(url)).await
    }

    async fn create_recipe(&self, request: &RecipeRequest) -> Result<Recipe> {
        let url = self.endpoint(&["recipes"])?;
        self.send(self.client.post(url).json(request)).await
    }

    async fn update_recipe(&self, id: RecipeId, request: &RecipeRequest) -> Result<Recipe> {
        let url = self.endpoint(&["recipes", &id.to_string()])?;
        self.send(self.client.put(url).json(request)).await
    }

    async fn delete_recipe(&self, id: RecipeId) -> Result<()> {
        let url = self.endpoint(&["recipes", &id.to_string()])?;
        self.send_empty(self.client.delete(url)).await
    }
}
