//! Client configuration
//!
//! Loaded from TOML or built in code. Every key is optional; missing keys
//! take the defaults below.

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// REST API root (e.g., "http://localhost:8080/api")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional bearer token sent with every request
    #[serde(default)]
    pub api_key: Option<String>,

    /// Transport timeout for the HTTP backend
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Quiet window before a scheduled recompute runs
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Maximum ingredient lines in a recipe draft
    #[serde(default = "default_max_ingredient_lines")]
    pub max_ingredient_lines: usize,

    /// User-facing messages
    #[serde(default)]
    pub messages: Messages,
}

fn default_base_url() -> String { "http://localhost:8080/api".to_string() }
fn default_timeout_secs() -> u64 { 30 }
fn default_debounce_ms() -> u64 { 500 }
fn default_max_ingredient_lines() -> usize { 10 }

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            debounce_ms: default_debounce_ms(),
            max_ingredient_lines: default_max_ingredient_lines(),
            messages: Messages::default(),
        }
    }
}

impl ClientConfig {
    /// Configuration pointing at a specific API root, defaults elsewhere
    pub fn for_local(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Parse from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ClientConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ClientError::Config("base_url must not be empty".into()));
        }
        if self.max_ingredient_lines == 0 {
            return Err(ClientError::Config("max_ingredient_lines must be at least 1".into()));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// User-facing texts for errors and validation.
///
/// Override any of them from the `[messages]` table of the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub sign_in_required: String,

    // Catalog
    pub fetch_catalog_failed: String,
    pub fetch_categories_failed: String,
    pub create_item_failed: String,
    pub update_item_failed: String,
    pub delete_item_failed: String,
    pub search_failed: String,
    pub category_filter_failed: String,

    // Nutrition planning
    pub calculate_failed: String,
    pub save_settings_failed: String,
    pub training_program_failed: String,
    pub meal_plan_failed: String,
    pub smart_meal_plan_failed: String,
    pub smart_meal_plan_config_failed: String,
    pub meal_plan_config_failed: String,
    pub daily_plan_failed: String,

    // Recipes
    pub fetch_all_recipes_failed: String,
    pub fetch_recipes_failed: String,
    pub create_recipe_failed: String,
    pub update_recipe_failed: String,
    pub delete_recipe_failed: String,
    pub missing_catalog_item: String,

    // Draft validation
    pub name_required: String,
    pub description_required: String,
    pub instructions_required: String,
    pub ingredient_required: String,
    pub preparation_time_negative: String,
    pub servings_not_positive: String,
    pub nutrient_negative: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            sign_in_required: "You must be signed in".into(),

            fetch_catalog_failed: "Failed to load foods".into(),
            fetch_categories_failed: "Failed to load categories".into(),
            create_item_failed: "Failed to create food".into(),
            update_item_failed: "Failed to update food".into(),
            delete_item_failed: "Failed to delete food".into(),
            search_failed: "Failed to search foods".into(),
            category_filter_failed: "Failed to load foods for category".into(),

            calculate_failed: "Failed to calculate calories".into(),
            save_settings_failed: "Failed to save settings".into(),
            training_program_failed: "Failed to generate training program".into(),
            meal_plan_failed: "Failed to generate meal plan".into(),
            smart_meal_plan_failed: "Failed to generate smart meal plan".into(),
            smart_meal_plan_config_failed: "Failed to generate smart meal plan with configuration".into(),
            meal_plan_config_failed: "Failed to generate meal plan with configuration".into(),
            daily_plan_failed: "Failed to generate daily plan".into(),

            fetch_all_recipes_failed: "Failed to load recipes".into(),
            fetch_recipes_failed: "Failed to load your recipes".into(),
            create_recipe_failed: "Failed to create recipe".into(),
            update_recipe_failed: "Failed to update recipe".into(),
            delete_recipe_failed: "Failed to delete recipe".into(),
            missing_catalog_item: "One or more foods were not found. Please pick from the list.".into(),

            name_required: "Name is required".into(),
            description_required: "Description is required".into(),
            instructions_required: "Instructions are required".into(),
            ingredient_required: "At least one ingredient is required".into(),
            preparation_time_negative: "Preparation time cannot be negative".into(),
            servings_not_positive: "Servings must be greater than 0".into(),
            nutrient_negative: "Value cannot be negative".into(),
        }
    }
}
