//! Calorie calculator and meal plan contracts
//!
//! The server computes BMR/TDEE and builds plans; the client only shapes
//! requests and reads responses.

use super::recipe::{Goal, RecipeId};
use super::catalog::ItemId;
use crate::error::{ClientError, Result};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type UserId = i64;

/// Training programs and daily plans are passed through untouched.
pub type GeneratedPlan = serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    #[default]
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

impl ActivityLevel {
    /// TDEE multiplier conventionally applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::LightlyActive => 1.375,
            Self::ModeratelyActive => 1.55,
            Self::VeryActive => 1.725,
            Self::ExtraActive => 1.9,
        }
    }
}

/// Physical attributes sent to the calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieRequest {
    /// kg
    pub weight: f64,
    /// cm
    pub height: f64,
    pub age: u32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieResponse {
    pub bmr: f64,
    pub tdee: f64,
    pub daily_calories: f64,
    pub macro_distribution: MacroDistribution,
    #[serde(default)]
    pub calculation_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MacroDistribution {
    pub total_calories: f64,
    pub protein_grams: f64,
    pub fats_grams: f64,
    pub carbs_grams: f64,
    pub protein_percentage: f64,
    pub fats_percentage: f64,
    pub carbs_percentage: f64,
    pub protein_calories: f64,
    pub fats_calories: f64,
    pub carbs_calories: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MealType {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
    EveningSnack,
}

/// Options for meal plan generation.
///
/// Distributions and the macro split are fractions that should each sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanConfig {
    pub plan_name: String,
    pub plan_description: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<Goal>,
    pub duration_weeks: u32,
    pub include_workout_days: bool,
    pub workout_day_calorie_multiplier: f64,
    pub meal_distribution: BTreeMap<MealType, f64>,
    pub workout_day_meal_distribution: BTreeMap<MealType, f64>,
    pub use_smart_generation: bool,
    pub include_snacks: bool,
    pub meals_per_day: u32,
    pub protein_percentage: f64,
    pub carbs_percentage: f64,
    pub fats_percentage: f64,
}

impl Default for MealPlanConfig {
    fn default() -> Self {
        Self {
            plan_name: "Generated Meal Plan".to_string(),
            plan_description: "Automatically generated based on your goals".to_string(),
            start_date: Utc::now().date_naive(),
            end_date: None,
            goal: None,
            duration_weeks: 1,
            include_workout_days: true,
            workout_day_calorie_multiplier: 1.1,
            meal_distribution: BTreeMap::from([
                (MealType::Breakfast, 0.30),
                (MealType::Lunch, 0.40),
                (MealType::Dinner, 0.30),
            ]),
            workout_day_meal_distribution: BTreeMap::from([
                (MealType::Breakfast, 0.25),
                (MealType::Lunch, 0.35),
                (MealType::Dinner, 0.40),
            ]),
            use_smart_generation: true,
            include_snacks: false,
            meals_per_day: 3,
            protein_percentage: 0.25,
            carbs_percentage: 0.45,
            fats_percentage: 0.30,
        }
    }
}

const FRACTION_TOLERANCE: f64 = 0.01;

impl MealPlanConfig {
    pub fn validate(&self) -> Result<()> {
        if self.duration_weeks == 0 {
            return Err(ClientError::Validation("duration_weeks must be at least 1".into()));
        }
        if self.meals_per_day == 0 {
            return Err(ClientError::Validation("meals_per_day must be at least 1".into()));
        }
        let macro_sum = self.protein_percentage + self.carbs_percentage + self.fats_percentage;
        if (macro_sum - 1.0).abs() > FRACTION_TOLERANCE {
            return Err(ClientError::Validation(format!(
                "macro split must sum to 1.0, got {:.2}",
                macro_sum
            )));
        }
        for (label, distribution) in [
            ("meal_distribution", &self.meal_distribution),
            ("workout_day_meal_distribution", &self.workout_day_meal_distribution),
        ] {
            if distribution.is_empty() {
                continue;
            }
            let sum: f64 = distribution.values().sum();
            if (sum - 1.0).abs() > FRACTION_TOLERANCE {
                return Err(ClientError::Validation(format!(
                    "{} must sum to 1.0, got {:.2}",
                    label, sum
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub user_id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub goal: Option<Goal>,
    #[serde(default)]
    pub target_calories: f64,
    #[serde(default)]
    pub target_protein: f64,
    #[serde(default)]
    pub target_fats: f64,
    #[serde(default)]
    pub target_carbs: f64,
    #[serde(default)]
    pub days: Vec<MealPlanDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanDay {
    #[serde(default)]
    pub id: i64,
    pub day_of_week: u8,
    #[serde(default)]
    pub meals: Vec<Meal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    #[serde(default)]
    pub items: Vec<MealItem>,
    #[serde(default)]
    pub total_calories: f64,
    #[serde(default)]
    pub total_protein: f64,
    #[serde(default)]
    pub total_fats: f64,
    #[serde(default)]
    pub total_carbs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealItem {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub food_id: ItemId,
    #[serde(default)]
    pub food_name: String,
    #[serde(default)]
    pub recipe_id: Option<RecipeId>,
    #[serde(default)]
    pub recipe_name: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fats: f64,
    #[serde(default)]
    pub carbs: f64,
}
