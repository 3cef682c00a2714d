//! Recipe records and ingredient lines

use super::catalog::{CatalogItem, ItemId};
use serde::{Deserialize, Serialize};

pub type RecipeId = i64;

/// Goal a recipe or plan is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Goal {
    LoseWeight,
    #[default]
    MaintainWeight,
    GainWeight,
}

/// One ingredient in a draft recipe.
///
/// `name` is a snapshot taken when the item was picked; it is not kept in
/// sync with later catalog renames unless the draft asks for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientLine {
    #[serde(rename = "foodId")]
    pub item_id: ItemId,
    #[serde(rename = "foodName")]
    pub name: String,
    /// Grams
    #[serde(rename = "amount")]
    pub quantity: f64,
}

impl IngredientLine {
    /// Blank line as added by "add ingredient"
    pub fn empty() -> Self {
        Self {
            item_id: 0,
            name: String::new(),
            quantity: 1.0,
        }
    }

    /// Line pointing at `item`, with the default quantity of 1
    pub fn for_item(item: &CatalogItem) -> Self {
        Self {
            item_id: item.id,
            name: item.name.clone(),
            quantity: 1.0,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.item_id > 0
    }
}

impl Default for IngredientLine {
    fn default() -> Self {
        Self::empty()
    }
}

/// Per-serving nutrient totals, rounded to whole units.
///
/// Always replaced as a whole; never patched field by field.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutrientTotals {
    pub energy: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

impl NutrientTotals {
    pub const ZERO: NutrientTotals = NutrientTotals {
        energy: 0.0,
        protein: 0.0,
        fat: 0.0,
        carbs: 0.0,
    };

    pub fn new(energy: f64, protein: f64, fat: f64, carbs: f64) -> Self {
        Self { energy, protein, fat, carbs }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// A stored recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    pub servings: i32,
    #[serde(default)]
    pub preparation_time: i32,
    #[serde(default)]
    pub creator_id: Option<i64>,
    #[serde(default)]
    pub recommended_for: Goal,
    #[serde(default)]
    pub calories_per_serving: f64,
    #[serde(default)]
    pub protein_per_serving: f64,
    #[serde(default)]
    pub fat_per_serving: f64,
    #[serde(default)]
    pub carbs_per_serving: f64,
}

impl Recipe {
    pub fn totals(&self) -> NutrientTotals {
        NutrientTotals::new(
            self.calories_per_serving,
            self.protein_per_serving,
            self.fat_per_serving,
            self.carbs_per_serving,
        )
    }
}

/// Ingredient as stored with a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub recipe_id: RecipeId,
    pub food_id: ItemId,
    pub food_name: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<&RecipeIngredient> for IngredientLine {
    fn from(ingredient: &RecipeIngredient) -> Self {
        Self {
            item_id: ingredient.food_id,
            name: ingredient.food_name.clone(),
            quantity: ingredient.amount,
        }
    }
}

/// Create/update payload for a recipe.
///
/// `creator_id` is only sent on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub servings: i32,
    pub preparation_time: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<i64>,
    pub recommended_for: Goal,
    pub calories_per_serving: f64,
    pub protein_per_serving: f64,
    pub fat_per_serving: f64,
    pub carbs_per_serving: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_line_wire_names() {
        let line = IngredientLine {
            item_id: 4,
            name: "Rice".into(),
            quantity: 150.0,
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["foodId"], 4);
        assert_eq!(json["foodName"], "Rice");
        assert_eq!(json["amount"], 150.0);
    }

    #[test]
    fn test_recipe_request_omits_creator_on_update() {
        let request = RecipeRequest {
            name: "Porridge".into(),
            description: "Warm".into(),
            instructions: "Boil".into(),
            ingredients: vec![],
            servings: 1,
            preparation_time: 5,
            creator_id: None,
            recommended_for: Goal::LoseWeight,
            calories_per_serving: 0.0,
            protein_per_serving: 0.0,
            fat_per_serving: 0.0,
            carbs_per_serving: 0.0,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("creatorId").is_none());
        assert_eq!(json["recommendedFor"], "LOSE_WEIGHT");
    }
}
