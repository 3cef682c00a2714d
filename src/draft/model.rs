//! Editable recipe draft

use crate::config::Messages;
use crate::error::{ClientError, Result};
use crate::types::{
    Goal, IngredientLine, NutrientTotals, Recipe, RecipeIngredient, RecipeRequest, UserId,
};

/// Recipe being created or edited.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDraft {
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub ingredients: Vec<IngredientLine>,
    pub servings: i32,
    /// Minutes
    pub preparation_time: i32,
    pub recommended_for: Goal,
    /// Per-serving totals, replaced whole by the aggregator
    pub totals: NutrientTotals,
}

impl RecipeDraft {
    /// Blank draft with one empty ingredient line
    pub fn new() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            instructions: String::new(),
            ingredients: vec![IngredientLine::empty()],
            servings: 1,
            preparation_time: 0,
            recommended_for: Goal::default(),
            totals: NutrientTotals::ZERO,
        }
    }

    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            name: recipe.name.clone(),
            description: recipe.description.clone(),
            instructions: recipe.instructions.clone(),
            ingredients: recipe.ingredients.iter().map(IngredientLine::from).collect(),
            servings: recipe.servings,
            preparation_time: recipe.preparation_time,
            recommended_for: recipe.recommended_for,
            totals: recipe.totals(),
        }
    }

    /// Lines that would be submitted: resolved, named, positive amount.
    pub fn submittable_lines(&self) -> impl Iterator<Item = &IngredientLine> {
        self.ingredients
            .iter()
            .filter(|line| line.is_resolved() && !line.name.trim().is_empty() && line.quantity > 0.0)
    }

    /// Map into a create/update payload.
    ///
    /// Text is trimmed, incomplete ingredient lines are dropped, a
    /// non-positive serving count becomes 1 and a negative preparation time
    /// becomes 0. `creator_id` is set only for creates.
    pub fn to_request(&self, creator_id: Option<UserId>, messages: &Messages) -> Result<RecipeRequest> {
        let name = self.name.trim();
        let description = self.description.trim();
        let instructions = self.instructions.trim();
        for (value, message) in [
            (name, &messages.name_required),
            (description, &messages.description_required),
            (instructions, &messages.instructions_required),
        ] {
            if value.is_empty() {
                return Err(ClientError::Validation(message.clone()));
            }
        }

        let ingredients: Vec<RecipeIngredient> = self
            .submittable_lines()
            .map(|line| RecipeIngredient {
                id: 0,
                recipe_id: 0,
                food_id: line.item_id,
                food_name: line.name.trim().to_string(),
                amount: line.quantity,
                note: None,
            })
            .collect();
        if ingredients.is_empty() {
            return Err(ClientError::Validation(messages.ingredient_required.clone()));
        }

        Ok(RecipeRequest {
            name: name.to_string(),
            description: description.to_string(),
            instructions: instructions.to_string(),
            ingredients,
            servings: if self.servings > 0 { self.servings } else { 1 },
            preparation_time: self.preparation_time.max(0),
            creator_id,
            recommended_for: self.recommended_for,
            calories_per_serving: self.totals.energy,
            protein_per_serving: self.totals.protein,
            fat_per_serving: self.totals.fat,
            carbs_per_serving: self.totals.carbs,
        })
    }
}

impl Default for RecipeDraft {
    fn default() -> Self {
        Self::new()
    }
}
