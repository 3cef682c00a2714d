//! Per-field draft validation

use super::model::RecipeDraft;
use crate::config::Messages;
use std::collections::BTreeMap;
use std::fmt;

/// Form fields that can carry a validation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecipeField {
    Name,
    Description,
    Instructions,
    Ingredients,
    PreparationTime,
    Servings,
    Calories,
    Protein,
    Fat,
    Carbs,
}

/// Field -> message, empty when the draft is valid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors(BTreeMap<RecipeField, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: RecipeField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecipeField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn insert(&mut self, field: RecipeField, message: &str) {
        self.0.insert(field, message.to_string());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{:?}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Check a draft before submission.
pub fn validate(draft: &RecipeDraft, messages: &Messages) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if draft.name.trim().is_empty() {
        errors.insert(RecipeField::Name, &messages.name_required);
    }
    if draft.description.trim().is_empty() {
        errors.insert(RecipeField::Description, &messages.description_required);
    }
    if draft.instructions.trim().is_empty() {
        errors.insert(RecipeField::Instructions, &messages.instructions_required);
    }
    if draft.submittable_lines().next().is_none() {
        errors.insert(RecipeField::Ingredients, &messages.ingredient_required);
    }
    if draft.preparation_time < 0 {
        errors.insert(RecipeField::PreparationTime, &messages.preparation_time_negative);
    }
    if draft.servings <= 0 {
        errors.insert(RecipeField::Servings, &messages.servings_not_positive);
    }

    let totals = draft.totals;
    for (field, value) in [
        (RecipeField::Calories, totals.energy),
        (RecipeField::Protein, totals.protein),
        (RecipeField::Fat, totals.fat),
        (RecipeField::Carbs, totals.carbs),
    ] {
        if value < 0.0 {
            errors.insert(field, &messages.nutrient_negative);
        }
    }

    errors
}
