//! Food catalog records

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};

/// Catalog item identifier. `0` means "unresolved".
pub type ItemId = i64;

/// A food record with nutrients per 100 g.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Energy (kcal) per 100 g
    pub kcal: f64,
    /// Protein (g) per 100 g
    pub protein: f64,
    /// Fat (g) per 100 g
    pub fat: f64,
    /// Carbohydrate (g) per 100 g
    pub carbs: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl CatalogItem {
    /// Build a stored record from a create/update payload
    pub fn from_new(id: ItemId, item: NewCatalogItem) -> Self {
        Self {
            id,
            name: item.name,
            description: item.description,
            kcal: item.kcal,
            protein: item.protein,
            fat: item.fat,
            carbs: item.carbs,
            category: item.category,
        }
    }

    /// Category tag parsed into a known category, if it is one
    pub fn food_category(&self) -> Option<FoodCategory> {
        self.category.as_deref().and_then(FoodCategory::from_str)
    }

    /// Case-insensitive category comparison
    pub fn in_category(&self, category: &str) -> bool {
        self.category
            .as_deref()
            .map(|c| c.eq_ignore_ascii_case(category.trim()))
            .unwrap_or(false)
    }

    /// Case-insensitive name substring match
    pub fn name_contains(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.trim().to_lowercase())
    }
}

/// Payload for creating or updating a catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCatalogItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kcal: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl NewCatalogItem {
    pub fn new(name: impl Into<String>, kcal: f64, protein: f64, fat: f64, carbs: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            kcal,
            protein,
            fat,
            carbs,
            category: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: FoodCategory) -> Self {
        self.category = Some(category.as_str().to_string());
        self
    }

    /// Reject empty names and negative or non-finite nutrient values
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ClientError::Validation("name is required".into()));
        }
        for (field, value) in [
            ("kcal", self.kcal),
            ("protein", self.protein),
            ("fat", self.fat),
            ("carbs", self.carbs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ClientError::Validation(format!(
                    "{} must be a non-negative number",
                    field
                )));
            }
        }
        Ok(())
    }
}

/// Categories the backend knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FoodCategory {
    Fruits,
    Vegetables,
    Grains,
    Protein,
    Dairy,
    Fats,
    Sweets,
    Beverages,
    NutsSeeds,
    Legumes,
    Other,
}

impl FoodCategory {
    pub const ALL: [FoodCategory; 11] = [
        Self::Fruits,
        Self::Vegetables,
        Self::Grains,
        Self::Protein,
        Self::Dairy,
        Self::Fats,
        Self::Sweets,
        Self::Beverages,
        Self::NutsSeeds,
        Self::Legumes,
        Self::Other,
    ];

    /// Parse from the wire representation (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fruits => "FRUITS",
            Self::Vegetables => "VEGETABLES",
            Self::Grains => "GRAINS",
            Self::Protein => "PROTEIN",
            Self::Dairy => "DAIRY",
            Self::Fats => "FATS",
            Self::Sweets => "SWEETS",
            Self::Beverages => "BEVERAGES",
            Self::NutsSeeds => "NUTS_SEEDS",
            Self::Legumes => "LEGUMES",
            Self::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
