//! Per-serving totals from ingredient lines

use crate::types::{CatalogItem, IngredientLine, ItemId, NutrientTotals};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Catalog nutrient values are expressed per this many grams.
pub const REFERENCE_QUANTITY: f64 = 100.0;

/// Catalog items keyed by id
pub type CatalogIndex = HashMap<ItemId, CatalogItem>;

/// Read access to catalog items by id
pub trait CatalogLookup {
    fn lookup(&self, id: ItemId) -> Option<&CatalogItem>;
}

impl CatalogLookup for CatalogIndex {
    fn lookup(&self, id: ItemId) -> Option<&CatalogItem> {
        self.get(&id)
    }
}

impl CatalogLookup for [CatalogItem] {
    fn lookup(&self, id: ItemId) -> Option<&CatalogItem> {
        self.iter().find(|item| item.id == id)
    }
}

impl CatalogLookup for Vec<CatalogItem> {
    fn lookup(&self, id: ItemId) -> Option<&CatalogItem> {
        self.as_slice().lookup(id)
    }
}

/// Where a deferred recompute gets the catalog from.
///
/// Called when the computation runs, so a catalog refreshed between
/// scheduling and execution is seen.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn index(&self) -> Arc<CatalogIndex>;
}

#[async_trait]
impl CatalogSource for CatalogIndex {
    async fn index(&self) -> Arc<CatalogIndex> {
        Arc::new(self.clone())
    }
}

/// Compute per-serving totals.
///
/// Lines that are unresolved or missing from `lookup` contribute nothing.
/// A serving count of zero or less yields all-zero totals. Each field is
/// rounded to the nearest whole unit.
pub fn per_serving_totals<L>(lines: &[IngredientLine], servings: i32, lookup: &L) -> NutrientTotals
where
    L: CatalogLookup + ?Sized,
{
    if servings <= 0 {
        return NutrientTotals::ZERO;
    }

    let mut total = NutrientTotals::ZERO;
    for line in lines.iter().filter(|line| line.is_resolved()) {
        let Some(item) = lookup.lookup(line.item_id) else {
            continue;
        };
        let factor = line.quantity / REFERENCE_QUANTITY;
        total.energy += item.kcal * factor;
        total.protein += item.protein * factor;
        total.fat += item.fat * factor;
        total.carbs += item.carbs * factor;
    }

    let servings = f64::from(servings);
    NutrientTotals {
        energy: (total.energy / servings).round(),
        protein: (total.protein / servings).round(),
        fat: (total.fat / servings).round(),
        carbs: (total.carbs / servings).round(),
    }
}
