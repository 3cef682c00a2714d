//! Recipe editor state
//!
//! Ingredient and serving edits schedule a debounced recompute of the
//! per-serving totals. The catalog is read when the recompute runs, not
//! when it is scheduled.

use super::debounce::DebounceScheduler;
use super::model::RecipeDraft;
use super::validation::{validate, ValidationErrors};
use crate::config::{ClientConfig, Messages};
use crate::gateway::RecipeGateway;
use crate::nutrients::{per_serving_totals, CatalogSource};
use crate::types::{CatalogItem, Goal, IngredientLine, NutrientTotals, Recipe, RecipeId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Controller for one create/edit recipe form.
///
/// Must be used inside a Tokio runtime: edits spawn the debounced recompute.
pub struct RecipeForm {
    draft: RecipeDraft,
    catalog: Arc<dyn CatalogSource>,
    scheduler: DebounceScheduler,
    totals: Arc<watch::Sender<NutrientTotals>>,
    /// Bumped on load/reset so a recompute for an old draft is dropped
    generation: Arc<AtomicU64>,
    messages: Arc<Messages>,
    max_lines: usize,
    editing: Option<RecipeId>,
    auto_computed: bool,
    errors: ValidationErrors,
}

impl RecipeForm {
    /// Blank "create" form.
    pub fn new(catalog: Arc<dyn CatalogSource>, config: &ClientConfig) -> Self {
        let (totals, _rx) = watch::channel(NutrientTotals::ZERO);
        Self {
            draft: RecipeDraft::new(),
            catalog,
            scheduler: DebounceScheduler::new(config.debounce()),
            totals: Arc::new(totals),
            generation: Arc::new(AtomicU64::new(0)),
            messages: Arc::new(config.messages.clone()),
            max_lines: config.max_ingredient_lines,
            editing: None,
            auto_computed: false,
            errors: ValidationErrors::default(),
        }
    }

    /// Current draft, including the latest computed totals.
    pub fn draft(&self) -> RecipeDraft {
        let mut draft = self.draft.clone();
        draft.totals = self.totals();
        draft
    }

    pub fn totals(&self) -> NutrientTotals {
        *self.totals.borrow()
    }

    /// Notified each time the totals are replaced
    pub fn watch_totals(&self) -> watch::Receiver<NutrientTotals> {
        self.totals.subscribe()
    }

    /// Recipe being edited, `None` in create mode
    pub fn editing(&self) -> Option<RecipeId> {
        self.editing
    }

    pub fn is_recompute_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Errors from the last `submit` or `validate`
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    pub fn set_instructions(&mut self, instructions: impl Into<String>) {
        self.draft.instructions = instructions.into();
    }

    pub fn set_preparation_time(&mut self, minutes: i32) {
        self.draft.preparation_time = minutes;
    }

    pub fn set_recommended_for(&mut self, goal: Goal) {
        self.draft.recommended_for = goal;
    }

    /// Append a blank line. Refused once the line limit is reached.
    pub fn add_line(&mut self) -> bool {
        if self.draft.ingredients.len() >= self.max_lines {
            return false;
        }
        self.draft.ingredients.push(IngredientLine::empty());
        self.schedule_recompute();
        true
    }

    pub fn remove_line(&mut self, index: usize) -> bool {
        if index >= self.draft.ingredients.len() {
            return false;
        }
        self.draft.ingredients.remove(index);
        self.schedule_recompute();
        true
    }

    /// Point a line at `item`, or clear it with `None`. The amount resets
    /// to 1 and the item's current name is copied into the line.
    pub fn select_item(&mut self, index: usize, item: Option<&CatalogItem>) -> bool {
        let Some(line) = self.draft.ingredients.get_mut(index) else {
            return false;
        };
        *line = item.map(IngredientLine::for_item).unwrap_or_default();
        self.schedule_recompute();
        true
    }

    pub fn set_quantity(&mut self, index: usize, quantity: f64) -> bool {
        let Some(line) = self.draft.ingredients.get_mut(index) else {
            return false;
        };
        line.quantity = quantity;
        self.schedule_recompute();
        true
    }

    pub fn set_servings(&mut self, servings: i32) {
        self.draft.servings = servings;
        self.schedule_recompute();
    }

    /// Load an existing recipe for editing. Its stored totals are shown
    /// until the first recompute.
    pub fn load_recipe(&mut self, recipe: &Recipe) {
        self.start_over(RecipeDraft::from_recipe(recipe));
        self.editing = Some(recipe.id);
        tracing::debug!(recipe_id = recipe.id, "recipe loaded into form");
    }

    /// Back to a blank "create" form.
    pub fn reset(&mut self) {
        self.start_over(RecipeDraft::new());
        self.editing = None;
    }

    fn start_over(&mut self, draft: RecipeDraft) {
        self.scheduler.cancel();
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.totals.send_replace(draft.totals);
        self.draft = draft;
        self.auto_computed = false;
        self.errors = ValidationErrors::default();
    }

    /// Call when the catalog has (re)loaded. For a loaded recipe with
    /// resolved ingredients, recomputes once per load; later calls do
    /// nothing. Returns whether a recompute ran.
    pub async fn catalog_refreshed(&mut self) -> bool {
        if self.editing.is_none()
            || self.auto_computed
            || !self.draft.ingredients.iter().any(IngredientLine::is_resolved)
        {
            return false;
        }
        self.auto_computed = true;
        self.recompute_now().await;
        true
    }

    /// Recompute immediately, cancelling any pending debounced run.
    pub async fn recompute_now(&mut self) -> NutrientTotals {
        self.scheduler.cancel();
        let index = self.catalog.index().await;
        let totals = per_serving_totals(&self.draft.ingredients, self.draft.servings, &*index);
        self.totals.send_replace(totals);
        totals
    }

    /// Re-copy item names from the catalog into resolved lines. Returns how
    /// many lines changed.
    pub async fn refresh_names(&mut self) -> usize {
        let index = self.catalog.index().await;
        let mut changed = 0;
        for line in self.draft.ingredients.iter_mut().filter(|line| line.is_resolved()) {
            if let Some(item) = index.get(&line.item_id) {
                if line.name != item.name {
                    line.name = item.name.clone();
                    changed += 1;
                }
            }
        }
        changed
    }

    pub fn validate(&mut self) -> &ValidationErrors {
        self.errors = validate(&self.draft(), &self.messages);
        &self.errors
    }

    /// Validate and save through `gateway`: update when editing, create
    /// otherwise. A pending recompute is flushed first so the saved totals
    /// match the ingredients.
    ///
    /// Returns `None` when validation fails (see `errors()`) or the gateway
    /// reports a failure (see `gateway.error()`).
    pub async fn submit(&mut self, gateway: &RecipeGateway) -> Option<Recipe> {
        if self.scheduler.is_pending() {
            self.recompute_now().await;
        }
        if !self.validate().is_empty() {
            tracing::debug!(errors = %self.errors, "recipe draft rejected");
            return None;
        }

        let draft = self.draft();
        let saved = match self.editing {
            Some(id) => gateway.update_recipe(id, &draft).await,
            None => gateway.create_recipe(&draft).await,
        }?;
        self.editing = Some(saved.id);
        Some(saved)
    }

    fn schedule_recompute(&mut self) {
        let lines = self.draft.ingredients.clone();
        let servings = self.draft.servings;
        let catalog = self.catalog.clone();
        let totals = self.totals.clone();
        let generation = self.generation.clone();
        let expected = generation.load(Ordering::SeqCst);

        self.scheduler.schedule(move || async move {
            let index = catalog.index().await;
            let computed = per_serving_totals(&lines, servings, &*index);
            if generation.load(Ordering::SeqCst) == expected {
                totals.send_replace(computed);
            }
        });
    }
}
