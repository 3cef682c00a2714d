//! Recipe persistence

use super::{Gate, OperationTracker, SessionProvider};
use crate::backend::RecipeBackend;
use crate::config::Messages;
use crate::draft::RecipeDraft;
use crate::error::ClientError;
use crate::types::{Recipe, RecipeId};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Server text that means a submitted ingredient points at no catalog item.
const MISSING_FOOD_MARKER: &str = "Food not found with ID";

#[derive(Debug, Default)]
struct RecipeLists {
    all: Vec<Recipe>,
    mine: Vec<Recipe>,
}

/// Recipe operations plus the last-fetched recipe lists.
#[derive(Clone)]
pub struct RecipeGateway {
    backend: Arc<dyn RecipeBackend>,
    gate: Gate,
    lists: Arc<RwLock<RecipeLists>>,
}

impl RecipeGateway {
    pub fn new(
        backend: Arc<dyn RecipeBackend>,
        session: Arc<dyn SessionProvider>,
        messages: Arc<Messages>,
    ) -> Self {
        Self {
            backend,
            gate: Gate::new(session, messages),
            lists: Arc::new(RwLock::new(RecipeLists::default())),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.gate.tracker().is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.gate.tracker().error()
    }

    pub fn clear_error(&self) {
        self.gate.tracker().clear_error()
    }

    pub fn tracker(&self) -> &OperationTracker {
        self.gate.tracker()
    }

    /// Recipes from the last `fetch_all_recipes`
    pub async fn recipes(&self) -> Vec<Recipe> {
        self.lists.read().await.all.clone()
    }

    /// The signed-in user's recipes from the last `fetch_user_recipes`,
    /// kept current by create/update/delete.
    pub async fn user_recipes(&self) -> Vec<Recipe> {
        self.lists.read().await.mine.clone()
    }

    pub async fn fetch_all_recipes(&self) -> Option<Vec<Recipe>> {
        let messages = self.gate.messages();
        let recipes = self
            .gate
            .run("fetch_all_recipes", &messages.fetch_all_recipes_failed, |_| {
                self.backend.all_recipes()
            })
            .await?;
        self.lists.write().await.all = recipes.clone();
        Some(recipes)
    }

    pub async fn fetch_user_recipes(&self) -> Option<Vec<Recipe>> {
        let messages = self.gate.messages();
        let recipes = self
            .gate
            .run("fetch_user_recipes", &messages.fetch_recipes_failed, |user_id| {
                self.backend.user_recipes(user_id)
            })
            .await?;
        self.lists.write().await.mine = recipes.clone();
        Some(recipes)
    }

    /// Validate, map and create a recipe owned by the signed-in user.
    pub async fn create_recipe(&self, draft: &RecipeDraft) -> Option<Recipe> {
        const OPERATION: &str = "create_recipe";
        let user_id = self.gate.require_user(OPERATION)?;
        let request = match draft.to_request(Some(user_id), self.gate.messages()) {
            Ok(request) => request,
            Err(err) => {
                self.reject_invalid(OPERATION, err);
                return None;
            }
        };

        let fallback = &self.gate.messages().create_recipe_failed;
        let recipe = self
            .gate
            .run_mapped(OPERATION, |err| self.describe(err, fallback), |_| {
                self.backend.create_recipe(&request)
            })
            .await?;

        tracing::info!(recipe_id = recipe.id, user_id, "recipe created");
        self.lists.write().await.mine.push(recipe.clone());
        Some(recipe)
    }

    pub async fn update_recipe(&self, id: RecipeId, draft: &RecipeDraft) -> Option<Recipe> {
        const OPERATION: &str = "update_recipe";
        self.gate.require_user(OPERATION)?;
        let request = match draft.to_request(None, self.gate.messages()) {
            Ok(request) => request,
            Err(err) => {
                self.reject_invalid(OPERATION, err);
                return None;
            }
        };

        let fallback = &self.gate.messages().update_recipe_failed;
        let recipe = self
            .gate
            .run_mapped(OPERATION, |err| self.describe(err, fallback), |_| {
                self.backend.update_recipe(id, &request)
            })
            .await?;

        let mut guard = self.lists.write().await;
        let lists = &mut *guard;
        for list in [&mut lists.mine, &mut lists.all] {
            if let Some(existing) = list.iter_mut().find(|r| r.id == id) {
                *existing = recipe.clone();
            }
        }
        Some(recipe)
    }

    /// Returns `true` when the recipe was deleted.
    pub async fn delete_recipe(&self, id: RecipeId) -> bool {
        let messages = self.gate.messages();
        let deleted = self
            .gate
            .run("delete_recipe", &messages.delete_recipe_failed, |_| {
                self.backend.delete_recipe(id)
            })
            .await
            .is_some();

        if deleted {
            let mut lists = self.lists.write().await;
            lists.mine.retain(|r| r.id != id);
            lists.all.retain(|r| r.id != id);
        }
        deleted
    }

    fn reject_invalid(&self, operation: &'static str, err: ClientError) {
        let message = match err {
            ClientError::Validation(message) => message,
            other => other.to_string(),
        };
        self.gate.tracker().reject(operation, message);
    }

    fn describe(&self, err: &ClientError, fallback: &str) -> String {
        match err.server_message() {
            Some(message) if message.contains(MISSING_FOOD_MARKER) => {
                self.gate.messages().missing_catalog_item.clone()
            }
            Some(message) => message.to_string(),
            None => fallback.to_string(),
        }
    }
}
