//! Entry point wiring a backend to the stores and gateways

use crate::backend::{CatalogBackend, NutritionBackend, RecipeBackend};
use crate::config::{ClientConfig, Messages};
use crate::draft::RecipeForm;
use crate::gateway::{NutritionGateway, RecipeGateway, SessionProvider};
use crate::store::CatalogStore;
use std::sync::Arc;

#[cfg(feature = "client")]
use crate::backend::HttpBackend;
#[cfg(feature = "client")]
use crate::error::Result;

/// Catalog store, nutrition and recipe gateways sharing one backend,
/// session and message set.
#[derive(Clone)]
pub struct NutritionClient {
    config: ClientConfig,
    catalog: CatalogStore,
    nutrition: NutritionGateway,
    recipes: RecipeGateway,
}

impl NutritionClient {
    /// Client talking to the REST API at `config.base_url`.
    #[cfg(feature = "client")]
    pub fn new(config: ClientConfig, session: Arc<dyn SessionProvider>) -> Result<Self> {
        config.validate()?;
        let backend = Arc::new(HttpBackend::new(&config)?);
        tracing::info!(base_url = %config.base_url, "nutrition client configured");
        Ok(Self::with_backend(config, backend, session))
    }

    /// Client over any backend, e.g. [`MockBackend`](crate::backend::MockBackend).
    pub fn with_backend<B>(
        config: ClientConfig,
        backend: Arc<B>,
        session: Arc<dyn SessionProvider>,
    ) -> Self
    where
        B: CatalogBackend + NutritionBackend + RecipeBackend + 'static,
    {
        let messages: Arc<Messages> = Arc::new(config.messages.clone());
        Self {
            catalog: CatalogStore::new(backend.clone(), messages.clone()),
            nutrition: NutritionGateway::new(backend.clone(), session.clone(), messages.clone()),
            recipes: RecipeGateway::new(backend, session, messages),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn nutrition(&self) -> &NutritionGateway {
        &self.nutrition
    }

    pub fn recipes(&self) -> &RecipeGateway {
        &self.recipes
    }

    /// New recipe form reading nutrient values from this client's catalog.
    pub fn recipe_form(&self) -> RecipeForm {
        RecipeForm::new(Arc::new(self.catalog.clone()), &self.config)
    }
}
