//! Canonical catalog plus a derived, filtered view

use super::filter::{FilterState, ViewFilter};
use crate::backend::CatalogBackend;
use crate::config::Messages;
use crate::error::{ClientError, Result};
use crate::gateway::{OperationId, OperationTracker};
use crate::nutrients::{CatalogIndex, CatalogSource};
use crate::types::{CatalogItem, ItemId, NewCatalogItem};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct CatalogState {
    items: Vec<CatalogItem>,
    /// Bumped on every change to `items`
    version: u64,
    filter: ViewFilter,
    /// Bumped on every change to `filter`
    filter_epoch: u64,
    /// Dispatch stamp of the operation that set `filter`
    filter_stamp: OperationId,
    view: Arc<Vec<CatalogItem>>,
    view_key: (u64, u64),
    index: Arc<CatalogIndex>,
    index_version: u64,
    categories: Vec<String>,
}

impl CatalogState {
    fn items_changed(&mut self) {
        self.version += 1;
        self.refresh_view();
    }

    /// Install `filter` unless a later-dispatched operation already set one.
    fn set_filter(&mut self, filter: ViewFilter, stamp: OperationId) -> bool {
        if stamp < self.filter_stamp {
            return false;
        }
        self.filter = filter;
        self.filter_stamp = stamp;
        self.filter_epoch += 1;
        self.refresh_view();
        true
    }

    fn refresh_view(&mut self) {
        let key = (self.version, self.filter_epoch);
        if key != self.view_key {
            self.view = Arc::new(self.filter.apply(&self.items));
            self.view_key = key;
        }
    }

    fn remove(&mut self, id: ItemId) {
        self.items.retain(|item| item.id != id);
        if self.filter.forget(id) {
            self.filter_epoch += 1;
        }
        self.items_changed();
    }

    fn upsert(&mut self, item: CatalogItem) {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }
}

/// Food catalog store.
///
/// The canonical list is the source of truth. The view is derived from it
/// and the active filter, and is recomputed only when either changes. Every
/// mutation updates both under one write lock.
///
/// Reads (`fetch_all`, `search`, ...) absorb failures into `error()`.
/// Mutations record the failure and also return it.
#[derive(Clone)]
pub struct CatalogStore {
    backend: Arc<dyn CatalogBackend>,
    state: Arc<RwLock<CatalogState>>,
    tracker: OperationTracker,
    messages: Arc<Messages>,
}

impl CatalogStore {
    pub fn new(backend: Arc<dyn CatalogBackend>, messages: Arc<Messages>) -> Self {
        Self {
            backend,
            state: Arc::new(RwLock::new(CatalogState::default())),
            tracker: OperationTracker::new(),
            messages,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.tracker.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.tracker.error()
    }

    pub fn clear_error(&self) {
        self.tracker.clear_error()
    }

    pub fn tracker(&self) -> &OperationTracker {
        &self.tracker
    }

    /// Canonical list
    pub async fn items(&self) -> Vec<CatalogItem> {
        self.state.read().await.items.clone()
    }

    /// Filtered view
    pub async fn view(&self) -> Arc<Vec<CatalogItem>> {
        self.state.read().await.view.clone()
    }

    pub async fn filter_state(&self) -> FilterState {
        self.state.read().await.filter.state()
    }

    pub async fn has_active_filters(&self) -> bool {
        self.state.read().await.filter.is_active()
    }

    pub async fn get(&self, id: ItemId) -> Option<CatalogItem> {
        self.state
            .read()
            .await
            .items
            .iter()
            .find(|item| item.id == id)
            .cloned()
    }

    /// Categories from the last `fetch_categories`
    pub async fn categories(&self) -> Vec<String> {
        self.state.read().await.categories.clone()
    }

    /// Replace the canonical list and show all of it.
    pub async fn fetch_all(&self) {
        let guard = self.tracker.begin("fetch_all");
        let stamp = guard.id();
        match self.backend.fetch_all().await {
            Ok(items) => {
                let count = items.len();
                let mut state = self.state.write().await;
                state.items = items;
                state.version += 1;
                if !state.set_filter(ViewFilter::All, stamp) {
                    state.refresh_view();
                }
                drop(state);
                tracing::info!(count, "catalog loaded");
                guard.succeed();
            }
            Err(err) => guard.fail(err.user_message(&self.messages.fetch_catalog_failed)),
        }
    }

    pub async fn fetch_categories(&self) {
        let guard = self.tracker.begin("fetch_categories");
        match self.backend.categories().await {
            Ok(categories) => {
                self.state.write().await.categories = categories;
                guard.succeed();
            }
            Err(err) => guard.fail(err.user_message(&self.messages.fetch_categories_failed)),
        }
    }

    pub async fn create(&self, item: NewCatalogItem) -> Result<CatalogItem> {
        const OPERATION: &str = "create";
        self.check(OPERATION, &item)?;

        let guard = self.tracker.begin(OPERATION);
        match self.backend.create(&item).await {
            Ok(created) => {
                let mut state = self.state.write().await;
                state.upsert(created.clone());
                state.items_changed();
                drop(state);
                tracing::info!(id = created.id, name = %created.name, "catalog item created");
                guard.succeed();
                Ok(created)
            }
            Err(err) => {
                guard.fail(err.user_message(&self.messages.create_item_failed));
                Err(err)
            }
        }
    }

    /// Replace an item. The server's copy wins over `item`.
    pub async fn update(&self, id: ItemId, item: NewCatalogItem) -> Result<CatalogItem> {
        const OPERATION: &str = "update";
        self.check(OPERATION, &item)?;

        let guard = self.tracker.begin(OPERATION);
        match self.backend.update(id, &item).await {
            Ok(updated) => {
                let mut state = self.state.write().await;
                state.upsert(updated.clone());
                state.items_changed();
                drop(state);
                tracing::info!(id, "catalog item updated");
                guard.succeed();
                Ok(updated)
            }
            Err(err) => {
                guard.fail(err.user_message(&self.messages.update_item_failed));
                Err(err)
            }
        }
    }

    pub async fn remove(&self, id: ItemId) -> Result<()> {
        let guard = self.tracker.begin("remove");
        match self.backend.delete(id).await {
            Ok(()) => {
                let mut state = self.state.write().await;
                state.remove(id);
                drop(state);
                tracing::info!(id, "catalog item removed");
                guard.succeed();
                Ok(())
            }
            Err(err) => {
                guard.fail(err.user_message(&self.messages.delete_item_failed));
                Err(err)
            }
        }
    }

    /// Show items matching `query`. A blank query shows everything.
    ///
    /// Clears any category filter.
    pub async fn search(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.reset_filter().await;
            return;
        }

        let guard = self.tracker.begin("search");
        let stamp = guard.id();
        match self.backend.search(query).await {
            Ok(results) => {
                let count = results.len();
                self.apply_results(ViewFilter::query(query, results), stamp)
                    .await;
                tracing::debug!(query, count, "catalog search applied");
                guard.succeed();
            }
            Err(err) => guard.fail(err.user_message(&self.messages.search_failed)),
        }
    }

    /// Show items in `category`. An empty category shows everything.
    ///
    /// Clears any search query.
    pub async fn filter_by_category(&self, category: &str) {
        let category = category.trim();
        if category.is_empty() {
            self.reset_filter().await;
            return;
        }

        let guard = self.tracker.begin("filter_by_category");
        let stamp = guard.id();
        match self.backend.by_category(category).await {
            Ok(results) => {
                self.apply_results(ViewFilter::category(category, results), stamp)
                    .await;
                guard.succeed();
            }
            Err(err) => guard.fail(err.user_message(&self.messages.category_filter_failed)),
        }
    }

    pub async fn clear_filters(&self) {
        self.reset_filter().await;
    }

    async fn reset_filter(&self) {
        let stamp = self.tracker.stamp();
        self.state.write().await.set_filter(ViewFilter::All, stamp);
    }

    /// Switch to `filter` and its server results. The canonical list is
    /// left alone.
    async fn apply_results(&self, filter: ViewFilter, stamp: OperationId) {
        if !self.state.write().await.set_filter(filter, stamp) {
            tracing::debug!(stamp, "discarding results superseded by a later filter");
        }
    }

    fn check(&self, operation: &'static str, item: &NewCatalogItem) -> Result<()> {
        item.validate().map_err(|err| {
            let message = match &err {
                ClientError::Validation(message) => message.clone(),
                other => other.to_string(),
            };
            self.tracker.reject(operation, message);
            err
        })
    }
}

#[async_trait]
impl CatalogSource for CatalogStore {
    async fn index(&self) -> Arc<CatalogIndex> {
        {
            let state = self.state.read().await;
            if state.index_version == state.version {
                return state.index.clone();
            }
        }

        let mut state = self.state.write().await;
        if state.index_version != state.version {
            let index: CatalogIndex = state.items.iter().map(|item| (item.id, item.clone())).collect();
            state.index = Arc::new(index);
            state.index_version = state.version;
        }
        state.index.clone()
    }
}
