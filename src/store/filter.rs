//! View modes over the canonical catalog

use crate::types::{CatalogItem, ItemId};
use std::collections::{HashMap, HashSet};

/// Which slice of the catalog the view shows.
///
/// A query and a category are never active together. The server's results
/// are held here, not merged into the canonical list.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewFilter {
    #[default]
    All,
    Query {
        query: String,
        /// Server results, in the order the server ranked them
        results: Vec<CatalogItem>,
    },
    Category {
        category: String,
        results: Vec<CatalogItem>,
    },
}

impl ViewFilter {
    pub fn query(query: impl Into<String>, results: Vec<CatalogItem>) -> Self {
        Self::Query {
            query: query.into(),
            results,
        }
    }

    pub fn category(category: impl Into<String>, results: Vec<CatalogItem>) -> Self {
        Self::Category {
            category: category.into(),
            results,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::All)
    }

    fn results(&self) -> &[CatalogItem] {
        match self {
            Self::All => &[],
            Self::Query { results, .. } | Self::Category { results, .. } => results,
        }
    }

    /// Local predicate for items the server has not returned (local creates).
    pub fn matches(&self, item: &CatalogItem) -> bool {
        match self {
            Self::All => true,
            Self::Query { query, .. } => item.name_contains(query),
            Self::Category { category, .. } => item.in_category(category),
        }
    }

    /// Drop a deleted item from the held results. Returns whether it was there.
    pub fn forget(&mut self, id: ItemId) -> bool {
        match self {
            Self::All => false,
            Self::Query { results, .. } | Self::Category { results, .. } => {
                let before = results.len();
                results.retain(|item| item.id != id);
                results.len() != before
            }
        }
    }

    /// Items this mode shows.
    ///
    /// Server results come first in server order, each replaced by its
    /// canonical copy when there is one. Canonical items the server did not
    /// return follow when they match locally.
    pub fn apply(&self, items: &[CatalogItem]) -> Vec<CatalogItem> {
        if !self.is_active() {
            return items.to_vec();
        }

        let canonical: HashMap<ItemId, &CatalogItem> =
            items.iter().map(|item| (item.id, item)).collect();
        let results = self.results();
        let seen: HashSet<ItemId> = results.iter().map(|item| item.id).collect();

        let mut view: Vec<CatalogItem> = results
            .iter()
            .map(|hit| canonical.get(&hit.id).copied().unwrap_or(hit).clone())
            .collect();
        view.extend(
            items
                .iter()
                .filter(|item| !seen.contains(&item.id) && self.matches(item))
                .cloned(),
        );
        view
    }

    pub fn state(&self) -> FilterState {
        match self {
            Self::All => FilterState::default(),
            Self::Query { query, .. } => FilterState {
                query: Some(query.clone()),
                category: None,
            },
            Self::Category { category, .. } => FilterState {
                query: None,
                category: Some(category.clone()),
            },
        }
    }
}

/// Active search text and category, as exposed to callers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub query: Option<String>,
    pub category: Option<String>,
}

impl FilterState {
    pub fn is_active(&self) -> bool {
        self.query.is_some() || self.category.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FoodCategory, NewCatalogItem};

    fn items() -> Vec<CatalogItem> {
        vec![
            CatalogItem::from_new(
                1,
                NewCatalogItem::new("Apple", 52.0, 0.3, 0.2, 14.0).with_category(FoodCategory::Fruits),
            ),
            CatalogItem::from_new(2, NewCatalogItem::new("Almonds", 579.0, 21.0, 50.0, 22.0)),
            CatalogItem::from_new(
                3,
                NewCatalogItem::new("Banana", 89.0, 1.1, 0.3, 23.0).with_category(FoodCategory::Fruits),
            ),
        ]
    }

    #[test]
    fn test_server_results_then_local_matches() {
        let items = items();
        // server matched "Almonds" on a field we cannot see locally
        let filter = ViewFilter::query("app", vec![items[1].clone()]);

        let ids: Vec<ItemId> = filter.apply(&items).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(filter.state().query.as_deref(), Some("app"));
        assert_eq!(filter.state().category, None);
    }

    #[test]
    fn test_server_order_kept_and_canonical_copy_preferred() {
        let mut items = items();
        let filter = ViewFilter::query("a", vec![items[2].clone(), items[0].clone()]);
        items[2].name = "Plantain".into();

        let view = filter.apply(&items);
        let ids: Vec<ItemId> = view.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(view[0].name, "Plantain");
    }

    #[test]
    fn test_results_not_in_canonical_still_shown() {
        let items = items();
        let hit = CatalogItem::from_new(9, NewCatalogItem::new("Oat milk", 45.0, 1.0, 1.5, 6.6));
        let mut filter = ViewFilter::query("oat", vec![hit]);

        assert_eq!(filter.apply(&items).len(), 1);
        assert!(filter.forget(9));
        assert!(!filter.forget(9));
        assert!(filter.apply(&items).is_empty());
    }

    #[test]
    fn test_category_mode() {
        let items = items();
        let filter = ViewFilter::category("FRUITS", Vec::new());

        let ids: Vec<ItemId> = filter.apply(&items).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(filter.is_active());
        assert!(!ViewFilter::All.is_active());
        assert_eq!(ViewFilter::All.apply(&items).len(), 3);
    }
}
