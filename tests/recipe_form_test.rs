//! Recipe form integration tests: debounced totals, edit loading, submit

use async_trait::async_trait;
use nutrition_sdk::backend::MockBackend;
use nutrition_sdk::types::{Goal, RecipeIngredient};
use nutrition_sdk::{
    CatalogIndex, CatalogItem, CatalogSource, ClientConfig, NewCatalogItem, NutrientTotals,
    NutritionClient, Recipe, RecipeField, RecipeForm, SessionHandle,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn chicken() -> CatalogItem {
    CatalogItem::from_new(1, NewCatalogItem::new("Chicken breast", 200.0, 10.0, 5.0, 30.0))
}

fn rice() -> CatalogItem {
    CatalogItem::from_new(2, NewCatalogItem::new("Rice", 50.0, 0.0, 0.0, 0.0))
}

/// Catalog lookup that counts reads and can change between them
#[derive(Default)]
struct TestCatalog {
    items: Mutex<CatalogIndex>,
    reads: AtomicU32,
}

impl TestCatalog {
    fn with(items: Vec<CatalogItem>) -> Arc<Self> {
        let catalog = Self::default();
        for item in items {
            catalog.put(item);
        }
        Arc::new(catalog)
    }

    fn put(&self, item: CatalogItem) {
        self.items.lock().unwrap().insert(item.id, item);
    }

    fn reads(&self) -> u32 {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for TestCatalog {
    async fn index(&self) -> Arc<CatalogIndex> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Arc::new(self.items.lock().unwrap().clone())
    }
}

fn form(catalog: Arc<TestCatalog>) -> RecipeForm {
    RecipeForm::new(catalog, &ClientConfig::default())
}

fn stored_recipe(id: i64) -> Recipe {
    Recipe {
        id,
        name: "Chicken and rice".into(),
        description: "Simple".into(),
        instructions: "Cook both".into(),
        ingredients: vec![RecipeIngredient {
            id: 10,
            recipe_id: id,
            food_id: 1,
            food_name: "Chicken".into(),
            amount: 150.0,
            note: None,
        }],
        servings: 1,
        preparation_time: 20,
        creator_id: Some(4),
        recommended_for: Goal::GainWeight,
        calories_per_serving: 1.0,
        protein_per_serving: 1.0,
        fat_per_serving: 1.0,
        carbs_per_serving: 1.0,
    }
}

#[tokio::test(start_paused = true)]
async fn test_totals_follow_edits_after_quiet_period() {
    let catalog = TestCatalog::with(vec![chicken()]);
    let mut form = form(catalog.clone());

    assert!(form.select_item(0, Some(&chicken())));
    assert!(form.set_quantity(0, 150.0));
    assert_eq!(form.totals(), NutrientTotals::ZERO);
    assert!(form.is_recompute_pending());

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(form.totals(), NutrientTotals::new(300.0, 15.0, 8.0, 45.0));
    assert_eq!(catalog.reads(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_edits_compute_once() {
    let catalog = TestCatalog::with(vec![chicken(), rice()]);
    let mut form = form(catalog.clone());

    form.select_item(0, Some(&chicken()));
    form.set_quantity(0, 200.0);
    form.add_line();
    form.select_item(1, Some(&rice()));
    form.set_quantity(1, 100.0);
    tokio::time::sleep(Duration::from_millis(100)).await;
    form.set_servings(2);

    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(catalog.reads(), 1);
    assert_eq!(form.totals().energy, 225.0);
}

#[tokio::test(start_paused = true)]
async fn test_catalog_read_when_recompute_runs() {
    let catalog = TestCatalog::with(vec![]);
    let mut form = form(catalog.clone());

    form.select_item(0, Some(&rice()));
    form.set_quantity(0, 200.0);
    // the item shows up in the lookup only after scheduling
    catalog.put(rice());

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(form.totals().energy, 100.0);
}

#[tokio::test(start_paused = true)]
async fn test_reset_discards_pending_recompute() {
    let catalog = TestCatalog::with(vec![chicken()]);
    let mut form = form(catalog.clone());

    form.select_item(0, Some(&chicken()));
    form.reset();
    assert!(!form.is_recompute_pending());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(catalog.reads(), 0);
    assert_eq!(form.totals(), NutrientTotals::ZERO);
    assert_eq!(form.draft(), nutrition_sdk::RecipeDraft::new());
}

#[tokio::test]
async fn test_loaded_recipe_auto_computes_once_per_load() {
    let catalog = TestCatalog::with(vec![chicken()]);
    let mut form = form(catalog.clone());

    form.load_recipe(&stored_recipe(5));
    assert_eq!(form.editing(), Some(5));
    assert_eq!(form.totals(), NutrientTotals::new(1.0, 1.0, 1.0, 1.0));

    assert!(form.catalog_refreshed().await);
    assert_eq!(form.totals().energy, 300.0);
    assert!(!form.catalog_refreshed().await);
    assert_eq!(catalog.reads(), 1);

    form.load_recipe(&stored_recipe(6));
    assert!(form.catalog_refreshed().await);

    form.reset();
    assert_eq!(form.editing(), None);
    assert!(!form.catalog_refreshed().await);
}

#[tokio::test]
async fn test_line_limit_and_bounds() {
    let mut form = form(TestCatalog::with(vec![]));

    for _ in 1..10 {
        assert!(form.add_line());
    }
    assert!(!form.add_line());
    assert_eq!(form.draft().ingredients.len(), 10);

    assert!(form.remove_line(9));
    assert!(!form.remove_line(9));
    assert!(!form.set_quantity(42, 1.0));
    assert!(!form.select_item(42, None));
}

#[tokio::test]
async fn test_select_resets_amount_and_snapshots_name() {
    let catalog = TestCatalog::with(vec![chicken()]);
    let mut form = form(catalog.clone());

    form.set_quantity(0, 250.0);
    form.select_item(0, Some(&chicken()));
    let draft = form.draft();
    let line = &draft.ingredients[0];
    assert_eq!(line.quantity, 1.0);
    assert_eq!(line.name, "Chicken breast");

    // renamed in the catalog; the line keeps its snapshot until refreshed
    let mut renamed = chicken();
    renamed.name = "Chicken fillet".into();
    catalog.put(renamed);
    assert_eq!(form.draft().ingredients[0].name, "Chicken breast");

    assert_eq!(form.refresh_names().await, 1);
    assert_eq!(form.draft().ingredients[0].name, "Chicken fillet");
    assert_eq!(form.refresh_names().await, 0);
}

#[tokio::test]
async fn test_submit_creates_then_updates() {
    let backend = Arc::new(MockBackend::new().with_items([chicken(), rice()]));
    let session = SessionHandle::default();
    session.sign_in(4);
    let client = NutritionClient::with_backend(ClientConfig::default(), backend, Arc::new(session));
    client.catalog().fetch_all().await;

    let mut form = client.recipe_form();
    assert!(form.submit(client.recipes()).await.is_none());
    assert!(form.errors().get(RecipeField::Name).is_some());

    form.set_name("Chicken bowl");
    form.set_description("High protein");
    form.set_instructions("Grill and serve");
    form.select_item(0, client.catalog().get(1).await.as_ref());
    form.set_quantity(0, 150.0);

    let created = form.submit(client.recipes()).await.unwrap();
    assert!(form.errors().is_empty());
    assert_eq!(created.creator_id, Some(4));
    assert_eq!(created.calories_per_serving, 300.0);
    assert_eq!(form.editing(), Some(created.id));

    form.set_servings(2);
    let updated = form.submit(client.recipes()).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.calories_per_serving, 150.0);
    assert_eq!(client.recipes().user_recipes().await, vec![updated]);
}

#[tokio::test]
async fn test_zero_amount_blocked_before_submit() {
    let backend = Arc::new(MockBackend::new().with_items([chicken()]));
    let session = SessionHandle::default();
    session.sign_in(4);
    let client = NutritionClient::with_backend(ClientConfig::default(), backend.clone(), Arc::new(session));

    let mut form = client.recipe_form();
    form.set_name("Chicken bowl");
    form.set_description("High protein");
    form.set_instructions("Grill and serve");
    form.select_item(0, Some(&chicken()));
    form.set_quantity(0, 0.0);

    assert!(form.submit(client.recipes()).await.is_none());
    assert!(form.errors().get(RecipeField::Ingredients).is_some());
    assert_eq!(client.recipes().error(), None);
    assert_eq!(backend.calls_to("create_recipe"), 0);
}
