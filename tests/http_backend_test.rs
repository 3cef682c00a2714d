//! REST adapter tests against a mock HTTP server
#![cfg(feature = "client")]

use nutrition_sdk::backend::{CatalogBackend, NutritionBackend, RecipeBackend};
use nutrition_sdk::types::{ActivityLevel, Gender, Goal};
use nutrition_sdk::{
    CalorieRequest, CatalogStore, ClientConfig, ClientError, HttpBackend, Messages,
    NewCatalogItem,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> HttpBackend {
    let config = ClientConfig {
        api_key: Some("secret-token".into()),
        ..ClientConfig::for_local(format!("{}/api", server.uri()))
    };
    HttpBackend::new(&config).unwrap()
}

fn request() -> CalorieRequest {
    CalorieRequest {
        weight: 60.0,
        height: 165.0,
        age: 40,
        gender: Gender::Female,
        activity_level: ActivityLevel::LightlyActive,
        goal: Goal::MaintainWeight,
    }
}

#[tokio::test]
async fn test_fetch_all_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/foods"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Apple", "kcal": 52, "protein": 0.3, "fat": 0.2, "carbs": 14, "category": "FRUITS"},
            {"id": 2, "name": "Milk", "description": "3.5%", "kcal": 64, "protein": 3.3, "fat": 3.5, "carbs": 4.8}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let items = backend(&server).fetch_all().await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].description.as_deref(), Some("3.5%"));
}

#[tokio::test]
async fn test_search_and_category_paths() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/foods/search"))
        .and(query_param("query", "oat milk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/foods/category/NUTS_SEEDS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend(&server);
    assert!(backend.search("oat milk").await.unwrap().is_empty());
    assert!(backend.by_category("NUTS_SEEDS").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_server_message_surfaces_in_store_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/foods"))
        .and(body_partial_json(json!({"name": "Oats"})))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Food already exists"})),
        )
        .mount(&server)
        .await;

    let store = CatalogStore::new(Arc::new(backend(&server)), Arc::new(Messages::default()));
    let err = store
        .create(NewCatalogItem::new("Oats", 389.0, 16.9, 6.9, 66.3))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ClientError::Server {
            status: 400,
            message: Some("Food already exists".into())
        }
    );
    assert_eq!(store.error().as_deref(), Some("Food already exists"));
    assert!(store.items().await.is_empty());
}

#[tokio::test]
async fn test_not_found_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/recipes/77"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = backend(&server).delete_recipe(77).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn test_smart_plan_query_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/calorie-calculator/generate-smart-meal-plan/9"))
        .and(query_param("includeWorkoutDays", "false"))
        .and(body_partial_json(json!({"activityLevel": "LIGHTLY_ACTIVE"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3,
            "userId": 9,
            "name": "Smart plan",
            "targetCalories": 1900.0,
            "days": [{"dayOfWeek": 1, "meals": [{"type": "BREAKFAST", "items": [{"foodId": 1, "amount": 80.0}]}]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let plan = backend(&server)
        .generate_smart_meal_plan(9, &request(), false)
        .await
        .unwrap();
    assert_eq!(plan.user_id, 9);
    assert_eq!(plan.days[0].meals[0].items[0].amount, 80.0);
}

#[tokio::test]
async fn test_plan_with_config_wraps_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/calorie-calculator/generate-meal-plan-with-config/9"))
        .and(body_partial_json(json!({
            "request": {"gender": "FEMALE"},
            "config": {"durationWeeks": 1, "mealsPerDay": 3}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 4, "userId": 9})))
        .expect(1)
        .mount(&server)
        .await;

    let plan = backend(&server)
        .generate_meal_plan_with_config(9, &request(), &Default::default())
        .await
        .unwrap();
    assert_eq!(plan.id, 4);
    assert!(plan.days.is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_serialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/calorie-calculator/calculate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = backend(&server).calculate(&request()).await.unwrap_err();
    assert!(matches!(err, ClientError::Serialization(_)));
}
