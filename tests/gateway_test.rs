//! Gateway integration tests: auth gating and shared loading/error state

use nutrition_sdk::backend::{MockBackend, MockFailure};
use nutrition_sdk::types::{ActivityLevel, Gender, Goal};
use nutrition_sdk::{
    CalorieRequest, ClientConfig, Messages, NutritionClient, Session, SessionHandle,
};
use std::sync::Arc;
use std::time::Duration;

fn request() -> CalorieRequest {
    CalorieRequest {
        weight: 82.0,
        height: 181.0,
        age: 35,
        gender: Gender::Male,
        activity_level: ActivityLevel::VeryActive,
        goal: Goal::GainWeight,
    }
}

fn client(backend: Arc<MockBackend>, session: SessionHandle) -> NutritionClient {
    NutritionClient::with_backend(ClientConfig::default(), backend, Arc::new(session))
}

#[tokio::test]
async fn test_signed_out_operations_never_load() {
    let backend = Arc::new(MockBackend::new());
    let client = client(backend.clone(), SessionHandle::default());
    let nutrition = client.nutrition();
    let sign_in = Messages::default().sign_in_required;

    assert!(nutrition.calculate_nutrition(&request()).await.is_none());
    assert!(nutrition.generate_daily_plan(&request()).await.is_none());
    assert!(nutrition.generate_smart_meal_plan(&request(), true).await.is_none());
    assert!(client.recipes().fetch_user_recipes().await.is_none());

    assert!(!nutrition.is_loading());
    assert_eq!(nutrition.error(), Some(sign_in.clone()));
    assert_eq!(client.recipes().error(), Some(sign_in));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_authenticated_without_user_id_is_rejected() {
    let backend = Arc::new(MockBackend::new());
    let session = SessionHandle::new(Session {
        authenticated: true,
        user_id: None,
    });
    let client = client(backend.clone(), session);

    assert!(client.nutrition().generate_training_program(&request()).await.is_none());
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_session_changes_take_effect_immediately() {
    let backend = Arc::new(MockBackend::new());
    let session = SessionHandle::default();
    let client = client(backend.clone(), session.clone());

    assert!(client.nutrition().calculate_and_save(&request()).await.is_none());

    session.sign_in(7);
    let response = client.nutrition().calculate_and_save(&request()).await.unwrap();
    assert!(response.tdee > response.bmr);
    assert_eq!(client.nutrition().error(), None);

    let training = client
        .nutrition()
        .generate_training_program(&request())
        .await
        .unwrap();
    assert_eq!(training["userId"], 7);
}

#[tokio::test]
async fn test_failing_call_never_leaves_loading_stuck() {
    let backend = Arc::new(
        MockBackend::new().with_failure("generate_daily_plan", MockFailure::network()),
    );
    let session = SessionHandle::default();
    session.sign_in(1);
    let client = client(backend, session);

    assert!(client.nutrition().generate_daily_plan(&request()).await.is_none());
    assert!(!client.nutrition().is_loading());
    assert_eq!(
        client.nutrition().error(),
        Some(Messages::default().daily_plan_failed)
    );
}

#[tokio::test(start_paused = true)]
async fn test_fast_call_does_not_hide_slow_one() {
    let backend = Arc::new(
        MockBackend::new()
            .with_latency("generate_meal_plan", Duration::from_millis(400))
            .with_latency("calculate", Duration::from_millis(50)),
    );
    let session = SessionHandle::default();
    session.sign_in(1);
    let client = client(backend, session);

    let slow = {
        let nutrition = client.nutrition().clone();
        tokio::spawn(async move { nutrition.generate_meal_plan(&request()).await })
    };
    tokio::time::sleep(Duration::from_millis(1)).await;

    let response = client.nutrition().calculate_nutrition(&request()).await;
    assert!(response.is_some());
    assert!(client.nutrition().is_loading());

    let plan = slow.await.unwrap().unwrap();
    assert_eq!(plan.user_id, 1);
    assert!(!client.nutrition().is_loading());
}

#[tokio::test(start_paused = true)]
async fn test_later_dispatch_decides_error() {
    let backend = Arc::new(
        MockBackend::new()
            .with_latency("generate_meal_plan", Duration::from_millis(400))
            .with_failure("generate_meal_plan", MockFailure::server(500, "planner down")),
    );
    let session = SessionHandle::default();
    session.sign_in(1);
    let client = client(backend, session);

    let early = {
        let nutrition = client.nutrition().clone();
        tokio::spawn(async move { nutrition.generate_meal_plan(&request()).await })
    };
    tokio::time::sleep(Duration::from_millis(1)).await;

    // dispatched later, finishes first
    assert!(client.nutrition().calculate_nutrition(&request()).await.is_some());
    assert!(early.await.unwrap().is_none());

    assert_eq!(client.nutrition().error(), None);
    assert!(!client.nutrition().is_loading());
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_call_clears_loading() {
    let backend = Arc::new(
        MockBackend::new().with_latency("generate_meal_plan", Duration::from_secs(5)),
    );
    let session = SessionHandle::default();
    session.sign_in(1);
    let client = client(backend, session);

    let call = {
        let nutrition = client.nutrition().clone();
        tokio::spawn(async move { nutrition.generate_meal_plan(&request()).await })
    };
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert!(client.nutrition().is_loading());

    call.abort();
    let _ = call.await;
    assert!(!client.nutrition().is_loading());
}
