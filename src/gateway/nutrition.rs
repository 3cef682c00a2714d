//! Calorie calculator and plan generation

use super::{Gate, OperationTracker, SessionProvider};
use crate::backend::NutritionBackend;
use crate::config::Messages;
use crate::types::{CalorieRequest, CalorieResponse, GeneratedPlan, MealPlan, MealPlanConfig};
use std::sync::Arc;

/// Nutrition planning operations.
///
/// All computation happens server-side; this only gates, dispatches and
/// reports.
#[derive(Clone)]
pub struct NutritionGateway {
    backend: Arc<dyn NutritionBackend>,
    gate: Gate,
}

impl NutritionGateway {
    pub fn new(
        backend: Arc<dyn NutritionBackend>,
        session: Arc<dyn SessionProvider>,
        messages: Arc<Messages>,
    ) -> Self {
        Self {
            backend,
            gate: Gate::new(session, messages),
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

    /// BMR, TDEE, daily target and macro split without saving anything
    pub async fn calculate_nutrition(&self, request: &CalorieRequest) -> Option<CalorieResponse> {
        let messages = self.gate.messages();
        self.gate
            .run("calculate_nutrition", &messages.calculate_failed, |_| {
                self.backend.calculate(request)
            })
            .await
    }

    /// Calculate and store the result in the user's personal settings
    pub async fn calculate_and_save(&self, request: &CalorieRequest) -> Option<CalorieResponse> {
        let messages = self.gate.messages();
        self.gate
            .run("calculate_and_save", &messages.save_settings_failed, |user_id| {
                self.backend.calculate_and_save(user_id, request)
            })
            .await
    }

    pub async fn generate_training_program(&self, request: &CalorieRequest) -> Option<GeneratedPlan> {
        let messages = self.gate.messages();
        self.gate
            .run(
                "generate_training_program",
                &messages.training_program_failed,
                |user_id| self.backend.generate_training_program(user_id, request),
            )
            .await
    }

    pub async fn generate_meal_plan(&self, request: &CalorieRequest) -> Option<MealPlan> {
        let messages = self.gate.messages();
        self.gate
            .run("generate_meal_plan", &messages.meal_plan_failed, |user_id| {
                self.backend.generate_meal_plan(user_id, request)
            })
            .await
    }

    pub async fn generate_smart_meal_plan(
        &self,
        request: &CalorieRequest,
        include_workout_days: bool,
    ) -> Option<MealPlan> {
        let messages = self.gate.messages();
        self.gate
            .run(
                "generate_smart_meal_plan",
                &messages.smart_meal_plan_failed,
                |user_id| {
                    self.backend
                        .generate_smart_meal_plan(user_id, request, include_workout_days)
                },
            )
            .await
    }

    /// Smart plan with explicit options. An invalid `config` is rejected
    /// before any call.
    pub async fn generate_smart_meal_plan_with_config(
        &self,
        request: &CalorieRequest,
        config: &MealPlanConfig,
    ) -> Option<MealPlan> {
        const OPERATION: &str = "generate_smart_meal_plan_with_config";
        if !self.config_is_valid(OPERATION, config) {
            return None;
        }
        let messages = self.gate.messages();
        self.gate
            .run(OPERATION, &messages.smart_meal_plan_config_failed, |user_id| {
                self.backend
                    .generate_smart_meal_plan_with_config(user_id, request, config)
            })
            .await
    }

    pub async fn generate_meal_plan_with_config(
        &self,
        request: &CalorieRequest,
        config: &MealPlanConfig,
    ) -> Option<MealPlan> {
        const OPERATION: &str = "generate_meal_plan_with_config";
        if !self.config_is_valid(OPERATION, config) {
            return None;
        }
        let messages = self.gate.messages();
        self.gate
            .run(OPERATION, &messages.meal_plan_config_failed, |user_id| {
                self.backend
                    .generate_meal_plan_with_config(user_id, request, config)
            })
            .await
    }

    pub async fn generate_daily_plan(&self, request: &CalorieRequest) -> Option<GeneratedPlan> {
        let messages = self.gate.messages();
        self.gate
            .run("generate_daily_plan", &messages.daily_plan_failed, |user_id| {
                self.backend.generate_daily_plan(user_id, request)
            })
            .await
    }

    fn config_is_valid(&self, operation: &'static str, config: &MealPlanConfig) -> bool {
        match config.validate() {
            Ok(()) => true,
            Err(err) => {
                self.gate.tracker().reject(operation, err.to_string());
                false
            }
        }
    }
}
