//! Auth-gated async operations.
//!
//! Each gateway wraps a backend and exposes named operations. An operation:
//!
//! 1. checks the session; without a signed-in user it records the
//!    sign-in message and returns `None` without calling the backend
//! 2. marks itself loading and clears the previous error
//! 3. on failure records the server's message, or the operation's
//!    fallback, and returns `None`
//!
//! Errors never propagate out of a gateway call. Read them back through
//! `error()`.

mod nutrition;
mod recipes;
mod session;
mod tracker;

pub use nutrition::NutritionGateway;
pub use recipes::RecipeGateway;
pub use session::{Session, SessionHandle, SessionProvider};
pub use tracker::{OperationGuard, OperationId, OperationTracker};

use crate::config::Messages;
use crate::error::{ClientError, Result};
use crate::types::UserId;
use std::future::Future;
use std::sync::Arc;

/// Session check plus loading/error bookkeeping shared by the gateways.
#[derive(Clone)]
pub(crate) struct Gate {
    session: Arc<dyn SessionProvider>,
    tracker: OperationTracker,
    messages: Arc<Messages>,
}

impl Gate {
    pub(crate) fn new(session: Arc<dyn SessionProvider>, messages: Arc<Messages>) -> Self {
        Self {
            session,
            tracker: OperationTracker::new(),
            messages,
        }
    }

    pub(crate) fn tracker(&self) -> &OperationTracker {
        &self.tracker
    }

    pub(crate) fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Signed-in user, or record the sign-in message under `operation`.
    pub(crate) fn require_user(&self, operation: &'static str) -> Option<UserId> {
        let user_id = self.session.session().active_user();
        if user_id.is_none() {
            self.tracker
                .reject(operation, self.messages.sign_in_required.clone());
        }
        user_id
    }

    /// Run `call` for the signed-in user, reporting failures with `fallback`.
    pub(crate) async fn run<T, F, Fut>(
        &self,
        operation: &'static str,
        fallback: &str,
        call: F,
    ) -> Option<T>
    where
        F: FnOnce(UserId) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.run_mapped(operation, |err| err.user_message(fallback), call)
            .await
    }

    /// Like [`run`](Self::run) with a custom error-to-message mapping.
    pub(crate) async fn run_mapped<T, M, F, Fut>(
        &self,
        operation: &'static str,
        describe: M,
        call: F,
    ) -> Option<T>
    where
        M: FnOnce(&ClientError) -> String,
        F: FnOnce(UserId) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let user_id = self.require_user(operation)?;
        let guard = self.tracker.begin(operation);
        match call(user_id).await {
            Ok(value) => {
                guard.succeed();
                Some(value)
            }
            Err(err) => {
                tracing::debug!(operation, error = %err, "backend call failed");
                guard.fail(describe(&err));
                None
            }
        }
    }
}
