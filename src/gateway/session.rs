//! Authentication state supplied by the host application

use crate::types::UserId;
use std::sync::Arc;
use tokio::sync::watch;

/// Who is signed in, as reported by the host's auth layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    pub user_id: Option<UserId>,
}

impl Session {
    pub fn signed_in(user_id: UserId) -> Self {
        Self {
            authenticated: true,
            user_id: Some(user_id),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// User id, only when authenticated. Authenticated without an id counts
    /// as signed out.
    pub fn active_user(&self) -> Option<UserId> {
        if self.authenticated {
            self.user_id
        } else {
            None
        }
    }
}

/// Source of the current session, read at the start of every operation.
pub trait SessionProvider: Send + Sync {
    fn session(&self) -> Session;
}

impl SessionProvider for Session {
    fn session(&self) -> Session {
        self.clone()
    }
}

/// Mutable session shared between the host and the gateways
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: Arc<watch::Sender<Session>>,
}

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        let (tx, _rx) = watch::channel(session);
        Self { tx: Arc::new(tx) }
    }

    pub fn sign_in(&self, user_id: UserId) {
        tracing::debug!(user_id, "session signed in");
        self.tx.send_replace(Session::signed_in(user_id));
    }

    pub fn sign_out(&self) {
        tracing::debug!("session signed out");
        self.tx.send_replace(Session::anonymous());
    }

    pub fn set(&self, session: Session) {
        self.tx.send_replace(session);
    }

    /// Receive every session change
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new(Session::anonymous())
    }
}

impl SessionProvider for SessionHandle {
    fn session(&self) -> Session {
        self.tx.borrow().clone()
    }
}
