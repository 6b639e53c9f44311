//! Admin session flag.
//!
//! The flag is plain persisted state, not a credential. Everything that needs
//! to know whether mutations are allowed asks a [`Session`], so a token scheme
//! can replace [`KvSession`] without touching the post service.

use std::sync::Arc;

use async_trait::async_trait;

use super::repos::{ADMIN_KEY, KvStore, RepoError};

const ADMIN_SENTINEL: &str = "true";
const ANONYMOUS_SENTINEL: &str = "false";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Admin,
}

#[async_trait]
pub trait Session: Send + Sync {
    async fn state(&self) -> Result<SessionState, RepoError>;

    async fn set_state(&self, state: SessionState) -> Result<(), RepoError>;

    async fn is_admin(&self) -> Result<bool, RepoError> {
        Ok(self.state().await? == SessionState::Admin)
    }
}

/// Session flag persisted under `isAdmin` as a `"true"` / `"false"` string.
#[derive(Clone)]
pub struct KvSession {
    store: Arc<dyn KvStore>,
}

impl KvSession {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Session for KvSession {
    async fn state(&self) -> Result<SessionState, RepoError> {
        let raw = self.store.get(ADMIN_KEY).await?;
        Ok(match raw.as_deref() {
            Some(ADMIN_SENTINEL) => SessionState::Admin,
            _ => SessionState::Anonymous,
        })
    }

    async fn set_state(&self, state: SessionState) -> Result<(), RepoError> {
        let sentinel = match state {
            SessionState::Admin => ADMIN_SENTINEL,
            SessionState::Anonymous => ANONYMOUS_SENTINEL,
        };
        self.store.set(ADMIN_KEY, sentinel.to_string()).await
    }
}
