use std::sync::Arc;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{info, warn};

use super::repos::{KvStore, PASS_KEY, RepoError};
use super::session::{Session, SessionState};

pub const ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "admin123";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("current password is incorrect")]
    WrongCurrentPassword,
    #[error("new passwords do not match")]
    Mismatch,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Unsalted SHA-256 of the plaintext, rendered as 64 lowercase hex digits.
pub fn hash_password(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize().to_vec())
}

/// The single shared password and the login/logout transitions of the session.
#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn KvStore>,
    session: Arc<dyn Session>,
}

impl CredentialService {
    pub fn new(store: Arc<dyn KvStore>, session: Arc<dyn Session>) -> Self {
        Self { store, session }
    }

    /// Store the digest of the default password unless one is already present.
    /// Returns `true` when the default was written.
    pub async fn initialize_default(&self) -> Result<bool, RepoError> {
        if self.stored_digest().await?.is_some() {
            return Ok(false);
        }

        self.store
            .set(PASS_KEY, hash_password(DEFAULT_PASSWORD))
            .await?;
        info!(
            target = "application::credentials",
            op = "credentials::initialize_default",
            result = "ok",
            "Stored default admin password"
        );
        Ok(true)
    }

    /// Elevate the session when both the username and the password match.
    /// A rejected attempt leaves the session as it was.
    pub async fn login(&self, username: &str, plaintext: &str) -> Result<bool, RepoError> {
        if username != ADMIN_USERNAME || !self.verify(plaintext).await? {
            warn!(
                target = "application::credentials",
                op = "credentials::login",
                result = "rejected",
                username,
                "Rejected login attempt"
            );
            return Ok(false);
        }

        self.session.set_state(SessionState::Admin).await?;
        info!(
            target = "application::credentials",
            op = "credentials::login",
            result = "ok",
            "Admin session started"
        );
        Ok(true)
    }

    pub async fn logout(&self) -> Result<(), RepoError> {
        self.session.set_state(SessionState::Anonymous).await?;
        info!(
            target = "application::credentials",
            op = "credentials::logout",
            result = "ok",
            "Admin session ended"
        );
        Ok(())
    }

    pub async fn is_admin(&self) -> Result<bool, RepoError> {
        self.session.is_admin().await
    }

    pub async fn change_password(
        &self,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> Result<(), CredentialError> {
        if !self.verify(current).await? {
            return Err(CredentialError::WrongCurrentPassword);
        }
        if new != confirm {
            return Err(CredentialError::Mismatch);
        }

        self.store.set(PASS_KEY, hash_password(new)).await?;
        info!(
            target = "application::credentials",
            op = "credentials::change_password",
            result = "ok",
            "Admin password updated"
        );
        Ok(())
    }

    async fn verify(&self, plaintext: &str) -> Result<bool, RepoError> {
        let Some(stored) = self.stored_digest().await? else {
            return Ok(false);
        };
        let candidate = hash_password(plaintext);
        Ok(candidate.as_bytes().ct_eq(stored.as_bytes()).into())
    }

    async fn stored_digest(&self) -> Result<Option<String>, RepoError> {
        let digest = self.store.get(PASS_KEY).await?;
        Ok(digest.filter(|value| !value.is_empty()))
    }
}
