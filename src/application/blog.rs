use std::sync::Arc;

use super::credentials::CredentialService;
use super::posts::{PostService, PostStore, ViewInvalidator};
use super::repos::{KvStore, RepoError};
use super::session::{KvSession, Session};

/// Services sharing one key-value backend.
#[derive(Clone)]
pub struct Blog {
    pub credentials: CredentialService,
    pub posts: PostService,
}

impl Blog {
    /// Wire the services and make sure a password digest exists before any
    /// login can be evaluated.
    pub async fn open(
        store: Arc<dyn KvStore>,
        views: Arc<dyn ViewInvalidator>,
    ) -> Result<Self, RepoError> {
        let session: Arc<dyn Session> = Arc::new(KvSession::new(store.clone()));
        let credentials = CredentialService::new(store.clone(), session.clone());
        let posts = PostService::new(PostStore::new(store), session, views);

        credentials.initialize_default().await?;

        Ok(Self { credentials, posts })
    }
}
