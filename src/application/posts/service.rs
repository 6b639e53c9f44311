use std::sync::Arc;

use tracing::warn;

use crate::application::session::Session;

use super::store::PostStore;
use super::types::{PostServiceError, ViewInvalidator};

#[derive(Clone)]
pub struct PostService {
    pub(crate) store: PostStore,
    pub(crate) session: Arc<dyn Session>,
    pub(crate) views: Arc<dyn ViewInvalidator>,
}

impl PostService {
    pub fn new(
        store: PostStore,
        session: Arc<dyn Session>,
        views: Arc<dyn ViewInvalidator>,
    ) -> Self {
        Self {
            store,
            session,
            views,
        }
    }

    /// Fail with [`PostServiceError::Forbidden`] unless the session is admin.
    pub async fn ensure_admin(&self, op: &'static str) -> Result<(), PostServiceError> {
        if self.session.is_admin().await? {
            return Ok(());
        }
        warn!(
            target = "application::posts",
            op,
            result = "forbidden",
            "Mutation attempted without an admin session"
        );
        Err(PostServiceError::Forbidden)
    }
}
