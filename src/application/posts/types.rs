use thiserror::Error;

use crate::{application::repos::RepoError, domain::error::DomainError};

#[derive(Debug, Error)]
pub enum PostServiceError {
    #[error("admin session required")]
    Forbidden,
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Default)]
pub struct CreatePostCommand {
    pub title: String,
    pub date: String,
    pub video: Option<String>,
    pub excerpt: String,
    pub content: String,
}

/// Rendered lists that depend on the post store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum View {
    /// Every post, newest first.
    Index,
    /// Pinned posts only.
    Archive,
}

/// Told which views went stale after a mutation.
pub trait ViewInvalidator: Send + Sync {
    fn invalidate(&self, views: &[View]);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInvalidator;

impl ViewInvalidator for NoopInvalidator {
    fn invalidate(&self, _views: &[View]) {}
}
