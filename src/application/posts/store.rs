use std::sync::Arc;

use crate::application::repos::{KvStore, PINNED_KEY, POSTS_KEY, RepoError, load_json, save_json};
use crate::domain::posts::{PinSet, Post, default_posts};

/// Posts and pins as they sit in the key-value backend.
#[derive(Clone)]
pub struct PostStore {
    store: Arc<dyn KvStore>,
}

impl PostStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Stored posts in insertion order, or the built-in pair when nothing has
    /// been written yet. Unreadable data is reported, never replaced.
    pub async fn load_posts(&self) -> Result<Vec<Post>, RepoError> {
        let posts = load_json(self.store.as_ref(), POSTS_KEY).await?;
        Ok(posts.unwrap_or_else(default_posts))
    }

    pub async fn save_posts(&self, posts: &[Post]) -> Result<(), RepoError> {
        save_json(self.store.as_ref(), POSTS_KEY, posts).await
    }

    pub async fn load_pins(&self) -> Result<PinSet, RepoError> {
        let pins = load_json(self.store.as_ref(), PINNED_KEY).await?;
        Ok(pins.unwrap_or_default())
    }

    pub async fn save_pins(&self, pins: &PinSet) -> Result<(), RepoError> {
        save_json(self.store.as_ref(), PINNED_KEY, pins).await
    }
}
