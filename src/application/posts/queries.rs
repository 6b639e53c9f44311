use crate::domain::posts::{Post, PostId, sort_newest_first};

use super::service::PostService;
use super::types::PostServiceError;

impl PostService {
    /// Every post, newest first; posts sharing a date keep their stored order.
    pub async fn list_all(&self) -> Result<Vec<Post>, PostServiceError> {
        let mut posts = self.store.load_posts().await?;
        sort_newest_first(&mut posts);
        Ok(posts)
    }

    /// Pinned posts in the same order as [`PostService::list_all`]. Pins whose
    /// post is gone are skipped.
    pub async fn list_pinned(&self) -> Result<Vec<Post>, PostServiceError> {
        let pins = self.store.load_pins().await?;
        let mut posts = self.store.load_posts().await?;
        posts.retain(|post| pins.contains(post.id));
        sort_newest_first(&mut posts);
        Ok(posts)
    }

    pub async fn is_pinned(&self, id: PostId) -> Result<bool, PostServiceError> {
        Ok(self.store.load_pins().await?.contains(id))
    }
}
