use tracing::info;

use crate::domain::posts::{Post, PostId, next_post_id};

use super::service::PostService;
use super::types::{CreatePostCommand, PostServiceError, View};

impl PostService {
    pub async fn create_post(&self, command: CreatePostCommand) -> Result<Post, PostServiceError> {
        self.ensure_admin("posts::create").await?;

        let mut posts = self.store.load_posts().await?;
        let post = Post {
            id: next_post_id(&posts)?,
            title: command.title,
            date: command.date,
            video: command.video.filter(|url| !url.trim().is_empty()),
            excerpt: command.excerpt,
            content: command.content,
        };
        posts.push(post.clone());
        self.store.save_posts(&posts).await?;

        info!(
            target = "application::posts",
            op = "posts::create",
            result = "ok",
            post_id = post.id,
            "Created post"
        );
        self.views.invalidate(&[View::Index, View::Archive]);
        Ok(post)
    }

    /// Remove a post together with its pin. Deleting an unknown id is a no-op.
    pub async fn delete_post(&self, id: PostId) -> Result<(), PostServiceError> {
        self.ensure_admin("posts::delete").await?;

        // Both values are read before either is written, so unreadable pins
        // leave the posts untouched.
        let mut posts = self.store.load_posts().await?;
        let mut pins = self.store.load_pins().await?;

        let before = posts.len();
        posts.retain(|post| post.id != id);
        let removed = before != posts.len();
        // Pins never outlive their post.
        let unpinned = pins.remove(id);

        self.store.save_posts(&posts).await?;
        self.store.save_pins(&pins).await?;

        info!(
            target = "application::posts",
            op = "posts::delete",
            result = if removed { "ok" } else { "absent" },
            post_id = id,
            unpinned,
            "Deleted post"
        );
        self.views.invalidate(&[View::Index, View::Archive]);
        Ok(())
    }

    pub async fn pin(&self, id: PostId) -> Result<(), PostServiceError> {
        self.set_pinned(id, true, "posts::pin").await
    }

    pub async fn unpin(&self, id: PostId) -> Result<(), PostServiceError> {
        self.set_pinned(id, false, "posts::unpin").await
    }

    async fn set_pinned(
        &self,
        id: PostId,
        pinned: bool,
        op: &'static str,
    ) -> Result<(), PostServiceError> {
        self.ensure_admin(op).await?;

        let mut pins = self.store.load_pins().await?;
        let changed = if pinned {
            pins.insert(id)
        } else {
            pins.remove(id)
        };
        self.store.save_pins(&pins).await?;

        info!(
            target = "application::posts",
            op,
            result = if changed { "ok" } else { "unchanged" },
            post_id = id,
            "Updated pin state"
        );
        self.views.invalidate(&[View::Archive]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::application::posts::PostStore;
    use crate::application::posts::types::ViewInvalidator;
    use crate::application::repos::{ADMIN_KEY, KvStore, PINNED_KEY, POSTS_KEY, RepoError};
    use crate::application::session::KvSession;
    use crate::domain::posts::PinSet;
    use crate::infra::kv::MemoryStore;

    #[derive(Default)]
    struct RecordingViews {
        seen: Mutex<BTreeSet<View>>,
    }

    impl ViewInvalidator for RecordingViews {
        fn invalidate(&self, views: &[View]) {
            self.seen.lock().unwrap().extend(views.iter().copied());
        }
    }

    impl RecordingViews {
        fn drain(&self) -> Vec<View> {
            std::mem::take(&mut *self.seen.lock().unwrap())
                .into_iter()
                .collect()
        }
    }

    fn posts_json(ids: &[PostId]) -> String {
        let posts: Vec<Post> = ids
            .iter()
            .map(|id| Post {
                id: *id,
                title: format!("Post {id}"),
                date: format!("2025-01-{id:02}"),
                video: None,
                excerpt: String::new(),
                content: String::new(),
            })
            .collect();
        serde_json::to_string(&posts).unwrap()
    }

    fn admin_store(ids: &[PostId]) -> Arc<MemoryStore> {
        Arc::new(MemoryStore::seeded([
            (POSTS_KEY, posts_json(ids)),
            (ADMIN_KEY, "true".to_string()),
        ]))
    }

    fn service(store: Arc<MemoryStore>) -> (PostService, Arc<RecordingViews>) {
        let views = Arc::new(RecordingViews::default());
        let service = PostService::new(
            PostStore::new(store.clone()),
            Arc::new(KvSession::new(store)),
            views.clone(),
        );
        (service, views)
    }

    fn command(title: &str, date: &str) -> CreatePostCommand {
        CreatePostCommand {
            title: title.into(),
            date: date.into(),
            ..Default::default()
        }
    }

    async fn stored_ids(store: &MemoryStore) -> Vec<PostId> {
        let raw = store.get(POSTS_KEY).await.unwrap().unwrap();
        let posts: Vec<Post> = serde_json::from_str(&raw).unwrap();
        posts.into_iter().map(|post| post.id).collect()
    }

    async fn stored_pins(store: &MemoryStore) -> PinSet {
        let raw = store.get(PINNED_KEY).await.unwrap().unwrap_or_default();
        if raw.is_empty() {
            return PinSet::default();
        }
        serde_json::from_str(&raw).unwrap()
    }

    #[tokio::test]
    async fn create_assigns_one_past_the_largest_id() {
        let store = admin_store(&[1, 5, 3]);
        let (service, views) = service(store.clone());

        let post = service
            .create_post(command("Fresh", "2025-02-01"))
            .await
            .expect("create succeeds");

        assert_eq!(post.id, 6);
        assert_eq!(stored_ids(&store).await, vec![1, 5, 3, 6]);
        assert_eq!(views.drain(), vec![View::Index, View::Archive]);
    }

    #[tokio::test]
    async fn create_on_untouched_store_extends_the_default_posts() {
        let store = Arc::new(MemoryStore::seeded([(ADMIN_KEY, "true")]));
        let (service, _) = service(store.clone());

        let post = service.create_post(command("Third", "2025-05-01")).await.unwrap();

        assert_eq!(post.id, 3);
        assert_eq!(stored_ids(&store).await, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn blank_video_is_stored_as_absent() {
        let store = admin_store(&[]);
        let (service, _) = service(store);

        let post = service
            .create_post(CreatePostCommand {
                video: Some("   ".into()),
                ..command("No clip", "2025-01-01")
            })
            .await
            .unwrap();

        assert_eq!(post.video, None);
    }

    #[tokio::test]
    async fn anonymous_session_cannot_mutate() {
        let store = Arc::new(MemoryStore::seeded([(POSTS_KEY, posts_json(&[1]))]));
        let (service, views) = service(store.clone());

        assert!(matches!(
            service.create_post(command("x", "2025-01-01")).await,
            Err(PostServiceError::Forbidden)
        ));
        assert!(matches!(
            service.delete_post(1).await,
            Err(PostServiceError::Forbidden)
        ));
        assert!(matches!(service.pin(1).await, Err(PostServiceError::Forbidden)));
        assert!(matches!(service.unpin(1).await, Err(PostServiceError::Forbidden)));

        assert_eq!(stored_ids(&store).await, vec![1]);
        assert!(views.drain().is_empty());
    }

    #[tokio::test]
    async fn delete_prunes_the_pin_of_the_removed_post() {
        let store = admin_store(&[1, 2, 3]);
        store.set(PINNED_KEY, "[2,3]".into()).await.unwrap();
        let (service, views) = service(store.clone());

        service.delete_post(2).await.expect("delete succeeds");

        assert_eq!(stored_ids(&store).await, vec![1, 3]);
        assert_eq!(stored_pins(&store).await, [3].into_iter().collect::<PinSet>());
        assert_eq!(views.drain(), vec![View::Index, View::Archive]);
    }

    #[tokio::test]
    async fn deleting_twice_matches_deleting_once() {
        let store = admin_store(&[1, 2]);
        let (service, _) = service(store.clone());

        service.delete_post(1).await.unwrap();
        let once = store.get(POSTS_KEY).await.unwrap();
        service.delete_post(1).await.unwrap();
        let twice = store.get(POSTS_KEY).await.unwrap();

        assert_eq!(once, twice);
        service.delete_post(42).await.expect("absent id is not an error");
    }

    #[tokio::test]
    async fn pin_and_unpin_are_idempotent() {
        let store = admin_store(&[1, 2]);
        let (service, views) = service(store.clone());

        service.pin(2).await.unwrap();
        let once = stored_pins(&store).await;
        service.pin(2).await.unwrap();
        assert_eq!(stored_pins(&store).await, once);
        assert_eq!(views.drain(), vec![View::Archive]);

        service.unpin(2).await.unwrap();
        service.unpin(2).await.unwrap();
        assert!(stored_pins(&store).await.is_empty());
    }

    #[tokio::test]
    async fn delete_with_corrupt_pins_leaves_posts_untouched() {
        let store = admin_store(&[1, 2]);
        store.set(PINNED_KEY, "\"oops\"".into()).await.unwrap();
        let (service, views) = service(store.clone());
        let before = store.get(POSTS_KEY).await.unwrap();

        match service.delete_post(1).await {
            Err(PostServiceError::Repo(RepoError::CorruptState { key, .. })) => {
                assert_eq!(key, PINNED_KEY)
            }
            other => panic!("unexpected result: {other:?}"),
        }

        assert_eq!(store.get(POSTS_KEY).await.unwrap(), before);
        assert_eq!(stored_ids(&store).await, vec![1, 2]);
        assert_eq!(
            store.get(PINNED_KEY).await.unwrap().as_deref(),
            Some("\"oops\"")
        );
        assert!(views.drain().is_empty());
    }

    #[tokio::test]
    async fn corrupt_posts_surface_instead_of_resetting() {
        let store = Arc::new(MemoryStore::seeded([
            (POSTS_KEY, "{not json"),
            (ADMIN_KEY, "true"),
        ]));
        let (service, _) = service(store.clone());

        let result = service.create_post(command("x", "2025-01-01")).await;
        match result {
            Err(PostServiceError::Repo(RepoError::CorruptState { key, .. })) => {
                assert_eq!(key, POSTS_KEY)
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(
            store.get(POSTS_KEY).await.unwrap().as_deref(),
            Some("{not json")
        );
    }
}
