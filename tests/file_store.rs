//! On-disk backend behaviour.

use std::sync::Arc;

use folio::application::{
    blog::Blog,
    credentials::DEFAULT_PASSWORD,
    posts::{CreatePostCommand, NoopInvalidator},
    repos::{KvStore, RepoError},
};
use folio::infra::kv::FileStore;
use tempfile::TempDir;

#[tokio::test]
async fn missing_file_reads_as_empty_store() {
    let dir = TempDir::new().expect("temp dir");
    let store = FileStore::new(dir.path().join("absent.json"));

    assert_eq!(store.get("posts").await.unwrap(), None);
}

#[tokio::test]
async fn values_survive_a_new_store_instance() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("nested").join("store.json");

    let first = FileStore::new(&path);
    first.set("isAdmin", "true".into()).await.unwrap();
    first.set("pinned", "[1]".into()).await.unwrap();
    first.set("pinned", "[1,2]".into()).await.unwrap();

    let second = FileStore::new(&path);
    assert_eq!(second.get("isAdmin").await.unwrap().as_deref(), Some("true"));
    assert_eq!(second.get("pinned").await.unwrap().as_deref(), Some("[1,2]"));

    let on_disk = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&on_disk).unwrap();
    assert_eq!(parsed["pinned"], "[1,2]");
}

#[tokio::test]
async fn corrupt_store_file_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("store.json");
    std::fs::write(&path, "not json at all").unwrap();

    let store = FileStore::new(&path);
    assert!(matches!(
        store.get("posts").await,
        Err(RepoError::CorruptState { .. })
    ));
    assert!(store.set("posts", "[]".into()).await.is_err());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json at all");
}

#[tokio::test]
async fn blog_state_persists_across_openings() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("store.json");

    let blog = Blog::open(Arc::new(FileStore::new(&path)), Arc::new(NoopInvalidator))
        .await
        .unwrap();
    assert!(blog.credentials.login("admin", DEFAULT_PASSWORD).await.unwrap());
    let post = blog
        .posts
        .create_post(CreatePostCommand {
            title: "Saved".into(),
            date: "2025-07-01".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    blog.posts.pin(post.id).await.unwrap();

    let reopened = Blog::open(Arc::new(FileStore::new(&path)), Arc::new(NoopInvalidator))
        .await
        .unwrap();
    assert!(reopened.credentials.is_admin().await.unwrap());
    let pinned = reopened.posts.list_pinned().await.unwrap();
    assert_eq!(pinned.len(), 1);
    assert_eq!(pinned[0].title, "Saved");
}
