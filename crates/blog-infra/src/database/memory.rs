//! In-memory post repository - used when no database is configured.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use blog_core::domain::{NewPost, Post, PostId};
use blog_core::error::RepoError;
use blog_core::ports::PostRepository;

struct Store {
    next_id: PostId,
    posts: BTreeMap<PostId, Post>,
}

/// Post repository backed by a `BTreeMap` behind an async `RwLock`.
///
/// Ids are assigned sequentially from 1 and never reused.
/// Note: Data is lost on process restart.
pub struct InMemoryPostRepository {
    store: RwLock<Store>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store {
                next_id: 1,
                posts: BTreeMap::new(),
            }),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let mut posts: Vec<Post> = store.posts.values().cloned().collect();
        posts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(posts)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.posts.get(&id).cloned())
    }

    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        let id = store.next_id;
        store.next_id = id
            .checked_add(1)
            .ok_or_else(|| RepoError::Constraint("post id sequence exhausted".to_string()))?;

        let post = Post::from_new(id, post, Utc::now());
        store.posts.insert(id, post.clone());
        Ok(post)
    }

    async fn update(&self, id: PostId, post: NewPost) -> Result<Option<Post>, RepoError> {
        let mut store = self.store.write().await;
        Ok(store.posts.get_mut(&id).map(|existing| {
            existing.apply(post, Utc::now());
            existing.clone()
        }))
    }

    async fn delete(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let removed = self.store.write().await.posts.remove(&id);
        if let Some(post) = &removed {
            tracing::info!(post_id = post.id, title = %post.title, "Post deleted");
        }
        Ok(removed)
    }
}
