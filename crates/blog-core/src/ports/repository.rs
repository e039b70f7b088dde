use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostId};
use crate::error::RepoError;

/// Post repository - one datastore statement per operation.
///
/// Id-scoped operations return `Ok(None)` when no row matches; that is a
/// routine outcome, not a failure.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts, most recently created first.
    async fn list(&self) -> Result<Vec<Post>, RepoError>;

    /// Find a post by its id.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError>;

    /// Insert a post; the datastore assigns `id` and both timestamps.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Replace all mutable fields of a post and refresh `updated_at`.
    async fn update(&self, id: PostId, post: NewPost) -> Result<Option<Post>, RepoError>;

    /// Remove a post, returning the row as it was before deletion.
    async fn delete(&self, id: PostId) -> Result<Option<Post>, RepoError>;
}
