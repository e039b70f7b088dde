use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Database-assigned post identifier.
pub type PostId = i32;

/// Post entity - a persisted blog article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author: Option<String>,
    pub title: String,
    pub content: String,
    pub cover: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unchecked body fields, exactly as the client sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub author: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub cover: Option<String>,
}

/// Validated, trimmed fields ready to be written.
///
/// Used for both inserts and updates: an update replaces every mutable
/// column with these values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author: Option<String>,
    pub title: String,
    pub content: String,
    pub cover: Option<String>,
}

impl Post {
    /// Build a stored post from validated fields and server-assigned values.
    pub fn from_new(id: PostId, post: NewPost, now: DateTime<Utc>) -> Self {
        Self {
            id,
            author: post.author,
            title: post.title,
            content: post.content,
            cover: post.cover,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every mutable field and refresh `updated_at`.
    ///
    /// `updated_at` never moves behind `created_at`, even if the clock does.
    pub fn apply(&mut self, post: NewPost, now: DateTime<Utc>) {
        self.author = post.author;
        self.title = post.title;
        self.content = post.content;
        self.cover = post.cover;
        self.updated_at = now.max(self.created_at);
    }
}
