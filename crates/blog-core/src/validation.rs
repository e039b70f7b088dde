//! Request validation for post routes.
//!
//! Rules are checked before any repository call. Every violation in a
//! request is reported, not just the first one.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::domain::{NewPost, PostDraft, PostId};
use crate::error::{FieldError, ValidationErrors};

/// A body field of the post schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PostField {
    Author,
    Title,
    Content,
    Cover,
}

impl PostField {
    pub const ALL: [PostField; 4] = [
        PostField::Author,
        PostField::Title,
        PostField::Content,
        PostField::Cover,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostField::Author => "author",
            PostField::Title => "title",
            PostField::Content => "content",
            PostField::Cover => "cover",
        }
    }
}

impl fmt::Display for PostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a field name is not part of the post schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown post field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for PostField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "author" => Ok(PostField::Author),
            "title" => Ok(PostField::Title),
            "content" => Ok(PostField::Content),
            "cover" => Ok(PostField::Cover),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Required-field set applied to create and update bodies.
///
/// `title` and `content` are always part of the set; `author` and `cover`
/// are opt-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRules {
    required: BTreeSet<PostField>,
}

impl PostRules {
    /// Build a rule set from any combination of fields.
    pub fn new(required: impl IntoIterator<Item = PostField>) -> Self {
        let mut required: BTreeSet<PostField> = required.into_iter().collect();
        required.insert(PostField::Title);
        required.insert(PostField::Content);
        Self { required }
    }

    /// Every field is required.
    pub fn strict() -> Self {
        Self::new(PostField::ALL)
    }

    /// Only `title` and `content` are required.
    pub fn minimal() -> Self {
        Self::new(std::iter::empty())
    }

    pub fn is_required(&self, field: PostField) -> bool {
        self.required.contains(&field)
    }

    pub fn required(&self) -> impl Iterator<Item = PostField> + '_ {
        self.required.iter().copied()
    }

    /// Check a draft against the rules and normalize it.
    pub fn validate(&self, draft: PostDraft) -> Result<NewPost, ValidationErrors> {
        let mut errors = Vec::new();

        let author = self.check(PostField::Author, draft.author, &mut errors);
        let title = self.check(PostField::Title, draft.title, &mut errors);
        let content = self.check(PostField::Content, draft.content, &mut errors);
        let cover = self.check(PostField::Cover, draft.cover, &mut errors);

        match (title, content) {
            (Some(title), Some(content)) if errors.is_empty() => Ok(NewPost {
                author,
                title,
                content,
                cover,
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }

    fn check(
        &self,
        field: PostField,
        value: Option<String>,
        errors: &mut Vec<FieldError>,
    ) -> Option<String> {
        let value = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        if value.is_none() && self.is_required(field) {
            errors.push(FieldError::new(
                field.as_str(),
                format!("{field} is required"),
            ));
        }

        value
    }
}

impl Default for PostRules {
    fn default() -> Self {
        Self::strict()
    }
}

/// Parse the `id` path segment.
pub fn parse_id(raw: &str) -> Result<PostId, ValidationErrors> {
    raw.parse::<PostId>()
        .map_err(|_| ValidationErrors::single("id", "must be an integer"))
}
