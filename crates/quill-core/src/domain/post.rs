use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::CategoryRef;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub const ALL: [PostStatus; 2] = [PostStatus::Draft, PostStatus::Published];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known [`PostStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown post status `{0}`")]
pub struct UnknownStatus(pub String);

impl FromStr for PostStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A reader comment, embedded in its post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(author: String, content: String) -> Self {
        Self {
            author,
            content,
            created_at: Utc::now(),
        }
    }
}

/// Validated user-supplied post fields.
///
/// The optional fields are `None` when the payload omitted them. An empty
/// `featured_image` means the image was explicitly cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub author: String,
    pub category_id: Uuid,
    pub featured_image: Option<String>,
    pub status: Option<PostStatus>,
    pub tags: Option<Vec<String>>,
}

/// Post entity - a blog article with its embedded comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: String,
    #[serde(rename = "category")]
    pub category_id: Uuid,
    pub featured_image: Option<String>,
    pub status: PostStatus,
    pub tags: Vec<String>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post from a validated draft.
    pub fn new(draft: PostDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            content: draft.content,
            author: draft.author,
            category_id: draft.category_id,
            featured_image: draft.featured_image.filter(|url| !url.is_empty()),
            status: draft.status.unwrap_or_default(),
            tags: draft.tags.unwrap_or_default(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the fields carried by `draft`, leaving omitted optional
    /// fields and the comment thread untouched.
    pub fn apply(&mut self, draft: PostDraft) {
        self.title = draft.title;
        self.content = draft.content;
        self.author = draft.author;
        self.category_id = draft.category_id;
        if let Some(url) = draft.featured_image {
            self.featured_image = Some(url).filter(|url| !url.is_empty());
        }
        if let Some(status) = draft.status {
            self.status = status;
        }
        if let Some(tags) = draft.tags {
            self.tags = tags;
        }
        self.updated_at = Utc::now();
    }

    /// Attach the (possibly dangling) category projection.
    pub fn into_view(self, category: Option<CategoryRef>) -> PostView {
        PostView {
            id: self.id,
            title: self.title,
            content: self.content,
            author: self.author,
            category,
            featured_image: self.featured_image,
            status: self.status,
            tags: self.tags,
            comments: self.comments,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A post with its category reference populated.
///
/// `category` is `None` when the referenced category no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: String,
    pub category: Option<CategoryRef>,
    pub featured_image: Option<String>,
    pub status: PostStatus,
    pub tags: Vec<String>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostView {
    /// Narrow the populated category to `{id, name, slug}`.
    pub fn with_category_summary(mut self) -> Self {
        if let Some(category) = self.category.as_mut() {
            category.description = None;
        }
        self
    }
}
