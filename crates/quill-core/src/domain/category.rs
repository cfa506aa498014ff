use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Categories installed by the seed routine.
pub const DEFAULT_CATEGORIES: [&str; 5] = [
    "Technology",
    "Lifestyle",
    "Health",
    "Education",
    "Entertainment",
];

/// Derive a URL-safe slug from a category name.
///
/// Lowercases, turns whitespace runs into a hyphen, drops anything that is
/// not an ASCII word character or hyphen, collapses hyphen runs and trims
/// hyphens from both ends.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_whitespace = false;

    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                push_hyphen(&mut slug);
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;

        if c == '-' {
            push_hyphen(&mut slug);
        } else if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
        }
    }

    slug.trim_matches('-').to_string()
}

fn push_hyphen(slug: &mut String) {
    if !slug.ends_with('-') {
        slug.push('-');
    }
}

/// Validated user-supplied category fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
}

/// Category entity - a named grouping of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category, deriving its slug from the name.
    pub fn new(draft: CategoryDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            slug: slugify(&draft.name),
            name: draft.name,
            description: draft.description.filter(|d| !d.is_empty()),
            created_at: now,
            updated_at: now,
        }
    }

    /// The seed set, in declaration order.
    pub fn defaults() -> Vec<Category> {
        DEFAULT_CATEGORIES
            .iter()
            .map(|name| {
                Category::new(CategoryDraft {
                    name: (*name).to_string(),
                    description: None,
                })
            })
            .collect()
    }

    /// Projection used when listing posts: `{id, name, slug}`.
    pub fn summary(&self) -> CategoryRef {
        CategoryRef {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            description: None,
        }
    }

    /// Projection used for a single post: `{id, name, slug, description}`.
    pub fn detail(&self) -> CategoryRef {
        CategoryRef {
            description: self.description.clone(),
            ..self.summary()
        }
    }
}

/// Partial projection of a category embedded in a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
