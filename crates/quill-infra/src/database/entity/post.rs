//! Post entity for SeaORM.
//!
//! Tags and comments are JSONB columns so a post stays a single document.

use sea_orm::{NotSet, Set};
use sea_orm::entity::prelude::*;

use quill_core::domain::{Comment, Post, PostDraft};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub author: String,
    pub category_id: Uuid,
    pub featured_image: Option<String>,
    pub status: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub comments: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

// No foreign key backs this relation; a post may reference a missing category.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            author: model.author,
            category_id: model.category_id,
            featured_image: model.featured_image,
            status: model.status.parse().unwrap_or_default(),
            tags: serde_json::from_value(model.tags).unwrap_or_default(),
            comments: serde_json::from_value::<Vec<Comment>>(model.comments).unwrap_or_default(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            title: Set(post.title),
            content: Set(post.content),
            author: Set(post.author),
            category_id: Set(post.category_id),
            featured_image: Set(post.featured_image),
            status: Set(post.status.as_str().to_string()),
            tags: Set(Json::from(post.tags)),
            comments: Set(comments_json(&post.comments)),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}

/// Encode comments for the JSONB column.
pub fn comments_json(comments: &[Comment]) -> Json {
    serde_json::to_value(comments).unwrap_or_else(|_| Json::Array(Vec::new()))
}

/// Column changes for an edit: the required fields always, the optional ones
/// only when present. `id`, `comments` and `created_at` stay `NotSet`.
pub fn draft_changes(draft: PostDraft) -> ActiveModel {
    ActiveModel {
        title: Set(draft.title),
        content: Set(draft.content),
        author: Set(draft.author),
        category_id: Set(draft.category_id),
        featured_image: match draft.featured_image {
            Some(url) => Set(Some(url).filter(|url| !url.is_empty())),
            None => NotSet,
        },
        status: match draft.status {
            Some(status) => Set(status.as_str().to_string()),
            None => NotSet,
        },
        tags: match draft.tags {
            Some(tags) => Set(Json::from(tags)),
            None => NotSet,
        },
        updated_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    }
}
