//! Domain entities - the core business objects.

mod category;
mod post;

pub use category::{Category, CategoryDraft, CategoryRef, DEFAULT_CATEGORIES, slugify};
pub use post::{Comment, Post, PostDraft, PostStatus, PostView, UnknownStatus};
