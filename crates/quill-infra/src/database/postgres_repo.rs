//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{Category, Comment, Post, PostDraft, PostView};
use quill_core::error::RepoError;
use quill_core::ports::{CategoryRepository, PostRepository};
use quill_core::query::{FieldFilter, Page, PostFilter, PostQuery};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity, comments_json, draft_changes};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// Full-text clause over title and content; served by the GIN index of the
/// same expression. The `simple` configuration neither stems nor drops stop
/// words, so matching is whole-word and case-insensitive.
const TEXT_SEARCH_SQL: &str = "to_tsvector('simple', \"posts\".\"title\" || ' ' || \"posts\".\"content\") @@ to_tsquery('simple', ?)";

/// Build the `SELECT` shared by the page query and the count query.
fn filtered(filter: &PostFilter) -> Select<PostEntity> {
    let mut select = PostEntity::find();

    if let FieldFilter::Eq(category_id) = filter.category {
        select = select.filter(post::Column::CategoryId.eq(category_id));
    }
    if let FieldFilter::Eq(status) = filter.status {
        select = select.filter(post::Column::Status.eq(status.as_str()));
    }
    if let Some(terms) = &filter.search {
        // Any word may match.
        select = select.filter(Expr::cust_with_values(TEXT_SEARCH_SQL, [terms.join(" | ")]));
    }

    select
}

fn to_view(row: (post::Model, Option<category::Model>), detail: bool) -> PostView {
    let (post, category) = row;
    let category = category.map(|model| {
        let category = Category::from(model);
        if detail {
            category.detail()
        } else {
            category.summary()
        }
    });
    Post::from(post).into_view(category)
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(&self, query: &PostQuery) -> Result<Page<PostView>, RepoError> {
        if query.filter.is_unsatisfiable() {
            tracing::debug!("Post filter can match nothing, skipping query");
            return Ok(Page::empty());
        }

        tracing::debug!(
            page = query.page,
            limit = query.limit,
            search = query.filter.search.is_some(),
            "Listing posts"
        );

        let total = filtered(&query.filter)
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        if query.skip() >= total {
            return Ok(Page {
                items: Vec::new(),
                total,
            });
        }

        let rows = filtered(&query.filter)
            .order_by_desc(post::Column::CreatedAt)
            .find_also_related(CategoryEntity)
            .offset(query.skip())
            .limit(query.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let items = rows.into_iter().map(|row| to_view(row, false)).collect();
        Ok(Page { items, total })
    }

    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, RepoError> {
        let row = PostEntity::find_by_id(id)
            .find_also_related(CategoryEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(row.map(|row| to_view(row, true)))
    }

    async fn update_fields(&self, id: Uuid, draft: PostDraft) -> Result<(), RepoError> {
        tracing::debug!(post_id = %id, "Updating post");

        let result = PostEntity::update_many()
            .set(draft_changes(draft))
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn append_comment(&self, id: Uuid, comment: Comment) -> Result<(), RepoError> {
        tracing::debug!(post_id = %id, "Appending comment");

        // Single-statement JSONB append.
        let result = PostEntity::update_many()
            .col_expr(
                post::Column::Comments,
                Expr::cust_with_values("\"comments\" || ?", [comments_json(&[comment])]),
            )
            .col_expr(post::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn list_by_name(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn replace_all(&self, categories: Vec<Category>) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let removed = CategoryEntity::delete_many()
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        tracing::info!(removed = removed.rows_affected, "Cleared categories");

        if !categories.is_empty() {
            let count = categories.len();
            CategoryEntity::insert_many(categories.into_iter().map(category::ActiveModel::from))
                .exec(&txn)
                .await
                .map_err(map_db_err)?;
            tracing::info!(inserted = count, "Inserted categories");
        }

        txn.commit().await.map_err(map_db_err)
    }
}
