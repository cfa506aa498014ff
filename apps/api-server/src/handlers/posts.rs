//! Post handlers.

use actix_web::{HttpResponse, web};
use serde_json::Value;
use uuid::Uuid;

use quill_core::domain::{Comment, Post};
use quill_core::query::{ListParams, PostQuery};
use quill_core::validation::{validate_comment, validate_post};
use quill_shared::ApiResponse;
use quill_shared::dto::CommentPayload;

use crate::middleware::error::{AppError, AppResult, RepoResultExt};
use crate::state::AppState;

const NOT_FOUND: &str = "Post not found";

fn post_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(NOT_FOUND.to_string()))
}

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    params: web::Query<ListParams>,
) -> AppResult<HttpResponse> {
    let query = PostQuery::from_params(&params);
    tracing::debug!(page = query.page, limit = query.limit, "Listing posts");

    let page = state
        .posts
        .list(&query)
        .await
        .or_internal("Error fetching posts")?;

    let pagination = query.paginate(page.total);
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(page.items, pagination)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = post_id(&path)?;

    let post = state
        .posts
        .find_view(id)
        .await
        .or_internal("Error fetching post")?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let draft = validate_post(&body)?;

    let post = state
        .posts
        .insert(Post::new(draft))
        .await
        .or_internal("Error creating post")?;
    tracing::info!(post_id = %post.id, "Post created");

    let view = state
        .posts
        .find_view(post.id)
        .await
        .or_internal("Error creating post")?
        .ok_or_else(|| AppError::internal("Error creating post", "created post vanished"))?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        view.with_category_summary(),
        "Post created successfully",
    )))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let draft = validate_post(&body)?;
    let id = post_id(&path)?;

    state
        .posts
        .update_fields(id, draft)
        .await
        .or_not_found(NOT_FOUND, "Error updating post")?;

    let view = state
        .posts
        .find_view(id)
        .await
        .or_internal("Error updating post")?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        view.with_category_summary(),
        "Post updated successfully",
    )))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = post_id(&path)?;

    state
        .posts
        .delete(id)
        .await
        .or_not_found(NOT_FOUND, "Error deleting post")?;
    tracing::info!(post_id = %id, "Post deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::message("Post deleted successfully")))
}

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CommentPayload>,
) -> AppResult<HttpResponse> {
    let CommentPayload { author, content } = body.into_inner();
    validate_comment(&author, &content)?;
    let id = post_id(&path)?;

    state
        .posts
        .append_comment(id, Comment::new(author, content))
        .await
        .or_not_found(NOT_FOUND, "Error adding comment")?;

    let view = state
        .posts
        .find_view(id)
        .await
        .or_internal("Error adding comment")?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        view,
        "Comment added successfully",
    )))
}
