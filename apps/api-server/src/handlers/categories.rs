//! Category handlers.

use actix_web::{HttpResponse, web};
use serde_json::Value;

use quill_core::domain::Category;
use quill_core::error::RepoError;
use quill_core::validation::validate_category;
use quill_shared::ApiResponse;

use crate::middleware::error::{AppError, AppResult, RepoResultExt};
use crate::state::AppState;

/// GET /api/categories
pub async fn list_categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state
        .categories
        .list_by_name()
        .await
        .or_internal("Error fetching categories")?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(categories)))
}

/// POST /api/categories
pub async fn create_category(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let draft = validate_category(&body)?;

    let category = match state.categories.insert(Category::new(draft)).await {
        Ok(category) => category,
        Err(RepoError::Constraint(_)) => {
            return Err(AppError::BadRequest("Category already exists".to_string()));
        }
        Err(e) => return Err(AppError::internal("Error creating category", e)),
    };
    tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        category,
        "Category created successfully",
    )))
}
