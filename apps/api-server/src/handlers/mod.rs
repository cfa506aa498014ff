//! HTTP handlers and route configuration.

mod categories;
mod health;
mod posts;

#[cfg(test)]
mod tests;

use actix_web::{HttpResponse, web};
use quill_shared::ApiResponse;

use crate::middleware::error::bad_request_handler;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(bad_request_handler))
        .app_data(web::QueryConfig::default().error_handler(bad_request_handler))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(posts::list_posts))
                        .route("", web::post().to(posts::create_post))
                        .route("/{id}", web::get().to(posts::get_post))
                        .route("/{id}", web::put().to(posts::update_post))
                        .route("/{id}", web::delete().to(posts::delete_post))
                        .route("/{id}/comments", web::post().to(posts::add_comment)),
                )
                .service(
                    web::scope("/categories")
                        .route("", web::get().to(categories::list_categories))
                        .route("", web::post().to(categories::create_category)),
                ),
        )
        .default_service(web::to(route_not_found));
}

async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::failure("Route not found"))
}
