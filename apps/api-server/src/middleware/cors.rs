//! CORS policy.

use actix_cors::Cors;
use actix_web::http::header;

/// Build the CORS middleware. An empty origin list accepts any origin.
pub fn cors(allowed_origins: &[String]) -> Cors {
    let base = if allowed_origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    base.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600)
}
