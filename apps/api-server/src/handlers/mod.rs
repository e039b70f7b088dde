//! HTTP handlers and route configuration.

mod index;
mod posts;

use actix_web::{HttpRequest, HttpResponse, error::JsonPayloadError, web};
use blog_core::ValidationErrors;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/", web::get().to(index::welcome))
        .service(
            web::scope("/posts")
                .route("", web::get().to(posts::list_posts))
                .route("", web::post().to(posts::create_post))
                .route("/{id}", web::get().to(posts::get_post))
                .route("/{id}", web::put().to(posts::update_post))
                .route("/{id}", web::delete().to(posts::delete_post)),
        )
        .default_service(web::to(not_found));
}

/// Unreadable bodies are reported like any other validation failure.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "must be application/json".to_string(),
        JsonPayloadError::Deserialize(e) => format!("invalid JSON: {e}"),
        _ => "could not be read".to_string(),
    };
    AppError::from(ValidationErrors::single("body", message)).into()
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(blog_shared::ErrorResponse::new("Not found"))
}
