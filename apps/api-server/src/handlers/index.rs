//! Root endpoint.

use actix_web::HttpResponse;
use blog_shared::MessageResponse;

/// Welcome message.
///
/// GET /
pub async fn welcome() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse::new("Welcome to the blog API"))
}
