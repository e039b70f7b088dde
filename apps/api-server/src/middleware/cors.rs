//! Cross-origin resource sharing policy.

use actix_cors::Cors;

use crate::config::CorsOrigins;

/// Build the CORS middleware for one worker.
///
/// Every method and request header is allowed; origins follow
/// `CORS_ALLOWED_ORIGINS`.
pub fn cors(origins: &CorsOrigins) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    match origins {
        CorsOrigins::Any => cors.allow_any_origin().send_wildcard(),
        CorsOrigins::List(list) => list
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin)),
    }
}
