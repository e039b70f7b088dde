//! Observability module - request IDs for tracing.

mod request_id;

pub use request_id::RequestIdMiddleware;
#[cfg(test)]
pub use request_id::REQUEST_ID_HEADER;
