//! # Blog Shared
//!
//! Request and response schemas shared between the API and its clients.
//! In a full-stack Rust setup, this crate is compiled for both server and WASM.

pub mod dto;
pub mod response;

pub use dto::{MessageResponse, PostRequest};
pub use response::{ErrorResponse, FieldErrorResponse};
