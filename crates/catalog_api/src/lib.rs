//! Transport-agnostic route layer for the product catalog.
//!
//! Hosts (an HTTP server, a test harness) hand in method, path, query string
//! and body; every call returns a status code plus JSON body.

pub mod api;
pub mod response;

pub use api::CatalogApi;
pub use response::ApiResponse;
