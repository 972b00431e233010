//! Status-coded JSON envelopes returned by every route.

use log::error;
use serde::Serialize;
use serde_json::{json, Value};

pub const PRODUCT_NOT_FOUND: &str = "Product not found";
pub const PRODUCT_DELETED: &str = "Product deleted successfully";
pub const MISSING_PRODUCT_FIELDS: &str = "Product must have name, price, and category";
pub const INTERNAL_ERROR: &str = "Internal server error";
pub const ROUTE_NOT_FOUND: &str = "Route not found";
pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";

/// Route result: HTTP-style status code and JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    /// Serializes `payload` as the body.
    ///
    /// Falls back to a 500 envelope if serialization fails, so callers never
    /// see a panic.
    pub fn json(status: u16, payload: &impl Serialize) -> Self {
        match serde_json::to_value(payload) {
            Ok(body) => Self { status, body },
            Err(err) => {
                error!("event=response_encode module=api status=error error={err}");
                Self::message(500, INTERNAL_ERROR)
            }
        }
    }

    /// `{ "message": ... }` body.
    pub fn message(status: u16, message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self {
            status,
            body: json!({ "message": message }),
        }
    }

    pub fn ok(payload: &impl Serialize) -> Self {
        Self::json(200, payload)
    }

    pub fn created(payload: &impl Serialize) -> Self {
        Self::json(201, payload)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::message(400, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::message(404, message)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `message` field of the body, when present.
    pub fn message_text(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}
