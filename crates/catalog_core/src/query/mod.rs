//! Catalog query engine.
//!
//! # Responsibility
//! - Normalize listing requests into active predicates and a page window.
//! - Evaluate them over an explicitly passed product collection.
//!
//! # Invariants
//! - The engine holds no state; callers own the backing collection.
//! - Listing never fails on malformed client input.

pub mod engine;
pub mod request;
