//! Catalog domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every product is identified by a stable `ProductId`.
//! - The query engine only ever reads products; writes go through the
//!   repository layer.

pub mod product;
