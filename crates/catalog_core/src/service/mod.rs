//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository snapshots and the query engine into use-case
//!   level APIs.
//! - Keep route/CLI layers decoupled from storage details.

pub mod product_service;
