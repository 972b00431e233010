//! Core domain logic for the product catalog.
//! This crate is the single source of truth for catalog query semantics.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod seed;
pub mod service;

pub use config::CatalogConfig;
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::product::{NewProduct, Product, ProductId, ProductPatch, ProductValidationError};
pub use query::engine::{find_product, list_categories, list_products, CategoryList, QueryResult};
pub use query::request::{parse_in_stock, QueryRequest, DEFAULT_LIMIT, DEFAULT_OFFSET};
pub use repo::product_repo::{ProductRepository, RepoError, RepoResult, SqliteProductRepository};
pub use seed::default_products;
pub use service::product_service::ProductService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
