//! In-memory catalog query engine.
//!
//! # Responsibility
//! - Filter and paginate a product collection.
//! - Look up products by ID and derive distinct categories.
//!
//! # Invariants
//! - Every function is a pure read over the collection passed in.
//! - Result ordering follows collection order.
//! - `products.len() <= limit` and `products.len() <= total - offset`.

use crate::model::product::Product;
use crate::query::request::QueryRequest;
use serde::{Deserialize, Serialize};

/// One page of matching products plus summary metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub products: Vec<Product>,
    /// Number of matches before pagination.
    pub total: usize,
    /// Effective page size after defaulting/clamping.
    pub limit: usize,
    /// Effective skip count after defaulting/clamping.
    pub offset: usize,
}

/// Distinct category names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryList {
    pub categories: Vec<String>,
}

/// Lists products matching every supplied predicate, sliced to one page.
///
/// Never fails: malformed pagination has already degraded to defaults in
/// [`QueryRequest::normalize`], and an offset past the end yields an empty
/// page.
pub fn list_products(products: &[Product], request: &QueryRequest) -> QueryResult {
    let normalized = request.normalize();
    let matched = products
        .iter()
        .filter(|product| normalized.filter.matches(product))
        .collect::<Vec<_>>();

    let total = matched.len();
    let page = matched
        .into_iter()
        .skip(normalized.offset)
        .take(normalized.limit)
        .cloned()
        .collect::<Vec<_>>();

    QueryResult {
        products: page,
        total,
        limit: normalized.limit,
        offset: normalized.offset,
    }
}

/// Finds a product by exact ID match.
pub fn find_product<'a>(products: &'a [Product], id: &str) -> Option<&'a Product> {
    products.iter().find(|product| product.id == id)
}

/// Returns distinct categories in first-seen collection order.
pub fn list_categories(products: &[Product]) -> CategoryList {
    let mut categories: Vec<String> = Vec::new();
    for product in products {
        if !categories.iter().any(|known| *known == product.category) {
            categories.push(product.category.clone());
        }
    }
    CategoryList { categories }
}
