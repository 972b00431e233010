//! Product domain model.
//!
//! # Responsibility
//! - Define the canonical catalog record read by the query engine.
//! - Define create/update inputs and their validation rules.
//!
//! # Invariants
//! - `id` is stable and never reused for another product.
//! - `price` is finite and non-negative for every persisted product.
//! - `name` and `category` are non-blank.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a catalog product.
///
/// Seeded products use short numeric strings (`"1"`, `"2"`, ...); products
/// created at runtime receive a UUID v4 string.
pub type ProductId = String;

/// Canonical catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Grouping key; compared case-sensitively by filters.
    pub category: String,
    pub price: f64,
    pub in_stock: bool,
}

/// Validation failures for product writes.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductValidationError {
    EmptyId,
    EmptyName,
    EmptyCategory,
    InvalidPrice(f64),
    EmptyPatch,
}

impl Display for ProductValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "product id cannot be empty"),
            Self::EmptyName => write!(f, "product name cannot be empty"),
            Self::EmptyCategory => write!(f, "product category cannot be empty"),
            Self::InvalidPrice(price) => {
                write!(f, "product price must be a non-negative number, got {price}")
            }
            Self::EmptyPatch => write!(f, "no fields provided for update"),
        }
    }
}

impl Error for ProductValidationError {}

impl Product {
    /// Creates a product with a caller-provided stable ID.
    ///
    /// Used by seed/import paths where identity already exists externally.
    /// This constructor does not validate; call [`Product::validate`] before
    /// persisting.
    pub fn with_id(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        in_stock: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            price,
            in_stock,
        }
    }

    /// Validates write-path invariants.
    ///
    /// # Errors
    /// - Blank `id`, `name` or `category`.
    /// - Negative, NaN or infinite `price`.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.id.trim().is_empty() {
            return Err(ProductValidationError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(ProductValidationError::EmptyName);
        }
        if self.category.trim().is_empty() {
            return Err(ProductValidationError::EmptyCategory);
        }
        validate_price(self.price)
    }

    /// Applies a partial update in place.
    ///
    /// String fields are trimmed. Validation is left to the caller so the
    /// patched record is checked as a whole.
    pub fn apply_patch(&mut self, patch: &ProductPatch) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(category) = &patch.category {
            self.category = category.trim().to_string();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(in_stock) = patch.in_stock {
            self.in_stock = in_stock;
        }
    }
}

/// Input for creating a product; the ID is assigned on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: f64,
    /// Defaults to `true` when omitted.
    #[serde(default)]
    pub in_stock: Option<bool>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            price,
            in_stock: None,
        }
    }

    /// Builds the full record under a freshly generated UUID v4 id.
    pub fn into_product(self) -> Product {
        Product {
            id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            price: self.price,
            in_stock: self.in_stock.unwrap_or(true),
        }
    }
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub in_stock: Option<bool>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.in_stock.is_none()
    }
}

fn validate_price(price: f64) -> Result<(), ProductValidationError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(ProductValidationError::InvalidPrice(price))
    }
}
