//! Listing request model and normalization.
//!
//! # Responsibility
//! - Accept typed or string-valued listing input from callers.
//! - Reduce it to an effective filter and pagination window.
//!
//! # Invariants
//! - Normalization never fails: unparseable values are ignored or replaced
//!   by defaults.
//! - Negative pagination values clamp to zero.
//! - `inStock` is `true` only for the literal `true` (trimmed,
//!   case-insensitive); any other supplied text means `false`.

use crate::model::product::Product;

/// Page size used when the caller does not supply a usable `limit`.
pub const DEFAULT_LIMIT: usize = 10;
/// Skip count used when the caller does not supply a usable `offset`.
pub const DEFAULT_OFFSET: usize = 0;

/// Listing request with every field optional and independent.
///
/// `limit`/`offset` are signed so that client noise (negative values) can be
/// represented and clamped instead of rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRequest {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub in_stock: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl QueryRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn min_price(mut self, min_price: f64) -> Self {
        self.min_price = Some(min_price);
        self
    }

    pub fn max_price(mut self, max_price: f64) -> Self {
        self.max_price = Some(max_price);
        self
    }

    pub fn in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = Some(in_stock);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Builds a request from string key/value pairs, e.g. URL query params.
    ///
    /// Recognized keys: `category`, `minPrice`, `maxPrice`, `inStock`,
    /// `limit`, `offset`. Unknown keys are ignored; for repeated keys the last
    /// value wins. Empty values are treated as absent, except `inStock`
    /// where any supplied value is a filter. `limit`/`offset` must be whole
    /// numbers: a fractional value such as `1.5` counts as unparseable and
    /// falls back to the default.
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut request = Self::default();
        for (key, value) in params {
            let value = value.as_ref();
            match key.as_ref() {
                "category" => request.category = non_empty(value).map(str::to_string),
                "minPrice" => request.min_price = parse_price(value),
                "maxPrice" => request.max_price = parse_price(value),
                "inStock" => request.in_stock = Some(parse_in_stock(value)),
                "limit" => request.limit = parse_count(value),
                "offset" => request.offset = parse_count(value),
                _ => {}
            }
        }
        request
    }

    /// Resolves the effective filter and pagination window.
    pub fn normalize(&self) -> NormalizedQuery {
        NormalizedQuery {
            filter: ProductFilter {
                category: self
                    .category
                    .as_deref()
                    .and_then(non_empty)
                    .map(str::to_string),
                min_price: self.min_price.filter(|value| value.is_finite()),
                max_price: self.max_price.filter(|value| value.is_finite()),
                in_stock: self.in_stock,
            },
            limit: clamp_count(self.limit, DEFAULT_LIMIT),
            offset: clamp_count(self.offset, DEFAULT_OFFSET),
        }
    }
}

/// Active predicates after normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub in_stock: Option<bool>,
}

impl ProductFilter {
    /// Returns whether `product` passes every active predicate.
    ///
    /// Predicates short-circuit in order: category, min price, max price,
    /// stock flag.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if product.category != *category {
                return false;
            }
        }
        if let Some(min_price) = self.min_price {
            if product.price < min_price {
                return false;
            }
        }
        if let Some(max_price) = self.max_price {
            if product.price > max_price {
                return false;
            }
        }
        if let Some(in_stock) = self.in_stock {
            if product.in_stock != in_stock {
                return false;
            }
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.in_stock.is_none()
    }
}

/// Effective filter plus pagination window.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedQuery {
    pub filter: ProductFilter,
    pub limit: usize,
    pub offset: usize,
}

/// Interprets a client-supplied stock flag.
pub fn parse_in_stock(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn parse_price(value: &str) -> Option<f64> {
    non_empty(value)?
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn parse_count(value: &str) -> Option<i64> {
    non_empty(value)?.parse::<i64>().ok()
}

fn clamp_count(value: Option<i64>, default: usize) -> usize {
    match value {
        Some(value) if value <= 0 => 0,
        Some(value) => usize::try_from(value).unwrap_or(usize::MAX),
        None => default,
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_in_stock, QueryRequest, DEFAULT_LIMIT};

    #[test]
    fn defaults_apply_when_pagination_is_absent() {
        let normalized = QueryRequest::new().normalize();
        assert_eq!(normalized.limit, DEFAULT_LIMIT);
        assert_eq!(normalized.offset, 0);
        assert!(normalized.filter.is_empty());
    }

    #[test]
    fn negative_pagination_clamps_to_zero() {
        let normalized = QueryRequest::new().limit(-3).offset(-7).normalize();
        assert_eq!(normalized.limit, 0);
        assert_eq!(normalized.offset, 0);
    }

    #[test]
    fn from_params_parses_known_keys() {
        let request = QueryRequest::from_params([
            ("category", "Electronics"),
            ("minPrice", "100"),
            ("maxPrice", " 250.5 "),
            ("inStock", "true"),
            ("limit", "5"),
            ("offset", "2"),
            ("sort", "price"),
        ]);
        assert_eq!(request.category.as_deref(), Some("Electronics"));
        assert_eq!(request.min_price, Some(100.0));
        assert_eq!(request.max_price, Some(250.5));
        assert_eq!(request.in_stock, Some(true));
        assert_eq!(request.limit, Some(5));
        assert_eq!(request.offset, Some(2));
    }

    #[test]
    fn from_params_degrades_on_noise() {
        let request = QueryRequest::from_params([
            ("category", "   "),
            ("minPrice", "cheap"),
            ("maxPrice", "NaN"),
            ("limit", "ten"),
            ("offset", "1.5"),
        ]);
        let normalized = request.normalize();
        assert!(normalized.filter.is_empty());
        assert_eq!(normalized.limit, DEFAULT_LIMIT);
        assert_eq!(normalized.offset, 0);
    }

    #[test]
    fn fractional_pagination_falls_back_to_defaults() {
        let normalized =
            QueryRequest::from_params([("limit", "2.9"), ("offset", "1.5")]).normalize();
        assert_eq!(normalized.limit, DEFAULT_LIMIT);
        assert_eq!(normalized.offset, 0);
    }

    #[test]
    fn from_params_last_value_wins() {
        let request = QueryRequest::from_params([("limit", "3"), ("limit", "4")]);
        assert_eq!(request.limit, Some(4));
    }

    #[test]
    fn in_stock_accepts_only_true_literal() {
        assert!(parse_in_stock("true"));
        assert!(parse_in_stock(" TRUE "));
        assert!(parse_in_stock("True"));
        assert!(!parse_in_stock("1"));
        assert!(!parse_in_stock("yes"));
        assert!(!parse_in_stock("false"));
        assert!(!parse_in_stock(""));
    }

    #[test]
    fn empty_in_stock_param_is_still_a_filter() {
        let request = QueryRequest::from_params([("inStock", "")]);
        assert_eq!(request.in_stock, Some(false));
    }

    #[test]
    fn typed_non_finite_prices_are_ignored() {
        let normalized = QueryRequest::new()
            .min_price(f64::NAN)
            .max_price(f64::INFINITY)
            .normalize();
        assert_eq!(normalized.filter.min_price, None);
        assert_eq!(normalized.filter.max_price, None);
    }
}
