//! Catalog route handlers.
//!
//! # Responsibility
//! - Map catalog routes onto `ProductService` use cases.
//! - Translate service outcomes into stable status/body envelopes.
//!
//! # Invariants
//! - Handlers never panic; every outcome is an `ApiResponse`.
//! - Listing never fails on noisy query params.
//! - Storage error details are logged, never echoed to callers.

use crate::response::{
    ApiResponse, INTERNAL_ERROR, METHOD_NOT_ALLOWED, MISSING_PRODUCT_FIELDS, PRODUCT_DELETED,
    PRODUCT_NOT_FOUND, ROUTE_NOT_FOUND,
};
use catalog_core::db::{open_db, open_db_in_memory};
use catalog_core::{
    default_products, CatalogConfig, NewProduct, ProductPatch, ProductService, QueryRequest,
    RepoError, RepoResult, SqliteProductRepository,
};
use log::{error, info, warn};
use rusqlite::Connection;
use serde::Deserialize;
use std::borrow::Cow;

/// Create payload as sent by clients; required fields are checked by hand so
/// a missing field maps to one stable message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateProductBody {
    name: Option<String>,
    category: Option<String>,
    price: Option<f64>,
    in_stock: Option<bool>,
}

/// Route layer bound to one catalog connection.
pub struct CatalogApi {
    conn: Connection,
}

impl CatalogApi {
    /// Opens the configured catalog database, seeding it when empty.
    pub fn open(config: &CatalogConfig) -> RepoResult<Self> {
        let conn = open_db(&config.db_path)?;
        Self::with_seeded_connection(conn)
    }

    /// Opens a private in-memory catalog holding the default products.
    pub fn in_memory() -> RepoResult<Self> {
        let conn = open_db_in_memory()?;
        Self::with_seeded_connection(conn)
    }

    /// Wraps an already-migrated connection without seeding.
    pub fn from_connection(conn: Connection) -> RepoResult<Self> {
        SqliteProductRepository::try_new(&conn)?;
        Ok(Self { conn })
    }

    fn with_seeded_connection(conn: Connection) -> RepoResult<Self> {
        let api = Self::from_connection(conn)?;
        let inserted = api.service()?.seed_if_empty(&default_products())?;
        if inserted > 0 {
            info!("event=api_seed module=api status=ok inserted={inserted}");
        }
        Ok(api)
    }

    fn service(&self) -> RepoResult<ProductService<SqliteProductRepository<'_>>> {
        Ok(ProductService::new(SqliteProductRepository::try_new(
            &self.conn,
        )?))
    }

    /// `GET /products` with already-split query params.
    pub fn list_products<I, K, V>(&self, params: I) -> ApiResponse
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let request = QueryRequest::from_params(params);
        match self.service().and_then(|service| service.list_products(&request)) {
            Ok(result) => ApiResponse::ok(&result),
            Err(err) => error_response("list_products", err),
        }
    }

    /// `GET /products/{id}`.
    pub fn get_product(&self, id: &str) -> ApiResponse {
        match self.service().and_then(|service| service.get_product(id)) {
            Ok(Some(product)) => ApiResponse::ok(&product),
            Ok(None) => ApiResponse::not_found(PRODUCT_NOT_FOUND),
            Err(err) => error_response("get_product", err),
        }
    }

    /// `GET /categories`.
    pub fn list_categories(&self) -> ApiResponse {
        match self.service().and_then(|service| service.list_categories()) {
            Ok(categories) => ApiResponse::ok(&categories),
            Err(err) => error_response("list_categories", err),
        }
    }

    /// `POST /products` with a JSON body.
    pub fn create_product(&self, body: &str) -> ApiResponse {
        let body = match serde_json::from_str::<CreateProductBody>(body) {
            Ok(body) => body,
            Err(err) => return ApiResponse::bad_request(format!("Invalid request body: {err}")),
        };
        let (Some(name), Some(category), Some(price)) = (body.name, body.category, body.price)
        else {
            return ApiResponse::bad_request(MISSING_PRODUCT_FIELDS);
        };

        let input = NewProduct {
            name,
            category,
            price,
            in_stock: body.in_stock,
        };
        match self.service().and_then(|service| service.create_product(input)) {
            Ok(product) => ApiResponse::created(&product),
            Err(err) => error_response("create_product", err),
        }
    }

    /// `PUT /products/{id}` with a JSON body of fields to change.
    pub fn update_product(&self, id: &str, body: &str) -> ApiResponse {
        let patch = match serde_json::from_str::<ProductPatch>(body) {
            Ok(patch) => patch,
            Err(err) => return ApiResponse::bad_request(format!("Invalid request body: {err}")),
        };
        match self
            .service()
            .and_then(|service| service.update_product(id, &patch))
        {
            Ok(product) => ApiResponse::ok(&product),
            Err(err) => error_response("update_product", err),
        }
    }

    /// `DELETE /products/{id}`.
    pub fn delete_product(&self, id: &str) -> ApiResponse {
        match self.service().and_then(|service| service.delete_product(id)) {
            Ok(()) => ApiResponse::message(200, PRODUCT_DELETED),
            Err(err) => error_response("delete_product", err),
        }
    }

    /// Dispatches one request by method and path.
    ///
    /// Paths may carry an `/api` prefix and a trailing slash. `query` is the
    /// raw query string without `?`.
    pub fn route(&self, method: &str, path: &str, query: &str, body: &str) -> ApiResponse {
        let method = method.trim().to_ascii_uppercase();
        let path = path.trim().trim_end_matches('/');
        let path = path
            .strip_prefix("/api")
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            .unwrap_or(path);
        let segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>();

        match (method.as_str(), segments.as_slice()) {
            ("GET", ["products"]) => self.list_products(parse_query_string(query)),
            ("POST", ["products"]) => self.create_product(body),
            ("GET", ["products", id]) => self.get_product(&decode_component(id)),
            ("PUT", ["products", id]) => self.update_product(&decode_component(id), body),
            ("DELETE", ["products", id]) => self.delete_product(&decode_component(id)),
            ("GET", ["categories"]) => self.list_categories(),
            (_, ["products"]) | (_, ["products", _]) | (_, ["categories"]) => {
                ApiResponse::message(405, METHOD_NOT_ALLOWED)
            }
            _ => ApiResponse::not_found(ROUTE_NOT_FOUND),
        }
    }
}

fn error_response(operation: &str, err: RepoError) -> ApiResponse {
    match err {
        RepoError::NotFound(_) => ApiResponse::not_found(PRODUCT_NOT_FOUND),
        RepoError::Validation(err) => {
            warn!("event={operation} module=api status=rejected error={err}");
            ApiResponse::bad_request(err.to_string())
        }
        other => {
            error!("event={operation} module=api status=error error={other}");
            ApiResponse::message(500, INTERNAL_ERROR)
        }
    }
}

/// Splits `a=1&b=2` into decoded pairs; keys without `=` get an empty value.
fn parse_query_string(query: &str) -> Vec<(String, String)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (
                decode_component(key).into_owned(),
                decode_component(value).into_owned(),
            )
        })
        .collect()
}

fn decode_component(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['%', '+']) {
        return Cow::Borrowed(raw);
    }
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => Cow::Owned(decoded.into_owned()),
        // Malformed escapes are passed through as-is.
        Err(_) => Cow::Owned(spaced),
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_component, parse_query_string, CatalogApi};
    use catalog_core::CatalogConfig;

    fn api() -> CatalogApi {
        CatalogApi::in_memory().expect("in-memory catalog should open")
    }

    #[test]
    fn list_products_returns_page_envelope() {
        let response = api().route("GET", "/api/products", "", "");
        assert_eq!(response.status, 200);
        assert!(response.body["products"].is_array());
        assert_eq!(response.body["total"], 12);
        assert_eq!(response.body["limit"], 10);
        assert_eq!(response.body["offset"], 0);
    }

    #[test]
    fn list_products_applies_query_filters() {
        let response = api().route(
            "GET",
            "/products",
            "category=Electronics&minPrice=100&inStock=true",
            "",
        );
        assert_eq!(response.status, 200);
        assert_eq!(response.body["total"], 1);
        assert_eq!(response.body["products"][0]["name"], "Noise-Cancelling Headphones");
    }

    #[test]
    fn list_products_decodes_encoded_values() {
        let response = api().route("GET", "/products", "category=Home+Appliances", "");
        assert_eq!(response.body["total"], 3);
        let response = api().route("GET", "/products", "category=Home%20Appliances", "");
        assert_eq!(response.body["total"], 3);
    }

    #[test]
    fn list_products_tolerates_noise() {
        let response = api().route("GET", "/products", "limit=abc&offset=-2&maxPrice=", "");
        assert_eq!(response.status, 200);
        assert_eq!(response.body["limit"], 10);
        assert_eq!(response.body["offset"], 0);
    }

    #[test]
    fn get_product_by_id_and_not_found() {
        let api = api();
        let found = api.route("GET", "/api/products/1", "", "");
        assert_eq!(found.status, 200);
        assert_eq!(found.body["id"], "1");

        let missing = api.route("GET", "/api/products/999", "", "");
        assert_eq!(missing.status, 404);
        assert_eq!(missing.message_text(), Some("Product not found"));
    }

    #[test]
    fn categories_are_listed() {
        let response = api().route("GET", "/categories", "", "");
        assert_eq!(response.status, 200);
        let categories = response.body["categories"]
            .as_array()
            .expect("categories should be an array");
        assert_eq!(categories.len(), 5);
        assert_eq!(categories[0], "Electronics");
    }

    #[test]
    fn create_requires_name_price_and_category() {
        let response = api().route(
            "POST",
            "/api/products",
            "",
            r#"{"price":100,"category":"Electronics"}"#,
        );
        assert_eq!(response.status, 400);
        assert_eq!(
            response.message_text(),
            Some("Product must have name, price, and category")
        );
    }

    #[test]
    fn create_returns_created_product() {
        let api = api();
        let response = api.route(
            "POST",
            "/api/products",
            "",
            r#"{"name":"New Product","price":200,"category":"Home Appliances"}"#,
        );
        assert_eq!(response.status, 201);
        assert_eq!(response.body["name"], "New Product");
        let id = response.body["id"].as_str().expect("id should be a string");

        let fetched = api.get_product(id);
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body["inStock"], true);
    }

    #[test]
    fn create_rejects_negative_price_and_bad_json() {
        let api = api();
        let negative = api.create_product(r#"{"name":"X","price":-1,"category":"Y"}"#);
        assert_eq!(negative.status, 400);

        let garbage = api.create_product("{not json");
        assert_eq!(garbage.status, 400);
        assert!(garbage
            .message_text()
            .is_some_and(|message| message.starts_with("Invalid request body")));
    }

    #[test]
    fn update_changes_fields_and_reports_missing() {
        let api = api();
        let missing = api.route("PUT", "/api/products/999", "", r#"{"price":250}"#);
        assert_eq!(missing.status, 404);
        assert_eq!(missing.message_text(), Some("Product not found"));

        let updated = api.route("PUT", "/api/products/1", "", r#"{"price":300}"#);
        assert_eq!(updated.status, 200);
        assert_eq!(updated.body["price"], 300.0);

        let empty = api.route("PUT", "/api/products/1", "", "{}");
        assert_eq!(empty.status, 400);
        assert_eq!(empty.message_text(), Some("no fields provided for update"));
    }

    #[test]
    fn delete_removes_product() {
        let api = api();
        let missing = api.route("DELETE", "/api/products/999", "", "");
        assert_eq!(missing.status, 404);

        let deleted = api.route("DELETE", "/api/products/1", "", "");
        assert_eq!(deleted.status, 200);
        assert_eq!(deleted.message_text(), Some("Product deleted successfully"));
        assert_eq!(api.get_product("1").status, 404);
    }

    #[test]
    fn unknown_routes_and_methods() {
        let api = api();
        assert_eq!(api.route("GET", "/orders", "", "").status, 404);
        assert_eq!(api.route("PATCH", "/products/1", "", "").status, 405);
        assert_eq!(api.route("get", "/products/", "", "").status, 200);
    }

    #[test]
    fn open_seeds_file_database_once() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = CatalogConfig {
            db_path: dir.path().join("catalog.sqlite3"),
            ..CatalogConfig::default()
        };

        let first = CatalogApi::open(&config).expect("open catalog");
        assert_eq!(first.delete_product("12").status, 200);
        drop(first);

        let second = CatalogApi::open(&config).expect("reopen catalog");
        let listing = second.list_products([("limit", "100")]);
        assert_eq!(listing.body["total"], 11);
    }

    #[test]
    fn storage_failure_maps_to_generic_500() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = CatalogConfig {
            db_path: dir.path().join("catalog.sqlite3"),
            ..CatalogConfig::default()
        };
        let api = CatalogApi::open(&config).expect("open catalog");

        let other = rusqlite::Connection::open(&config.db_path).expect("second handle");
        other
            .execute_batch("DROP TABLE products;")
            .expect("drop products table");
        drop(other);

        let response = api.route("GET", "/products", "", "");
        assert_eq!(response.status, 500);
        assert_eq!(response.message_text(), Some("Internal server error"));
        let body = response.body.to_string();
        assert!(!body.contains("no such table"));
        assert!(!body.contains("products"));
    }

    #[test]
    fn query_string_parsing() {
        let pairs = parse_query_string("?a=1&&b&c=x%26y");
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), String::new()),
                ("c".to_string(), "x&y".to_string()),
            ]
        );
        assert_eq!(decode_component("bad%zz"), "bad%zz");
        assert_eq!(decode_component("plain"), "plain");
    }
}
