//! Product catalog use-case service.
//!
//! # Responsibility
//! - Run the query engine over a fresh repository snapshot per call.
//! - Provide validated create/update/delete entry points.
//!
//! # Invariants
//! - Read APIs see one consistent snapshot for the duration of a call.
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::product::{NewProduct, Product, ProductPatch, ProductValidationError};
use crate::query::engine::{find_product, list_categories, list_products, CategoryList, QueryResult};
use crate::query::request::QueryRequest;
use crate::repo::product_repo::{ProductRepository, RepoError, RepoResult};
use log::{debug, info, warn};
use std::time::Instant;

/// Use-case service wrapper for catalog reads and writes.
pub struct ProductService<R: ProductRepository> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists one filtered page of the catalog.
    pub fn list_products(&self, request: &QueryRequest) -> RepoResult<QueryResult> {
        let started_at = Instant::now();
        let snapshot = self.repo.list_products()?;
        let result = list_products(&snapshot, request);
        debug!(
            "event=products_list module=service status=ok filtered={} scanned={} total={} returned={} limit={} offset={} duration_ms={}",
            !request.normalize().filter.is_empty(),
            snapshot.len(),
            result.total,
            result.products.len(),
            result.limit,
            result.offset,
            started_at.elapsed().as_millis()
        );
        Ok(result)
    }

    /// Gets one product by ID; `Ok(None)` when it does not exist.
    pub fn get_product(&self, id: &str) -> RepoResult<Option<Product>> {
        let snapshot = self.repo.list_products()?;
        let found = find_product(&snapshot, id).cloned();
        debug!(
            "event=product_get module=service status=ok found={}",
            found.is_some()
        );
        Ok(found)
    }

    /// Lists distinct categories in first-seen catalog order.
    pub fn list_categories(&self) -> RepoResult<CategoryList> {
        let snapshot = self.repo.list_products()?;
        Ok(list_categories(&snapshot))
    }

    /// Creates a product under a newly generated ID.
    ///
    /// # Contract
    /// - `name`/`category` are trimmed.
    /// - `in_stock` defaults to `true`.
    /// - Returns the stored record.
    pub fn create_product(&self, input: NewProduct) -> RepoResult<Product> {
        let product = input.into_product();
        match self.repo.create_product(&product) {
            Ok(_) => {
                info!("event=product_create module=service status=ok id={}", product.id);
                Ok(product)
            }
            Err(err) => {
                warn!("event=product_create module=service status=error error={err}");
                Err(err)
            }
        }
    }

    /// Applies a partial update and returns the updated record.
    ///
    /// # Errors
    /// - `Validation(EmptyPatch)` when no field is supplied.
    /// - `NotFound` when `id` does not exist.
    pub fn update_product(&self, id: &str, patch: &ProductPatch) -> RepoResult<Product> {
        if patch.is_empty() {
            return Err(ProductValidationError::EmptyPatch.into());
        }

        let mut product = self
            .repo
            .get_product(id)?
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        product.apply_patch(patch);
        self.repo.update_product(&product)?;

        info!("event=product_update module=service status=ok id={id}");
        Ok(product)
    }

    /// Deletes a product by ID.
    pub fn delete_product(&self, id: &str) -> RepoResult<()> {
        self.repo.delete_product(id)?;
        info!("event=product_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Inserts `products` only when the catalog is empty.
    ///
    /// Returns the number of inserted products (`0` when already populated).
    /// The check and the inserts run in one transaction, so a failure leaves
    /// the catalog empty and a later call can retry.
    pub fn seed_if_empty(&self, products: &[Product]) -> RepoResult<usize> {
        match self.repo.seed_products(products) {
            Ok(inserted) => {
                if inserted > 0 {
                    info!("event=catalog_seed module=service status=ok inserted={inserted}");
                }
                Ok(inserted)
            }
            Err(err) => {
                warn!("event=catalog_seed module=service status=error error={err}");
                Err(err)
            }
        }
    }
}
