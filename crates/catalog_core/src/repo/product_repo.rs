//! Product repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `products` storage.
//! - Hand the query engine a full, ordered snapshot of the catalog.
//!
//! # Invariants
//! - Write paths must call `Product::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Snapshots are returned in insertion order.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::product::{Product, ProductId, ProductValidationError};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    category,
    price,
    in_stock
FROM products";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for product persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ProductValidationError),
    Db(DbError),
    NotFound(ProductId),
    InvalidData(String),
    /// Connection was not opened through `db::open_db*`.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "product not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted product data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it via db::open_db"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
            Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<ProductValidationError> for RepoError {
    fn from(value: ProductValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for product CRUD operations.
pub trait ProductRepository {
    fn create_product(&self, product: &Product) -> RepoResult<ProductId>;
    fn update_product(&self, product: &Product) -> RepoResult<()>;
    fn get_product(&self, id: &str) -> RepoResult<Option<Product>>;
    /// Returns every product in insertion order.
    fn list_products(&self) -> RepoResult<Vec<Product>>;
    fn delete_product(&self, id: &str) -> RepoResult<()>;
    fn count_products(&self) -> RepoResult<u64>;
    /// Inserts `products` atomically, only when the store is empty.
    ///
    /// Returns the number inserted; `0` when products already exist. A
    /// failing row rolls back the whole batch.
    fn seed_products(&self, products: &[Product]) -> RepoResult<usize>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Wraps a connection already bootstrapped by `db::open_db*`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Wraps a connection after checking its schema is fully migrated.
    ///
    /// # Errors
    /// - [`RepoError::UninitializedConnection`] when `user_version` differs
    ///   from the latest known migration.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn create_product(&self, product: &Product) -> RepoResult<ProductId> {
        insert_product(self.conn, product)?;
        Ok(product.id.clone())
    }

    fn update_product(&self, product: &Product) -> RepoResult<()> {
        product.validate()?;

        let changed = self.conn.execute(
            "UPDATE products
             SET
                name = ?1,
                category = ?2,
                price = ?3,
                in_stock = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?5;",
            params![
                product.name.as_str(),
                product.category.as_str(),
                product.price,
                bool_to_int(product.in_stock),
                product.id.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(product.id.clone()));
        }

        Ok(())
    }

    fn get_product(&self, id: &str) -> RepoResult<Option<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }

        Ok(None)
    }

    fn list_products(&self) -> RepoResult<Vec<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut products = Vec::new();

        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }

        Ok(products)
    }

    fn delete_product(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn count_products(&self) -> RepoResult<u64> {
        count_rows(self.conn)
    }

    fn seed_products(&self, products: &[Product]) -> RepoResult<usize> {
        // IMMEDIATE takes the write lock before the emptiness check, so two
        // seeding processes cannot both observe an empty table.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if count_rows(&tx)? > 0 {
            return Ok(0);
        }

        for product in products {
            insert_product(&tx, product)?;
        }
        tx.commit()?;

        Ok(products.len())
    }
}

fn insert_product(conn: &Connection, product: &Product) -> RepoResult<()> {
    product.validate()?;

    conn.execute(
        "INSERT INTO products (
            id,
            name,
            category,
            price,
            in_stock
        ) VALUES (?1, ?2, ?3, ?4, ?5);",
        params![
            product.id.as_str(),
            product.name.as_str(),
            product.category.as_str(),
            product.price,
            bool_to_int(product.in_stock),
        ],
    )?;

    Ok(())
}

fn count_rows(conn: &Connection) -> RepoResult<u64> {
    let count = conn.query_row("SELECT COUNT(*) FROM products;", [], |row| {
        row.get::<_, i64>(0)
    })?;
    u64::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative product count `{count}`")))
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let id: String = row.get("id")?;

    let in_stock = match row.get::<_, i64>("in_stock")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid in_stock value `{other}` in products.in_stock for `{id}`"
            )));
        }
    };

    let product = Product {
        id,
        name: row.get("name")?,
        category: row.get("category")?,
        price: row.get("price")?,
        in_stock,
    };
    product.validate().map_err(|err| {
        RepoError::InvalidData(format!("product `{}` failed validation: {err}", product.id))
    })?;
    Ok(product)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
