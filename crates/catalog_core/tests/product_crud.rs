use catalog_core::db::migrations::latest_version;
use catalog_core::db::open_db_in_memory;
use catalog_core::{
    default_products, NewProduct, Product, ProductPatch, ProductRepository, ProductService,
    ProductValidationError, QueryRequest, RepoError, SqliteProductRepository,
};
use rusqlite::Connection;

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let product = Product::with_id("42", "Desk Lamp", "Home", 29.5, true);
    let id = repo.create_product(&product).unwrap();

    let loaded = repo.get_product(&id).unwrap().unwrap();
    assert_eq!(loaded, product);
}

#[test]
fn list_returns_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    for product in default_products() {
        repo.create_product(&product).unwrap();
    }

    let ids = repo
        .list_products()
        .unwrap()
        .into_iter()
        .map(|product| product.id)
        .collect::<Vec<_>>();
    let expected = (1..=12).map(|id| id.to_string()).collect::<Vec<_>>();
    assert_eq!(ids, expected);
    assert_eq!(repo.count_products().unwrap(), 12);
}

#[test]
fn duplicate_id_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let product = Product::with_id("1", "Lamp", "Home", 10.0, true);
    repo.create_product(&product).unwrap();
    let err = repo.create_product(&product).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn validation_failure_blocks_create_and_update() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let invalid = Product::with_id("1", "Lamp", "Home", -5.0, true);
    let create_err = repo.create_product(&invalid).unwrap_err();
    assert!(matches!(
        create_err,
        RepoError::Validation(ProductValidationError::InvalidPrice(_))
    ));

    let mut valid = Product::with_id("2", "Lamp", "Home", 5.0, true);
    repo.create_product(&valid).unwrap();
    valid.name = "   ".to_string();
    let update_err = repo.update_product(&valid).unwrap_err();
    assert!(matches!(
        update_err,
        RepoError::Validation(ProductValidationError::EmptyName)
    ));
}

#[test]
fn update_and_delete_missing_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let ghost = Product::with_id("999", "Ghost", "Home", 1.0, true);
    let err = repo.update_product(&ghost).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == "999"));

    let err = repo.delete_product("999").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == "999"));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteProductRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("uninitialized connection should be rejected"),
    }
}

#[test]
fn invalid_persisted_row_is_reported() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO products (id, name, category, price, in_stock)
         VALUES ('1', '', 'Home', 3.0, 1);",
        [],
    )
    .unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let err = repo.list_products().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn service_seeds_once_and_queries_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let service = ProductService::new(SqliteProductRepository::try_new(&conn).unwrap());

    assert_eq!(service.seed_if_empty(&default_products()).unwrap(), 12);
    assert_eq!(service.seed_if_empty(&default_products()).unwrap(), 0);

    let page = service
        .list_products(&QueryRequest::new().category("Electronics").min_price(100.0))
        .unwrap();
    assert_eq!(page.total, 2);

    assert!(service.get_product("999").unwrap().is_none());
    assert_eq!(service.get_product("3").unwrap().unwrap().name, "Smart Watch");
    assert_eq!(service.list_categories().unwrap().categories.len(), 5);
}

#[test]
fn service_create_assigns_id_and_defaults_stock() {
    let conn = open_db_in_memory().unwrap();
    let service = ProductService::new(SqliteProductRepository::try_new(&conn).unwrap());

    let created = service
        .create_product(NewProduct::new("  New Product ", "Home Appliances", 200.0))
        .unwrap();

    assert!(!created.id.is_empty());
    assert_eq!(created.name, "New Product");
    assert!(created.in_stock);
    assert_eq!(service.get_product(&created.id).unwrap(), Some(created));
}

#[test]
fn service_update_applies_patch() {
    let conn = open_db_in_memory().unwrap();
    let service = ProductService::new(SqliteProductRepository::try_new(&conn).unwrap());
    service.seed_if_empty(&default_products()).unwrap();

    let patch = ProductPatch {
        price: Some(300.0),
        in_stock: Some(false),
        ..ProductPatch::default()
    };
    let updated = service.update_product("1", &patch).unwrap();

    assert_eq!(updated.price, 300.0);
    assert!(!updated.in_stock);
    assert_eq!(updated.name, "Wireless Mouse");
    assert_eq!(service.get_product("1").unwrap(), Some(updated));
}

#[test]
fn service_update_rejects_empty_patch_and_missing_id() {
    let conn = open_db_in_memory().unwrap();
    let service = ProductService::new(SqliteProductRepository::try_new(&conn).unwrap());
    service.seed_if_empty(&default_products()).unwrap();

    let err = service
        .update_product("1", &ProductPatch::default())
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ProductValidationError::EmptyPatch)
    ));

    let patch = ProductPatch {
        price: Some(250.0),
        ..ProductPatch::default()
    };
    let err = service.update_product("999", &patch).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn service_delete_removes_product_from_listing() {
    let conn = open_db_in_memory().unwrap();
    let service = ProductService::new(SqliteProductRepository::try_new(&conn).unwrap());
    service.seed_if_empty(&default_products()).unwrap();

    service.delete_product("1").unwrap();

    assert!(service.get_product("1").unwrap().is_none());
    assert_eq!(service.list_products(&QueryRequest::new()).unwrap().total, 11);
    assert!(matches!(
        service.delete_product("1").unwrap_err(),
        RepoError::NotFound(_)
    ));
}

#[test]
fn seed_failure_rolls_back_and_retry_inserts_everything() {
    let conn = open_db_in_memory().unwrap();
    let service = ProductService::new(SqliteProductRepository::try_new(&conn).unwrap());

    let mut broken = default_products();
    broken[6].price = -1.0;
    let err = service.seed_if_empty(&broken).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ProductValidationError::InvalidPrice(_))
    ));

    let repo = SqliteProductRepository::try_new(&conn).unwrap();
    assert_eq!(repo.count_products().unwrap(), 0);

    assert_eq!(service.seed_if_empty(&default_products()).unwrap(), 12);
    assert_eq!(repo.count_products().unwrap(), 12);
    assert_eq!(service.seed_if_empty(&default_products()).unwrap(), 0);
}
