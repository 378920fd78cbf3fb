//! Checkout transaction integration tests
//!
//! Every test runs against a fresh embedded RocksDB instance in a tempdir.

use std::time::Duration;

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use shop_server::checkout::{self, CheckoutError};
use shop_server::db::models::{
    Address, AddressCreate, Cart, Category, CategoryCreate, Product, ProductCreate, ProductUpdate,
};
use shop_server::db::repository::{
    AddressRepository, CartRepository, CategoryRepository, ProductRepository,
};
use shop_server::define_schema;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn test_db() -> (tempfile::TempDir, Surreal<Db>) {
    let tmp = tempfile::tempdir().unwrap();
    let db: Surreal<Db> = Surreal::new::<RocksDb>(tmp.path()).await.unwrap();
    db.use_ns("shop").use_db("shop").await.unwrap();
    define_schema(&db).await.unwrap();
    (tmp, db)
}

async fn seed_category(db: &Surreal<Db>) -> Category {
    CategoryRepository::new(db.clone())
        .create(CategoryCreate {
            name: "Electronics".to_string(),
            description: None,
        })
        .await
        .unwrap()
}

async fn seed_product(db: &Surreal<Db>, category: &Category, price: f64, stock: i64) -> Product {
    ProductRepository::new(db.clone())
        .create(ProductCreate {
            name: "Widget".to_string(),
            description: None,
            brand: Some("Acme".to_string()),
            price,
            stock_quantity: stock,
            category: category.id.as_ref().unwrap().to_string(),
            sku: None,
            variant: None,
            images: None,
        })
        .await
        .unwrap()
}

async fn seed_address(db: &Surreal<Db>, owner: &RecordId) -> Address {
    AddressRepository::new(db.clone())
        .create(
            owner.clone(),
            AddressCreate {
                full_name: "Jane Doe".to_string(),
                phone: Some("+254700000000".to_string()),
                line1: "1 Main St".to_string(),
                line2: None,
                city: "Nairobi".to_string(),
                postal_code: "00100".to_string(),
                country: "KE".to_string(),
            },
        )
        .await
        .unwrap()
}

fn user(key: &str) -> RecordId {
    RecordId::from_table_key("user", key)
}

async fn stock_of(db: &Surreal<Db>, product: &Product) -> i64 {
    ProductRepository::new(db.clone())
        .find_by_id(&product.id.as_ref().unwrap().to_string())
        .await
        .unwrap()
        .unwrap()
        .stock_quantity
}

#[tokio::test]
async fn happy_path_creates_order_and_shipping_and_empties_cart() {
    let (_tmp, db) = test_db().await;
    let owner = user("u1");
    let category = seed_category(&db).await;
    let product = seed_product(&db, &category, 19.99, 5).await;
    let address = seed_address(&db, &owner).await;

    let carts = CartRepository::new(db.clone());
    carts
        .add_item(&owner, product.id.clone().unwrap(), 2, product.price)
        .await
        .unwrap();

    let placed = checkout::place_order(
        &db,
        &owner,
        &address.id.as_ref().unwrap().to_string(),
        TIMEOUT,
    )
    .await
    .unwrap();

    assert_eq!(placed.order.total_amount, 39.98);
    assert_eq!(placed.order.lines.len(), 1);
    assert_eq!(placed.order.lines[0].quantity, 2);
    assert_eq!(placed.order.status.as_str(), "pending");
    assert!(!placed.order.paid);
    assert_eq!(placed.order.owner, owner);

    assert_eq!(placed.shipping.status.as_str(), "pending");
    assert_eq!(&placed.shipping.order, placed.order.id.as_ref().unwrap());
    assert_eq!(&placed.shipping.address, address.id.as_ref().unwrap());
    assert!(placed.shipping.shipped_at.is_none());

    // Stock decremented, cart destroyed
    assert_eq!(stock_of(&db, &product).await, 3);
    assert!(carts.find_by_owner(&owner).await.unwrap().is_none());
}

#[tokio::test]
async fn order_keeps_price_locked_at_add_to_cart_time() {
    let (_tmp, db) = test_db().await;
    let owner = user("u1");
    let category = seed_category(&db).await;
    let product = seed_product(&db, &category, 10.0, 10).await;
    let address = seed_address(&db, &owner).await;

    CartRepository::new(db.clone())
        .add_item(&owner, product.id.clone().unwrap(), 2, product.price)
        .await
        .unwrap();

    // Catalog price changes after the item was added
    ProductRepository::new(db.clone())
        .update(
            &product.id.as_ref().unwrap().to_string(),
            ProductUpdate {
                name: None,
                description: None,
                brand: None,
                price: Some(99.0),
                stock_quantity: None,
                category: None,
                variant: None,
                images: None,
                is_active: None,
            },
        )
        .await
        .unwrap();

    let placed = checkout::place_order(
        &db,
        &owner,
        &address.id.as_ref().unwrap().to_string(),
        TIMEOUT,
    )
    .await
    .unwrap();

    assert_eq!(placed.order.total_amount, 20.0);
    assert_eq!(placed.order.lines[0].price, 10.0);
}

#[tokio::test]
async fn insufficient_stock_rolls_back_everything() {
    let (_tmp, db) = test_db().await;
    let owner = user("u1");
    let category = seed_category(&db).await;
    let cheap = seed_product(&db, &category, 5.0, 10).await;
    let scarce = seed_product(&db, &category, 50.0, 1).await;
    let address = seed_address(&db, &owner).await;

    let carts = CartRepository::new(db.clone());
    carts
        .add_item(&owner, cheap.id.clone().unwrap(), 2, cheap.price)
        .await
        .unwrap();
    carts
        .add_item(&owner, scarce.id.clone().unwrap(), 3, scarce.price)
        .await
        .unwrap();

    let err = checkout::place_order(
        &db,
        &owner,
        &address.id.as_ref().unwrap().to_string(),
        TIMEOUT,
    )
    .await
    .unwrap_err();

    match err {
        CheckoutError::InsufficientStock {
            product,
            requested,
            available,
        } => {
            assert_eq!(product, scarce.id.as_ref().unwrap().to_string());
            assert_eq!(requested, 3);
            assert_eq!(available, 1);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // Nothing moved: both stocks intact, cart intact, no order exists
    assert_eq!(stock_of(&db, &cheap).await, 10);
    assert_eq!(stock_of(&db, &scarce).await, 1);
    let cart = carts.find_by_owner(&owner).await.unwrap().unwrap();
    assert_eq!(cart.items.len(), 2);

    let mut res = db.query("SELECT * FROM orders").await.unwrap();
    let orders: Vec<serde_json::Value> = res.take(0).unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn empty_cart_is_rejected() {
    let (_tmp, db) = test_db().await;
    let owner = user("u1");
    let address = seed_address(&db, &owner).await;

    let err = checkout::place_order(
        &db,
        &owner,
        &address.id.as_ref().unwrap().to_string(),
        TIMEOUT,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CheckoutError::EmptyCart));
}

#[tokio::test]
async fn expired_cart_checks_out_as_empty() {
    let (_tmp, db) = test_db().await;
    let owner = user("u1");
    let category = seed_category(&db).await;
    let product = seed_product(&db, &category, 10.0, 5).await;
    let address = seed_address(&db, &owner).await;

    let carts = CartRepository::new(db.clone());
    let cart = carts
        .add_item(&owner, product.id.clone().unwrap(), 1, product.price)
        .await
        .unwrap();

    // Push the retention deadline into the past
    db.query("UPDATE $cart SET expires_at = 1")
        .bind(("cart", cart.id.clone().unwrap()))
        .await
        .unwrap()
        .check()
        .unwrap();

    let err = checkout::place_order(
        &db,
        &owner,
        &address.id.as_ref().unwrap().to_string(),
        TIMEOUT,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CheckoutError::EmptyCart));

    // The stale record was purged on access, stock untouched
    let mut leftover = db
        .query("SELECT * FROM cart WHERE owner = $owner")
        .bind(("owner", owner.to_string()))
        .await
        .unwrap();
    let remaining: Vec<Cart> = leftover.take(0).unwrap();
    assert!(remaining.is_empty());
    assert_eq!(stock_of(&db, &product).await, 5);
}

#[tokio::test]
async fn foreign_address_behaves_as_missing() {
    let (_tmp, db) = test_db().await;
    let owner = user("u1");
    let stranger = user("u2");
    let category = seed_category(&db).await;
    let product = seed_product(&db, &category, 10.0, 5).await;
    let foreign_address = seed_address(&db, &stranger).await;

    CartRepository::new(db.clone())
        .add_item(&owner, product.id.clone().unwrap(), 1, product.price)
        .await
        .unwrap();

    let err = checkout::place_order(
        &db,
        &owner,
        &foreign_address.id.as_ref().unwrap().to_string(),
        TIMEOUT,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CheckoutError::AddressNotFound(_)));
    assert_eq!(stock_of(&db, &product).await, 5);
}

#[tokio::test]
async fn vanished_product_fails_the_whole_checkout() {
    let (_tmp, db) = test_db().await;
    let owner = user("u1");
    let category = seed_category(&db).await;
    let kept = seed_product(&db, &category, 10.0, 5).await;
    let doomed = seed_product(&db, &category, 20.0, 5).await;
    let address = seed_address(&db, &owner).await;

    let carts = CartRepository::new(db.clone());
    carts
        .add_item(&owner, kept.id.clone().unwrap(), 1, kept.price)
        .await
        .unwrap();
    carts
        .add_item(&owner, doomed.id.clone().unwrap(), 1, doomed.price)
        .await
        .unwrap();

    // Product removed from the catalog while sitting in the cart
    ProductRepository::new(db.clone())
        .delete(&doomed.id.as_ref().unwrap().to_string())
        .await
        .unwrap();

    let err = checkout::place_order(
        &db,
        &owner,
        &address.id.as_ref().unwrap().to_string(),
        TIMEOUT,
    )
    .await
    .unwrap_err();

    match err {
        CheckoutError::MissingProduct(id) => {
            assert_eq!(id, doomed.id.as_ref().unwrap().to_string())
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // The surviving product's stock is untouched
    assert_eq!(stock_of(&db, &kept).await, 5);
}

#[tokio::test]
async fn repeat_checkout_needs_a_new_cart() {
    let (_tmp, db) = test_db().await;
    let owner = user("u1");
    let category = seed_category(&db).await;
    let product = seed_product(&db, &category, 10.0, 5).await;
    let address = seed_address(&db, &owner).await;
    let address_id = address.id.as_ref().unwrap().to_string();

    CartRepository::new(db.clone())
        .add_item(&owner, product.id.clone().unwrap(), 1, product.price)
        .await
        .unwrap();

    checkout::place_order(&db, &owner, &address_id, TIMEOUT)
        .await
        .unwrap();

    // The cart was consumed; a second attempt has nothing to order
    let err = checkout::place_order(&db, &owner, &address_id, TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::EmptyCart));
}
