//! Order/shipping status synchronization integration tests

use std::time::Duration;

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use shop_server::checkout::{self, PlacedOrder};
use shop_server::db::models::{
    AddressCreate, CategoryCreate, OrderStatus, ProductCreate, ShippingStatus, ShippingUpdate,
};
use shop_server::db::repository::{
    AddressRepository, CartRepository, CategoryRepository, OrderRepository, ProductRepository,
    ShippingRepository,
};
use shop_server::define_schema;
use shop_server::fulfillment::{self, SyncError};

const TIMEOUT: Duration = Duration::from_secs(5);

async fn test_db() -> (tempfile::TempDir, Surreal<Db>) {
    let tmp = tempfile::tempdir().unwrap();
    let db: Surreal<Db> = Surreal::new::<RocksDb>(tmp.path()).await.unwrap();
    db.use_ns("shop").use_db("shop").await.unwrap();
    define_schema(&db).await.unwrap();
    (tmp, db)
}

/// Run a real checkout so the order/shipping pair exists the way production
/// creates it.
async fn placed_order(db: &Surreal<Db>) -> PlacedOrder {
    let owner = RecordId::from_table_key("user", "u1");

    let category = CategoryRepository::new(db.clone())
        .create(CategoryCreate {
            name: "Books".to_string(),
            description: None,
        })
        .await
        .unwrap();

    let product = ProductRepository::new(db.clone())
        .create(ProductCreate {
            name: "Novel".to_string(),
            description: None,
            brand: None,
            price: 12.5,
            stock_quantity: 10,
            category: category.id.as_ref().unwrap().to_string(),
            sku: None,
            variant: None,
            images: None,
        })
        .await
        .unwrap();

    let address = AddressRepository::new(db.clone())
        .create(
            owner.clone(),
            AddressCreate {
                full_name: "Jane Doe".to_string(),
                phone: None,
                line1: "1 Main St".to_string(),
                line2: None,
                city: "Nairobi".to_string(),
                postal_code: "00100".to_string(),
                country: "KE".to_string(),
            },
        )
        .await
        .unwrap();

    CartRepository::new(db.clone())
        .add_item(&owner, product.id.clone().unwrap(), 1, product.price)
        .await
        .unwrap();

    checkout::place_order(
        db,
        &owner,
        &address.id.as_ref().unwrap().to_string(),
        TIMEOUT,
    )
    .await
    .unwrap()
}

fn id_of(rid: &Option<RecordId>) -> String {
    rid.as_ref().unwrap().to_string()
}

#[tokio::test]
async fn order_shipped_propagates_to_shipping_and_stamps_timestamp() {
    let (_tmp, db) = test_db().await;
    let placed = placed_order(&db).await;

    let order = fulfillment::update_order_status(
        &db,
        &id_of(&placed.order.id),
        OrderStatus::Shipped,
        TIMEOUT,
    )
    .await
    .unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);

    let shipping = ShippingRepository::new(db.clone())
        .find_by_id(&id_of(&placed.shipping.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(shipping.status, ShippingStatus::Shipped);
    assert!(shipping.shipped_at.is_some());
    assert!(shipping.delivered_at.is_none());
}

#[tokio::test]
async fn repeating_shipped_leaves_the_original_timestamp() {
    let (_tmp, db) = test_db().await;
    let placed = placed_order(&db).await;
    let order_id = id_of(&placed.order.id);
    let shipping_id = id_of(&placed.shipping.id);

    fulfillment::update_order_status(&db, &order_id, OrderStatus::Shipped, TIMEOUT)
        .await
        .unwrap();

    let shippings = ShippingRepository::new(db.clone());
    let first = shippings
        .find_by_id(&shipping_id)
        .await
        .unwrap()
        .unwrap()
        .shipped_at
        .unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;

    fulfillment::update_order_status(&db, &order_id, OrderStatus::Shipped, TIMEOUT)
        .await
        .unwrap();

    let second = shippings
        .find_by_id(&shipping_id)
        .await
        .unwrap()
        .unwrap()
        .shipped_at
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn repeating_shipping_shipped_stamps_the_timestamp_once() {
    let (_tmp, db) = test_db().await;
    let placed = placed_order(&db).await;
    let shipping_id = id_of(&placed.shipping.id);

    let shipped = ShippingUpdate {
        status: Some("shipped".to_string()),
        ..Default::default()
    };

    let first = fulfillment::update_shipping_status(&db, &shipping_id, shipped.clone(), TIMEOUT)
        .await
        .unwrap();
    assert_eq!(first.status, ShippingStatus::Shipped);
    let stamped = first.shipped_at.unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;

    let second = fulfillment::update_shipping_status(&db, &shipping_id, shipped, TIMEOUT)
        .await
        .unwrap();
    assert_eq!(second.shipped_at, Some(stamped));

    // The linked order moved to shipped and stays there
    let order = OrderRepository::new(db.clone())
        .find_by_id(&id_of(&placed.order.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);
}

#[tokio::test]
async fn shipping_delivered_propagates_to_order() {
    let (_tmp, db) = test_db().await;
    let placed = placed_order(&db).await;

    let shipping = fulfillment::update_shipping_status(
        &db,
        &id_of(&placed.shipping.id),
        ShippingUpdate {
            status: Some("delivered".to_string()),
            ..Default::default()
        },
        TIMEOUT,
    )
    .await
    .unwrap();
    assert_eq!(shipping.status, ShippingStatus::Delivered);
    assert!(shipping.delivered_at.is_some());

    let order = OrderRepository::new(db.clone())
        .find_by_id(&id_of(&placed.order.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Delivered);
}

#[tokio::test]
async fn courier_only_statuses_leave_the_order_alone() {
    let (_tmp, db) = test_db().await;
    let placed = placed_order(&db).await;

    for status in ["in-transit", "out-for-delivery", "cancelled", "returned"] {
        fulfillment::update_shipping_status(
            &db,
            &id_of(&placed.shipping.id),
            ShippingUpdate {
                status: Some(status.to_string()),
                ..Default::default()
            },
            TIMEOUT,
        )
        .await
        .unwrap();

        let order = OrderRepository::new(db.clone())
            .find_by_id(&id_of(&placed.order.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.status, OrderStatus::Pending, "after {}", status);
    }
}

#[tokio::test]
async fn paid_has_no_shipping_counterpart() {
    let (_tmp, db) = test_db().await;
    let placed = placed_order(&db).await;

    let order = fulfillment::update_order_status(
        &db,
        &id_of(&placed.order.id),
        OrderStatus::Paid,
        TIMEOUT,
    )
    .await
    .unwrap();
    assert_eq!(order.status, OrderStatus::Paid);

    let shipping = ShippingRepository::new(db.clone())
        .find_by_id(&id_of(&placed.shipping.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(shipping.status, ShippingStatus::Pending);
}

#[tokio::test]
async fn immutable_references_are_rejected_before_any_write() {
    let (_tmp, db) = test_db().await;
    let placed = placed_order(&db).await;
    let shipping_id = id_of(&placed.shipping.id);

    let err = fulfillment::update_shipping_status(
        &db,
        &shipping_id,
        ShippingUpdate {
            status: Some("shipped".to_string()),
            order: Some(serde_json::json!("orders:somethingelse")),
            ..Default::default()
        },
        TIMEOUT,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SyncError::ImmutableField("order")));

    // The valid-looking status in the same payload was NOT applied
    let shipping = ShippingRepository::new(db.clone())
        .find_by_id(&shipping_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(shipping.status, ShippingStatus::Pending);
}

#[tokio::test]
async fn unknown_status_strings_are_rejected() {
    let (_tmp, db) = test_db().await;
    let placed = placed_order(&db).await;

    let err = fulfillment::update_shipping_status(
        &db,
        &id_of(&placed.shipping.id),
        ShippingUpdate {
            status: Some("teleported".to_string()),
            ..Default::default()
        },
        TIMEOUT,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SyncError::InvalidStatus(_)));
}

#[tokio::test]
async fn tracking_number_updates_without_touching_status() {
    let (_tmp, db) = test_db().await;
    let placed = placed_order(&db).await;

    let shipping = fulfillment::update_shipping_status(
        &db,
        &id_of(&placed.shipping.id),
        ShippingUpdate {
            tracking_number: Some("TRK-12345".to_string()),
            ..Default::default()
        },
        TIMEOUT,
    )
    .await
    .unwrap();

    assert_eq!(shipping.tracking_number.as_deref(), Some("TRK-12345"));
    assert_eq!(shipping.status, ShippingStatus::Pending);
    assert!(shipping.shipped_at.is_none());
}

#[tokio::test]
async fn missing_order_reports_not_found() {
    let (_tmp, db) = test_db().await;

    let err = fulfillment::update_order_status(&db, "orders:ghost", OrderStatus::Shipped, TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::NotFound(_)));
}
