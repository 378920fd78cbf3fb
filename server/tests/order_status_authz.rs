//! Role guarding on the fulfillment endpoints, exercised over real HTTP
//!
//! Order-status moves are reserved for couriers and admins; a plain customer
//! is rejected before any write, even for their own order.

use std::net::SocketAddr;
use std::time::Duration;

use surrealdb::RecordId;

use shop_server::auth::Role;
use shop_server::checkout::{self, PlacedOrder};
use shop_server::core::build_app;
use shop_server::db::models::{AddressCreate, CategoryCreate, OrderStatus, ProductCreate};
use shop_server::db::repository::{
    AddressRepository, CartRepository, CategoryRepository, OrderRepository, ProductRepository,
};
use shop_server::{Config, ServerState};

const TIMEOUT: Duration = Duration::from_secs(5);

async fn serve() -> (tempfile::TempDir, SocketAddr, ServerState) {
    let tmp = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(tmp.path().to_str().unwrap(), 0);
    let state = ServerState::initialize(&config).await.unwrap();

    let app = build_app().with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (tmp, addr, state)
}

/// Seed a catalog and run a real checkout for `owner`
async fn placed_order(state: &ServerState, owner: &RecordId) -> PlacedOrder {
    let db = &state.db;

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
        .add_item(owner, product.id.clone().unwrap(), 1, product.price)
        .await
        .unwrap();

    checkout::place_order(
        db,
        owner,
        &address.id.as_ref().unwrap().to_string(),
        TIMEOUT,
    )
    .await
    .unwrap()
}

fn bearer(state: &ServerState, user: &RecordId, role: Role) -> String {
    state
        .get_jwt_service()
        .generate_token(&user.to_string(), "someone@shop.test", role)
        .unwrap()
}

#[tokio::test]
async fn customers_cannot_move_order_status() {
    let (_tmp, addr, state) = serve().await;
    let owner = RecordId::from_table_key("user", "u1");
    let placed = placed_order(&state, &owner).await;
    let order_id = placed.order.id.clone().unwrap().to_string();

    let client = reqwest::Client::new();
    let url = format!("http://{addr}/api/orders/{order_id}/status");

    // Owning the order does not help: the caller is still a customer
    let resp = client
        .put(&url)
        .bearer_auth(bearer(&state, &owner, Role::Customer))
        .json(&serde_json::json!({ "status": "shipped" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);

    // Nothing was written
    let order = OrderRepository::new(state.get_db())
        .find_by_id(&order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);

    // A courier passes the same guard
    let courier = RecordId::from_table_key("user", "c1");
    let resp = client
        .put(&url)
        .bearer_auth(bearer(&state, &courier, Role::Courier))
        .json(&serde_json::json!({ "status": "shipped" }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    let order = OrderRepository::new(state.get_db())
        .find_by_id(&order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);
}

#[tokio::test]
async fn missing_credentials_are_rejected() {
    let (_tmp, addr, _state) = serve().await;

    let client = reqwest::Client::new();
    let resp = client
        .put(format!("http://{addr}/api/orders/orders:ghost/status"))
        .json(&serde_json::json!({ "status": "shipped" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
}
