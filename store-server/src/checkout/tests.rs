use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

use shared::client::{CartLine, CheckoutRequest};
use shared::error::ErrorCode;

use crate::auth::CurrentUser;
use crate::checkout::CheckoutService;
use crate::db::DbService;
use crate::db::models::{LedgerAction, LedgerQuery, Product, ProductCreate, UserRole};
use crate::db::repository::{LedgerRepository, OrderRepository, ProductRepository};

async fn test_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.expect("in-memory db");
    db.use_ns("store").use_db("store").await.expect("ns/db");
    DbService::define_schema(&db).await.expect("schema");
    db
}

fn customer_user() -> CurrentUser {
    CurrentUser {
        id: "user:cust1".to_string(),
        name: "Ravi".to_string(),
        email: "ravi@example.com".to_string(),
        role: UserRole::User,
    }
}

fn request_with_cart(cart: Vec<CartLine>) -> CheckoutRequest {
    CheckoutRequest {
        customer_name: "Ravi Kumar".to_string(),
        phone_number: "+91-9876543210".to_string(),
        email: "ravi@example.com".to_string(),
        address: "12 Anna Salai, Chennai".to_string(),
        cart,
    }
}

async fn seed_product(
    db: &Surreal<Db>,
    name: &str,
    price: f64,
    quantity: i64,
    discount: f64,
) -> Product {
    ProductRepository::new(db.clone())
        .create(ProductCreate {
            name: name.to_string(),
            price,
            brand: "Acme".to_string(),
            description: None,
            image: None,
            quantity: Some(quantity),
            discount_percentage: Some(discount),
        })
        .await
        .expect("seed product")
}

async fn stock_of(db: &Surreal<Db>, id: &str) -> i64 {
    ProductRepository::new(db.clone())
        .find_by_id(id)
        .await
        .unwrap()
        .unwrap()
        .quantity
}

#[tokio::test]
async fn test_checkout_discount_frozen_into_snapshot() {
    let db = test_db().await;
    let product = seed_product(&db, "Galaxy A15", 100.0, 10, 10.0).await;
    let id = product.id.as_ref().unwrap().to_string();

    let service = CheckoutService::new(db.clone());
    let order = service
        .checkout(
            request_with_cart(vec![CartLine {
                product_id: id.clone(),
                quantity: 2,
            }]),
            &customer_user(),
        )
        .await
        .expect("checkout");

    // 100 × 0.9 × 2 = 180.00, snapshot price 90.00
    assert_eq!(order.subtotal, 180.0);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].unit_price, 90.0);
    assert_eq!(order.items[0].list_price, 100.0);
    assert_eq!(order.items[0].quantity, 2);

    assert_eq!(stock_of(&db, &id).await, 8);
}

#[tokio::test]
async fn test_checkout_snapshot_survives_product_edits() {
    let db = test_db().await;
    let product = seed_product(&db, "Pixel 8", 500.0, 5, 0.0).await;
    let id = product.id.as_ref().unwrap().to_string();

    let service = CheckoutService::new(db.clone());
    let order = service
        .checkout(
            request_with_cart(vec![CartLine {
                product_id: id.clone(),
                quantity: 1,
            }]),
            &customer_user(),
        )
        .await
        .expect("checkout");

    // Later price change must not rewrite history
    ProductRepository::new(db.clone())
        .update(
            &id,
            crate::db::models::ProductUpdate {
                name: None,
                price: Some(450.0),
                brand: None,
                description: None,
                image: None,
                quantity: None,
                discount_percentage: None,
            },
        )
        .await
        .expect("price update");

    let stored = OrderRepository::new(db.clone()).find_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].items[0].unit_price, 500.0);
    assert_eq!(stored[0].order_number, order.order_number);
}

#[tokio::test]
async fn test_checkout_ids_are_server_generated() {
    let db = test_db().await;
    let product = seed_product(&db, "Moto G", 140.0, 3, 0.0).await;
    let id = product.id.as_ref().unwrap().to_string();

    let service = CheckoutService::new(db.clone());
    let order = service
        .checkout(
            request_with_cart(vec![CartLine {
                product_id: id,
                quantity: 1,
            }]),
            &customer_user(),
        )
        .await
        .expect("checkout");

    assert!(order.order_number.starts_with("ORD-"));
    assert_eq!(order.order_number.len(), "ORD-".len() + 8);
    assert!(Uuid::parse_str(&order.transaction_id).is_ok());
}

#[tokio::test]
async fn test_checkout_empty_cart_rejected() {
    let db = test_db().await;
    let service = CheckoutService::new(db.clone());

    let err = service
        .checkout(request_with_cart(vec![]), &customer_user())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::EmptyCart);
}

#[tokio::test]
async fn test_checkout_duplicate_lines_rejected() {
    let db = test_db().await;
    let product = seed_product(&db, "Redmi Note", 120.0, 10, 0.0).await;
    let id = product.id.as_ref().unwrap().to_string();

    let service = CheckoutService::new(db.clone());
    let err = service
        .checkout(
            request_with_cart(vec![
                CartLine {
                    product_id: id.clone(),
                    quantity: 1,
                },
                CartLine {
                    product_id: id.clone(),
                    quantity: 2,
                },
            ]),
            &customer_user(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicateCartLine);

    // Nothing was decremented
    assert_eq!(stock_of(&db, &id).await, 10);
}

#[tokio::test]
async fn test_partial_failure_restores_earlier_lines() {
    let db = test_db().await;
    let first = seed_product(&db, "Galaxy A15", 150.0, 5, 0.0).await;
    let second = seed_product(&db, "iPhone 15", 900.0, 1, 0.0).await;
    let first_id = first.id.as_ref().unwrap().to_string();
    let second_id = second.id.as_ref().unwrap().to_string();

    let service = CheckoutService::new(db.clone());
    let err = service
        .checkout(
            request_with_cart(vec![
                CartLine {
                    product_id: first_id.clone(),
                    quantity: 2,
                },
                // line 2 of 2: only 1 in stock
                CartLine {
                    product_id: second_id.clone(),
                    quantity: 3,
                },
            ]),
            &customer_user(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientStock);

    // First line was decremented then restored by the compensation
    assert_eq!(stock_of(&db, &first_id).await, 5);
    assert_eq!(stock_of(&db, &second_id).await, 1);

    // No order written, and the ledger shows the sell + restock pair
    assert!(OrderRepository::new(db.clone()).find_all().await.unwrap().is_empty());

    let ledger = LedgerRepository::new(db.clone());
    let (sells, _) = ledger
        .list(LedgerQuery {
            action: Some(LedgerAction::Sell),
            ..Default::default()
        })
        .await
        .unwrap();
    let (restocks, _) = ledger
        .list(LedgerQuery {
            action: Some(LedgerAction::Restock),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(sells.len(), 1);
    assert_eq!(restocks.len(), 1);
    assert_eq!(restocks[0].product_id, first_id);
}

#[tokio::test]
async fn test_has_purchased_is_id_based() {
    let db = test_db().await;
    let bought = seed_product(&db, "OnePlus 12", 650.0, 4, 5.0).await;
    let other = seed_product(&db, "OnePlus 12R", 500.0, 4, 0.0).await;
    let bought_id = bought.id.as_ref().unwrap().to_string();
    let other_id = other.id.as_ref().unwrap().to_string();

    let service = CheckoutService::new(db.clone());
    service
        .checkout(
            request_with_cart(vec![CartLine {
                product_id: bought_id.clone(),
                quantity: 1,
            }]),
            &customer_user(),
        )
        .await
        .expect("checkout");

    let orders = OrderRepository::new(db.clone());
    assert!(orders.has_purchased("ravi@example.com", &bought_id).await.unwrap());
    // A near-identical name does not create a false positive
    assert!(!orders.has_purchased("ravi@example.com", &other_id).await.unwrap());
    assert!(!orders.has_purchased("someone@else.com", &bought_id).await.unwrap());
}
