//! End-to-end flow tests against a real in-memory database
//!
//! Drives the actual API handlers (register → login → stock → sell →
//! checkout → ledger) without going through a TCP socket.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

use shared::client::{
    CartLine, CheckoutRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest, SellRequest,
};
use shared::error::ErrorCode;

use store_server::api::{auth, ledger, orders, products};
use store_server::db::DbService;
use store_server::db::models::{LedgerAction, LedgerQuery, ProductCreate};
use store_server::db::repository::UserRepository;
use store_server::{Config, CurrentUser, ServerState};

async fn test_state() -> ServerState {
    let db = Surreal::new::<Mem>(()).await.expect("in-memory db");
    db.use_ns("store").use_db("store").await.expect("ns/db");
    DbService::define_schema(&db).await.expect("schema");

    let work_dir = tempfile::tempdir().expect("tempdir");
    let config = Config::with_overrides(work_dir.path().to_string_lossy().to_string(), 0);
    // Leak the tempdir guard so the directory outlives the test state
    std::mem::forget(work_dir);

    ServerState::with_db(config, db)
}

fn register_req(name: &str, email: &str, role: Option<&str>) -> RegisterRequest {
    RegisterRequest {
        name: name.to_string(),
        email: email.to_string(),
        password: "secret123".to_string(),
        role: role.map(|r| r.to_string()),
    }
}

async fn register_and_login(state: &ServerState, name: &str, email: &str, role: &str) -> CurrentUser {
    let (status, _) = auth::handler::register(
        State(state.clone()),
        Json(register_req(name, email, Some(role))),
    )
    .await
    .expect("register");
    assert_eq!(status, StatusCode::CREATED);

    let Json(login) = auth::handler::login(
        State(state.clone()),
        Json(LoginRequest {
            email: email.to_string(),
            password: "secret123".to_string(),
        }),
    )
    .await
    .expect("login");

    assert_eq!(login.role, role);

    // Decode the issued token the way the middleware would
    let claims = state
        .jwt_service()
        .validate_token(&login.token)
        .expect("token valid");
    CurrentUser::try_from(claims).expect("claims well-formed")
}

fn product_create(name: &str, price: f64, quantity: i64, discount: f64) -> ProductCreate {
    ProductCreate {
        name: name.to_string(),
        price,
        brand: "Acme".to_string(),
        description: Some("test".to_string()),
        image: None,
        quantity: Some(quantity),
        discount_percentage: Some(discount),
    }
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let state = test_state().await;

    let (status, _) = auth::handler::register(
        State(state.clone()),
        Json(register_req("First", "dup@example.com", None)),
    )
    .await
    .expect("first registration");
    assert_eq!(status, StatusCode::CREATED);

    let err = auth::handler::register(
        State(state.clone()),
        Json(register_req("Second", "dup@example.com", None)),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::EmailExists);
}

#[tokio::test]
async fn test_sell_and_ledger_through_handlers() {
    let state = test_state().await;
    let staff = register_and_login(&state, "Asha", "asha@example.com", "staff").await;
    let admin = register_and_login(&state, "Boss", "boss@example.com", "admin").await;

    // Create product as staff
    let (status, Json(product)) = products::handler::create(
        State(state.clone()),
        staff.clone(),
        Json(product_create("Galaxy A15", 150.0, 10, 0.0)),
    )
    .await
    .expect("create product");
    assert_eq!(status, StatusCode::CREATED);
    let product_id = product.id.as_ref().unwrap().to_string();

    // Sell 4 units
    let Json(sold) = products::handler::sell(
        State(state.clone()),
        staff.clone(),
        Json(SellRequest {
            product_id: product_id.clone(),
            quantity: 4,
        }),
    )
    .await
    .expect("sell");
    assert_eq!(sold.data.unwrap().quantity, 6);

    // Selling more than stock fails and changes nothing
    let err = products::handler::sell(
        State(state.clone()),
        staff.clone(),
        Json(SellRequest {
            product_id: product_id.clone(),
            quantity: 7,
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientStock);

    // Ledger shows one add and one sell
    let Json(listing) = ledger::handler::list(
        State(state.clone()),
        Query(LedgerQuery::default()),
    )
    .await
    .expect("ledger list");
    let adds = listing
        .items
        .iter()
        .filter(|e| e.action == LedgerAction::Add)
        .count();
    let sells = listing
        .items
        .iter()
        .filter(|e| e.action == LedgerAction::Sell)
        .count();
    assert_eq!(adds, 1);
    assert_eq!(sells, 1);

    // Product delete is admin-gated
    let err = products::handler::delete(
        State(state.clone()),
        staff.clone(),
        Path(product_id.clone()),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::AdminRequired);

    products::handler::delete(State(state.clone()), admin, Path(product_id.clone()))
        .await
        .expect("admin delete");

    // The ledger still references the deleted product by its denormalized id
    let Json(listing) = ledger::handler::list(
        State(state.clone()),
        Query(LedgerQuery {
            product_id: Some(product_id.clone()),
            ..Default::default()
        }),
    )
    .await
    .expect("ledger after delete");
    assert!(listing.total >= 2);
}

#[tokio::test]
async fn test_checkout_through_handlers() {
    let state = test_state().await;
    let staff = register_and_login(&state, "Asha", "asha2@example.com", "staff").await;
    let customer = register_and_login(&state, "Ravi", "ravi@example.com", "user").await;

    let (_, Json(product)) = products::handler::create(
        State(state.clone()),
        staff,
        Json(product_create("Pixel 8", 100.0, 10, 10.0)),
    )
    .await
    .expect("create product");
    let product_id = product.id.as_ref().unwrap().to_string();

    let (status, Json(order)) = orders::handler::checkout(
        State(state.clone()),
        customer.clone(),
        Json(CheckoutRequest {
            customer_name: "Ravi Kumar".to_string(),
            phone_number: "+91-9876543210".to_string(),
            email: "ravi@example.com".to_string(),
            address: "12 Anna Salai, Chennai".to_string(),
            cart: vec![CartLine {
                product_id: product_id.clone(),
                quantity: 2,
            }],
        }),
    )
    .await
    .expect("checkout");

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order.subtotal, 180.0);
    assert_eq!(order.items[0].unit_price, 90.0);

    // Order is listed and the purchase check is id-based
    let Json(all_orders) = orders::handler::list(State(state.clone()))
        .await
        .expect("list orders");
    assert_eq!(all_orders.len(), 1);

    let Json(purchased) = orders::handler::purchased(
        State(state.clone()),
        customer.clone(),
        Path(product_id.clone()),
    )
    .await
    .expect("purchased check");
    assert!(purchased.purchased);
}

#[tokio::test]
async fn test_password_reset_token_is_single_use() {
    let state = test_state().await;
    register_and_login(&state, "Asha", "reset@example.com", "staff").await;

    // Issue the token (response never contains it)
    auth::handler::forgot_password(
        State(state.clone()),
        Json(ForgotPasswordRequest {
            email: "reset@example.com".to_string(),
        }),
    )
    .await
    .expect("forgot password");

    // Pull the stored token straight from the database
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_email("reset@example.com")
        .await
        .unwrap()
        .unwrap();
    let token = user.reset_token.clone().expect("token issued");
    assert!(user.reset_token_expires.unwrap() > chrono::Utc::now().timestamp_millis());

    // First reset succeeds
    auth::handler::reset_password(
        State(state.clone()),
        Json(ResetPasswordRequest {
            token: token.clone(),
            new_password: "brandnew1".to_string(),
        }),
    )
    .await
    .expect("reset password");

    // Second use of the same token is rejected
    let err = auth::handler::reset_password(
        State(state.clone()),
        Json(ResetPasswordRequest {
            token,
            new_password: "brandnew2".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResetTokenInvalid);

    // And the new password works for login
    auth::handler::login(
        State(state.clone()),
        Json(LoginRequest {
            email: "reset@example.com".to_string(),
            password: "brandnew1".to_string(),
        }),
    )
    .await
    .expect("login with new password");
}

#[tokio::test]
async fn test_forgot_password_does_not_reveal_accounts() {
    let state = test_state().await;

    // Unknown email gets the same generic success
    let Json(resp) = auth::handler::forgot_password(
        State(state.clone()),
        Json(ForgotPasswordRequest {
            email: "nobody@example.com".to_string(),
        }),
    )
    .await
    .expect("forgot password");
    assert_eq!(resp.code, Some(0));
}
