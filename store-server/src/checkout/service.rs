//! Checkout Orchestrator
//!
//! 每行扣减是独立的原子事务；订单写入失败或中途断货时，已扣减的行用
//! `restock` 逐行回补。回补本身失败只记录日志，流水里会同时缺少对应
//! 的 restock 条目，管理员可以从 ledger 对账。

use shared::client::{CartLine, CheckoutRequest};
use shared::error::{AppError, ErrorCode};
use std::collections::HashSet;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::checkout::money;
use crate::db::models::{Order, OrderItem, Product};
use crate::db::repository::OrderRepository;
use crate::inventory::InventoryService;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_required_text,
};

/// Checkout orchestrator service
#[derive(Clone)]
pub struct CheckoutService {
    db: Surreal<Db>,
    inventory: InventoryService,
}

impl CheckoutService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            inventory: InventoryService::new(db.clone()),
            db,
        }
    }

    /// Run a checkout: sell every cart line, then write the order snapshot
    pub async fn checkout(&self, req: CheckoutRequest, actor: &CurrentUser) -> AppResult<Order> {
        Self::validate_request(&req)?;

        // 逐行扣减；记录成功的行以便失败时回补
        let mut sold: Vec<(CartLine, Product)> = Vec::with_capacity(req.cart.len());
        for line in &req.cart {
            match self.inventory.sell(&line.product_id, line.quantity, actor).await {
                Ok(product) => sold.push((line.clone(), product)),
                Err(e) => {
                    self.compensate(&sold, actor).await;
                    return Err(e);
                }
            }
        }

        let order = match self.build_order(&req, &sold) {
            Ok(order) => order,
            Err(e) => {
                self.compensate(&sold, actor).await;
                return Err(e);
            }
        };

        let order_number = order.order_number.clone();
        match OrderRepository::new(self.db.clone()).create(order).await {
            Ok(created) => {
                tracing::info!(
                    order_number = %order_number,
                    lines = req.cart.len(),
                    subtotal = created.subtotal,
                    customer = %created.customer_name,
                    "Checkout completed"
                );
                Ok(created)
            }
            Err(e) => {
                self.compensate(&sold, actor).await;
                Err(e.into())
            }
        }
    }

    fn validate_request(req: &CheckoutRequest) -> AppResult<()> {
        validate_required_text(&req.customer_name, "customer_name", MAX_NAME_LEN)?;
        validate_required_text(&req.phone_number, "phone_number", MAX_SHORT_TEXT_LEN)?;
        validate_email(&req.email)?;
        validate_required_text(&req.address, "address", MAX_ADDRESS_LEN)?;

        if req.cart.is_empty() {
            return Err(AppError::new(ErrorCode::EmptyCart));
        }

        let mut seen = HashSet::new();
        for line in &req.cart {
            if line.quantity <= 0 || line.quantity > money::MAX_LINE_QUANTITY {
                return Err(AppError::new(ErrorCode::InvalidQuantity)
                    .with_detail("product_id", line.product_id.clone())
                    .with_detail("quantity", line.quantity));
            }
            if !seen.insert(line.product_id.clone()) {
                return Err(AppError::new(ErrorCode::DuplicateCartLine)
                    .with_detail("product_id", line.product_id.clone()));
            }
        }
        Ok(())
    }

    /// Build the order snapshot with discounted prices frozen in
    fn build_order(&self, req: &CheckoutRequest, sold: &[(CartLine, Product)]) -> AppResult<Order> {
        let mut items = Vec::with_capacity(sold.len());
        let mut lines = Vec::with_capacity(sold.len());

        for (line, product) in sold {
            let unit_price =
                money::discounted_unit_price(product.price, product.discount_percentage)?;
            lines.push((unit_price, line.quantity));
            items.push(OrderItem {
                product_id: product.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
                name: product.name.clone(),
                brand: product.brand.clone(),
                list_price: product.price,
                discount_percentage: product.discount_percentage,
                unit_price,
                quantity: line.quantity,
            });
        }

        let subtotal = money::subtotal(&lines)?;

        Ok(Order {
            id: None,
            order_number: generate_order_number(),
            transaction_id: Uuid::new_v4().to_string(),
            customer_name: req.customer_name.clone(),
            phone_number: req.phone_number.clone(),
            email: req.email.clone(),
            address: req.address.clone(),
            subtotal,
            items,
            created_at: chrono::Utc::now().timestamp_millis(),
        })
    }

    /// Restore stock for every already-sold line (reverse order)
    async fn compensate(&self, sold: &[(CartLine, Product)], actor: &CurrentUser) {
        for (line, _) in sold.iter().rev() {
            if let Err(e) = self
                .inventory
                .restock(&line.product_id, line.quantity, actor)
                .await
            {
                tracing::error!(
                    product_id = %line.product_id,
                    quantity = line.quantity,
                    error = %e,
                    "Checkout compensation failed; ledger is missing a restock entry"
                );
            }
        }
    }
}

/// Server-generated display id, e.g. "ORD-9F2C41D7"
fn generate_order_number() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("ORD-{}", uuid[..8].to_uppercase())
}
