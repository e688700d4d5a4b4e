//! Order Model
//!
//! 一次结账对应一条订单记录，条目内嵌商品快照。
//! 快照在购买时冻结价格与折扣，之后商品的修改或删除不影响历史订单。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Frozen line-item snapshot inside an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Catalog record id at purchase time ("product:xyz")
    pub product_id: String,
    pub name: String,
    pub brand: String,
    /// Listed price before discount
    pub list_price: f64,
    /// Discount applied at purchase time
    pub discount_percentage: f64,
    /// Price actually charged per unit (discount baked in, 2 dp)
    pub unit_price: f64,
    pub quantity: i64,
}

/// Completed checkout record (read-only after creation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Display id, server-generated ("ORD-xxxxxxxx")
    pub order_number: String,
    /// Server-generated transaction id (UUID)
    pub transaction_id: String,
    pub customer_name: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
    /// Sum of unit_price × quantity over all items, 2 dp
    pub subtotal: f64,
    pub items: Vec<OrderItem>,
    /// 时间戳（unix 毫秒）
    #[serde(default)]
    pub created_at: i64,
}
