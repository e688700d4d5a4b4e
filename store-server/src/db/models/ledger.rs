//! Ledger Entry Model
//!
//! 库存流水的核心数据结构。
//! 所有条目只追加、不可变：任何代码路径都不会更新或删除 ledger_entry 记录。
//! 商品信息以冗余副本记录，商品被删除后历史流水依然完整。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// 流水操作类型（枚举，非自由文本）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerAction {
    /// 商品入库（创建时记录初始数量）
    Add,
    /// 商品资料修改（带修改前后快照）
    Update,
    /// 售出扣减
    Sell,
    /// 结账补偿回滚（saga 回补库存）
    Restock,
}

impl std::fmt::Display for LedgerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Sell => "sell",
            Self::Restock => "restock",
        };
        f.write_str(s)
    }
}

/// 商品字段快照（update 流水的 before/after）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

/// 流水条目（不可变）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// 商品 id 的冗余字符串副本（如 "product:xyz"）
    pub product_id: String,
    /// 商品名冗余副本
    pub product_name: String,
    /// 本次操作涉及的数量（add=初始入库量, sell/restock=变动量, update=0）
    pub quantity_sold: i64,
    /// 操作人姓名
    pub staff_name: String,
    /// 操作人角色
    pub staff_role: String,
    pub action: LedgerAction,
    /// 修改前快照（仅 update）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<ProductSnapshot>,
    /// 修改后快照（仅 update）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<ProductSnapshot>,
    /// 时间戳（unix 毫秒）
    #[serde(default)]
    pub created_at: i64,
}

/// 流水查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerQuery {
    /// 操作类型过滤
    pub action: Option<LedgerAction>,
    /// 商品 id 过滤（"product:xyz"）
    pub product_id: Option<String>,
    /// 分页偏移
    #[serde(default)]
    pub offset: usize,
    /// 分页大小（默认 50）
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for LedgerQuery {
    fn default() -> Self {
        Self {
            action: None,
            product_id: None,
            offset: 0,
            limit: default_limit(),
        }
    }
}

fn default_limit() -> usize {
    50
}

/// 流水列表响应
#[derive(Debug, Serialize)]
pub struct LedgerListResponse {
    pub items: Vec<LedgerEntry>,
    pub total: u64,
}
