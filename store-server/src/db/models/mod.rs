//! Database Models
//!
//! 四张集合对应四种实体：
//!
//! | 表 | 模型 | 说明 |
//! |----|------|------|
//! | product | [`Product`] | 商品目录（唯一可变实体）|
//! | ledger_entry | [`LedgerEntry`] | 库存流水（只追加，不可变）|
//! | order | [`Order`] | 订单（结账时创建，只读）|
//! | user | [`User`] | 账号（email 唯一索引）|

pub mod ledger;
pub mod order;
pub mod product;
pub mod serde_helpers;
pub mod user;

pub use ledger::{LedgerAction, LedgerEntry, LedgerListResponse, LedgerQuery, ProductSnapshot};
pub use order::{Order, OrderItem};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use user::{User, UserRole};
