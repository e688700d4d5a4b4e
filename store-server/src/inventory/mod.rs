//! 库存调整服务
//!
//! 系统中唯一允许修改 `product.quantity` 的组件。
//! 扣减/回补与对应的流水写入在同一数据库事务内完成。

mod service;

pub use service::InventoryService;
