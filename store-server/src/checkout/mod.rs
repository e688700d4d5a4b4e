//! 结账编排
//!
//! `POST /api/orders` 的服务端实现：逐行调用库存服务扣减，全部成功后
//! 写入一条带价格快照的订单。任何一行失败时，按 saga 模式回补已扣减的
//! 行，不留下半套结账。
//!
//! 订单号与交易号在服务端生成（UUID），客户端不提供 id。

pub mod money;
mod service;

pub use service::CheckoutService;

#[cfg(test)]
mod tests;
