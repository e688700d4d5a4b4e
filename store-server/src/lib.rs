//! Store Server - 零售门店管理后端
//!
//! # 架构概述
//!
//! 本模块是 Store Server 的主入口，提供以下核心功能：
//!
//! - **商品目录** (`db`): 嵌入式 SurrealDB 存储
//! - **库存调整** (`inventory`): 条件扣减 + 流水，单事务执行
//! - **结账编排** (`checkout`): 服务端 saga，失败回补库存
//! - **认证** (`auth`): JWT + Argon2 认证体系，密码重置令牌
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! store-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、密码重置
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (模型 + 仓储)
//! ├── inventory/     # 库存调整服务
//! ├── checkout/      # 结账编排
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod checkout;
pub mod core;
pub mod db;
pub mod inventory;
pub mod utils;

// Re-export 公共类型
pub use crate::auth::{CurrentUser, JwtService};
pub use crate::checkout::CheckoutService;
pub use crate::core::{Config, Server, ServerState, setup_environment};
pub use crate::inventory::InventoryService;

// Re-export unified error types from shared
pub use shared::error::{ApiResponse, AppError, ErrorCategory, ErrorCode};
pub use utils::AppResult;

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
   _____ __
  / ___// /_____  ________
  \__ \/ __/ __ \/ ___/ _ \
 ___/ / /_/ /_/ / /  /  __/
/____/\__/\____/_/   \___/
   _____
  / ___/___  ______   _____  _____
  \__ \/ _ \/ ___/ | / / _ \/ ___/
 ___/ /  __/ /   | |/ /  __/ /
/____/\___/_/    |___/\___/_/
    "#
    );
}
