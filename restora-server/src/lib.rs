//! Restora Server - 餐厅点餐与运营后端
//!
//! # 架构概述
//!
//! 本模块是 Restora Server 的主入口，提供以下核心功能：
//!
//! - **订单生命周期** (`orders`): 状态机推进与关联数据一致性
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): 网关身份头解析与归属校验
//! - **事件总线** (`realtime`): 按频道广播的实时事件
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! restora-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # 请求身份、归属谓词
//! ├── services/      # 账号、评论、预订、聊天、通知、优惠券、聚合
//! ├── orders/        # 订单状态机、金额、订单号
//! ├── api/           # HTTP 路由和处理器
//! ├── realtime/      # 进程内事件总线
//! ├── utils/         # 错误、日志、ID 解析
//! └── db/            # 模型与仓储
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod realtime;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::Actor;
pub use core::{Config, Server, ServerState, build_app, build_router};
pub use orders::OrderService;
pub use realtime::{Channel, Event, EventBus};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    ____            __
   / __ \___  _____/ /_____  _________ _
  / /_/ / _ \/ ___/ __/ __ \/ ___/ __ `/
 / _, _/  __(__  ) /_/ /_/ / /  / /_/ /
/_/ |_|\___/____/\__/\____/_/   \__,_/
    "#
    );
}
