//! Dining Table API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/tables | GET | 本店桌台列表 | 店主 |
//! | /api/tables | POST | 创建桌台 | 店主 |
//! | /api/tables/qr/{qr_code} | GET | 扫码定位桌台 | 无 |
//! | /api/tables/{id} | GET | 桌台详情 | 店主 |
//! | /api/tables/{id} | PUT | 更新桌台 | 店主 |
//! | /api/tables/{id} | DELETE | 删除桌台 | 店主 |
//! | /api/tables/{id}/status | PUT | 手动调整桌台状态 | 店主 |

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tables", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/qr/{qr_code}", get(handler::get_by_qr))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::remove),
        )
        .route("/{id}/status", put(handler::set_status))
}
