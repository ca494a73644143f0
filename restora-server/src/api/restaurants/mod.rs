//! Restaurant API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/restaurants | GET | 浏览餐厅（可过滤） | 无 |
//! | /api/restaurants | POST | 创建餐厅 | 店主 |
//! | /api/restaurants/my-restaurant | GET | 我的餐厅 | 店主 |
//! | /api/restaurants/qr/{qr_code} | GET | 扫码定位餐厅 | 无 |
//! | /api/restaurants/{id} | GET | 餐厅详情 | 无 |
//! | /api/restaurants/{id} | PUT | 更新餐厅 | 店主 |
//! | /api/restaurants/{id} | DELETE | 下架餐厅（软删除） | 店主 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/restaurants", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/my-restaurant", get(handler::my_restaurant))
        .route("/qr/{qr_code}", get(handler::get_by_qr))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::remove),
        )
}
