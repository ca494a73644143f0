//! Menu API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/restaurants/{id}/menu | GET | 餐厅菜单（可过滤） | 无 |
//! | /api/menu | POST | 创建菜品 | 店主 |
//! | /api/menu/{id} | GET | 菜品详情 | 无 |
//! | /api/menu/{id} | PUT | 更新菜品 | 店主 |
//! | /api/menu/{id} | DELETE | 删除菜品 | 店主 |

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/menu", routes())
        .route(
            "/api/restaurants/{id}/menu",
            get(handler::list_for_restaurant),
        )
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::remove),
        )
}
