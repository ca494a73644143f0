//! Coupon API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/coupons | GET | 本店优惠券 | 店主 |
//! | /api/coupons | POST | 创建优惠券 | 店主 |
//! | /api/coupons/validate | POST | 校验优惠券（只读报价） | 顾客 |
//! | /api/coupons/{id} | GET | 优惠券详情 | 店主 |
//! | /api/coupons/{id} | PUT | 更新优惠券 | 店主 |
//! | /api/coupons/{id} | DELETE | 删除优惠券 | 店主 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/coupons", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/validate", post(handler::validate))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::remove),
        )
}
