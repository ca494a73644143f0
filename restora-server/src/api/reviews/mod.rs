//! Review API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/restaurants/{id}/reviews | GET | 餐厅评论 | 无 |
//! | /api/reviews | POST | 发表评论 | 顾客 |
//! | /api/reviews/my | GET | 我的评论 | 顾客 |
//! | /api/reviews/{id} | GET | 评论详情 | 无 |
//! | /api/reviews/{id} | PUT | 修改评论 | 作者 |
//! | /api/reviews/{id} | DELETE | 删除评论 | 作者 |
//! | /api/reviews/{id}/respond | PUT | 商家回复 | 店主 |
//! | /api/reviews/{id}/helpful | PUT | 点"有用" | 登录用户 |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/reviews", routes())
        .route(
            "/api/restaurants/{id}/reviews",
            get(handler::list_for_restaurant),
        )
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/my", get(handler::list_mine))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::remove),
        )
        .route("/{id}/respond", put(handler::respond))
        .route("/{id}/helpful", put(handler::mark_helpful))
}
