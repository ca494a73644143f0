//! 评论服务
//!
//! 评论的增删改、商家回复与"有用"投票。每次增删改之后同步
//! 重算餐厅评分，聚合永远从全量评论推出，不做增量修补。

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::Actor;
use crate::db::models::{
    OrderStatus, OwnerResponse, Review, ReviewCreate, ReviewResponse, ReviewUpdate,
};
use crate::db::repository::{
    OrderRepository, Pagination, RestaurantRepository, ReviewRepository,
};
use crate::services::AggregateService;
use crate::utils::{AppError, AppResult, parse_ref};

#[derive(Clone)]
pub struct ReviewService {
    reviews: ReviewRepository,
    restaurants: RestaurantRepository,
    orders: OrderRepository,
    aggregates: AggregateService,
}

impl ReviewService {
    pub fn new(db: Surreal<Db>, aggregates: AggregateService) -> Self {
        Self {
            reviews: ReviewRepository::new(db.clone()),
            restaurants: RestaurantRepository::new(db.clone()),
            orders: OrderRepository::new(db),
            aggregates,
        }
    }

    /// 发表评论
    ///
    /// 挂单评论要求该订单属于评论人且已完成；(customer, order) 查重
    /// 由仓储层负责。
    pub async fn create(&self, actor: &Actor, payload: ReviewCreate) -> AppResult<Review> {
        let customer = actor.require_customer()?;
        let restaurant_id = parse_ref("restaurant", &payload.restaurant_id)?;
        self.restaurants
            .find_by_id(&restaurant_id.to_string())
            .await?
            .ok_or_else(|| AppError::not_found("Restaurant not found"))?;

        let order_ref = match &payload.order_id {
            Some(raw) => {
                let order_id = parse_ref("order", raw)?;
                let order = self
                    .orders
                    .find_by_id(&order_id.to_string())
                    .await?
                    .ok_or_else(|| AppError::not_found("Order not found"))?;
                if order.customer != *customer {
                    return Err(AppError::forbidden("Not your order"));
                }
                if order.status != OrderStatus::Completed {
                    return Err(AppError::validation("Only completed orders can be reviewed"));
                }
                if order.restaurant != restaurant_id {
                    return Err(AppError::validation(
                        "Order does not belong to this restaurant",
                    ));
                }
                Some(order_id)
            }
            None => None,
        };
        let menu_item_ref = match &payload.menu_item_id {
            Some(raw) => Some(parse_ref("menu_item", raw)?),
            None => None,
        };

        let review = Review {
            id: None,
            customer: customer.clone(),
            restaurant: restaurant_id.clone(),
            order: order_ref,
            menu_item: menu_item_ref,
            rating: payload.rating,
            comment: payload.comment,
            food_rating: payload.food_rating,
            service_rating: payload.service_rating,
            ambiance_rating: payload.ambiance_rating,
            response: None,
            helpful_count: 0,
            helpful_by: Vec::new(),
            is_visible: true,
            created_at: Utc::now(),
        };

        let created = self.reviews.create(review).await?;
        self.aggregates
            .recompute_restaurant_rating(&restaurant_id)
            .await?;
        Ok(created)
    }

    /// 修改自己的评论
    pub async fn update(&self, actor: &Actor, id: &str, payload: ReviewUpdate) -> AppResult<Review> {
        let review = self.fetch(id).await?;
        if review.customer != *actor.user_id() {
            return Err(AppError::forbidden("Not your review"));
        }

        let updated = self.reviews.update(id, payload).await?;
        self.aggregates
            .recompute_restaurant_rating(&review.restaurant)
            .await?;
        Ok(updated)
    }

    /// 删除自己的评论
    pub async fn delete(&self, actor: &Actor, id: &str) -> AppResult<()> {
        let review = self.fetch(id).await?;
        if review.customer != *actor.user_id() {
            return Err(AppError::forbidden("Not your review"));
        }

        self.reviews.delete(id).await?;
        self.aggregates
            .recompute_restaurant_rating(&review.restaurant)
            .await?;
        Ok(())
    }

    /// 商家回复评论
    pub async fn respond(
        &self,
        actor: &Actor,
        id: &str,
        payload: ReviewResponse,
    ) -> AppResult<Review> {
        let review = self.fetch(id).await?;
        if !actor.is_owner_of(&review.restaurant) {
            return Err(AppError::forbidden("Not your restaurant's review"));
        }
        let thing = review
            .id
            .ok_or_else(|| AppError::internal("Review record has no id"))?;

        let response = OwnerResponse {
            text: payload.response,
            responded_at: Utc::now(),
        };
        self.reviews.set_response(&thing, response).await?;
        self.fetch(id).await
    }

    /// 投一票"有用"，每人一票
    pub async fn mark_helpful(&self, actor: &Actor, id: &str) -> AppResult<Review> {
        let review = self.fetch(id).await?;
        if review.helpful_by.contains(actor.user_id()) {
            return Err(AppError::conflict("Already marked as helpful"));
        }
        let thing = review
            .id
            .ok_or_else(|| AppError::internal("Review record has no id"))?;

        self.reviews.add_helpful_vote(&thing, actor.user_id()).await?;
        self.fetch(id).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Review> {
        self.fetch(id).await
    }

    /// 餐厅的可见评论，带总数
    pub async fn list_for_restaurant(
        &self,
        restaurant_id: &str,
        page: Pagination,
    ) -> AppResult<(Vec<Review>, i64)> {
        let restaurant = parse_ref("restaurant", restaurant_id)?;
        let reviews = self.reviews.find_by_restaurant(&restaurant, page).await?;
        let total = self.reviews.count_by_restaurant(&restaurant).await?;
        Ok((reviews, total))
    }

    /// 自己发过的评论
    pub async fn list_for_customer(
        &self,
        actor: &Actor,
        page: Pagination,
    ) -> AppResult<Vec<Review>> {
        let customer = actor.require_customer()?;
        Ok(self.reviews.find_by_customer(customer, page).await?)
    }

    async fn fetch(&self, id: &str) -> AppResult<Review> {
        self.reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Review not found"))
    }
}
