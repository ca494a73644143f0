//! 订单生命周期服务
//!
//! 下单、推进、取消、评分的全部规则与副作用在此收口。
//! 副作用的失败语义：
//! - 计数器、桌台占用随主写入传播错误
//! - 事件广播、通知、优惠券核销失败只记日志

use chrono::Utc;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use crate::auth::Actor;
use crate::db::models::{
    CancelledBy, NotificationKind, Order, OrderCreate, OrderItem, OrderRate, OrderStats,
    OrderStatus, OrderType, PaymentMethod, PaymentStatus, Restaurant, StatusHistoryEntry,
};
use crate::db::repository::{
    DiningTableRepository, MenuItemRepository, OrderRepository, Pagination, RestaurantRepository,
};
use crate::orders::money;
use crate::orders::number::next_order_number;
use crate::realtime::{Channel, Event, EventBus};
use crate::services::coupons::normalize_code;
use crate::services::{AggregateService, CouponService, NotificationService};
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    restaurants: RestaurantRepository,
    menu_items: MenuItemRepository,
    tables: DiningTableRepository,
    aggregates: AggregateService,
    coupons: CouponService,
    notifications: NotificationService,
    bus: EventBus,
}

impl OrderService {
    pub fn new(
        db: Surreal<Db>,
        bus: EventBus,
        notifications: NotificationService,
        coupons: CouponService,
        aggregates: AggregateService,
    ) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            restaurants: RestaurantRepository::new(db.clone()),
            menu_items: MenuItemRepository::new(db.clone()),
            tables: DiningTableRepository::new(db),
            aggregates,
            coupons,
            notifications,
            bus,
        }
    }

    /// 下单
    ///
    /// 1. 餐厅必须存在且营业中
    /// 2. 每个菜品必须属于该餐厅且可售，名称价格当场快照
    /// 3. 金额与预计时长重算后落库
    /// 4. 堂食带桌号则占桌；计数器推进；广播 + 通知店主
    pub async fn create(&self, actor: &Actor, payload: OrderCreate) -> AppResult<Order> {
        let customer = actor.require_customer()?.clone();

        let restaurant = self
            .restaurants
            .find_by_id(&payload.restaurant_id)
            .await?
            .ok_or_else(|| AppError::not_found("Restaurant not found"))?;
        if !restaurant.is_active {
            return Err(AppError::validation("Restaurant is not accepting orders"));
        }
        let restaurant_id = restaurant
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Restaurant record has no id"))?;

        let (items, preparation_times) = self
            .snapshot_lines(&restaurant_id, &payload)
            .await?;

        // 配送费只对外送生效
        let delivery_fee = match payload.order_type {
            OrderType::Delivery => payload.delivery_fee.unwrap_or(0.0),
            OrderType::DineIn | OrderType::Takeaway => 0.0,
        };

        // 优惠券在税前订单额上报价
        let order_amount = money::to_f64(money::round2(money::line_total(&items)));
        let mut coupon_code = None;
        let mut discount_amount = 0.0;
        if let Some(code) = payload.coupon_code.as_deref()
            && !code.trim().is_empty()
        {
            let quote = self
                .coupons
                .validate(code, &restaurant_id, &customer, order_amount)
                .await?;
            discount_amount = quote.discount_amount;
            coupon_code = Some(normalize_code(code));
        }

        let totals = money::compute_totals(&items, delivery_fee, discount_amount)?;
        let now = Utc::now();
        let order = Order {
            id: None,
            order_number: next_order_number(),
            customer: customer.clone(),
            restaurant: restaurant_id.clone(),
            items,
            status: OrderStatus::Pending,
            order_type: payload.order_type,
            table_number: payload.table_number,
            payment_method: payload.payment_method,
            payment_status: PaymentStatus::Pending,
            total_amount: totals.total_amount,
            tax_amount: totals.tax_amount,
            delivery_fee: totals.delivery_fee,
            discount_amount: totals.discount_amount,
            final_amount: totals.final_amount,
            coupon_code,
            estimated_time: money::estimate_minutes(&preparation_times),
            special_instructions: payload.special_instructions,
            rating: None,
            review: None,
            status_history: vec![StatusHistoryEntry {
                status: OrderStatus::Pending,
                timestamp: now,
            }],
            completed_at: None,
            cancelled_by: None,
            cancellation_reason: None,
            created_at: now,
        };

        let stored = self.orders.create(order).await?;
        let order_id = stored
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Order record has no id"))?;
        tracing::info!(order = %stored.order_number, restaurant = %restaurant_id, "Order placed");

        if stored.order_type == OrderType::DineIn
            && let Some(number) = stored.table_number
        {
            self.occupy_table(&restaurant_id, number, &order_id).await?;
        }

        self.aggregates
            .apply_order_counters(&restaurant_id, &stored.items)
            .await?;

        self.emit(
            &Channel::Restaurant(restaurant_id.key().to_string()),
            "new-order",
            &stored,
        );
        self.notify_owner(
            &restaurant,
            &order_id,
            "New order received",
            format!(
                "Order {} for {:.2} has been placed",
                stored.order_number, stored.final_amount
            ),
        )
        .await;

        Ok(stored)
    }

    /// 店主推进订单状态
    ///
    /// 目标必须在当前状态的推进表内；目标为 cancelled 时走餐厅侧
    /// 取消路径。进入 completed 依次：盖时间戳、现金单转已付、
    /// 释放桌台、核销优惠券。
    pub async fn advance_status(
        &self,
        actor: &Actor,
        order_id: &str,
        target: OrderStatus,
    ) -> AppResult<Order> {
        let order = self.fetch(order_id).await?;
        if !actor.is_owner_of(&order.restaurant) {
            return Err(AppError::forbidden("Not your restaurant's order"));
        }

        if !order.status.can_transition_to(target) {
            return Err(AppError::conflict(format!(
                "Cannot change status from '{}' to '{}'",
                order.status.as_str(),
                target.as_str()
            )));
        }

        if target == OrderStatus::Cancelled {
            let cancelled = self
                .cancel_stored(&order, CancelledBy::Restaurant, None)
                .await?;
            self.notify_customer(
                &cancelled,
                "Order cancelled",
                format!(
                    "Order {} was cancelled by the restaurant",
                    cancelled.order_number
                ),
            )
            .await;
            return Ok(cancelled);
        }

        let id = record_id(&order)?;
        let entry = StatusHistoryEntry {
            status: target,
            timestamp: Utc::now(),
        };
        let mut updated = self
            .orders
            .advance_status(&id, order.status, target, entry)
            .await?
            .ok_or_else(|| AppError::conflict("Order status has changed, please retry"))?;

        if target == OrderStatus::Completed {
            updated = self.finalize_completed(updated).await?;
        }

        self.emit(
            &Channel::Order(id.key().to_string()),
            "order-status-updated",
            &updated,
        );
        self.notify_customer(
            &updated,
            "Order update",
            format!(
                "Order {} is now {}",
                updated.order_number,
                target.as_str()
            ),
        )
        .await;

        Ok(updated)
    }

    /// 顾客取消订单，仅 pending/received 可取消
    pub async fn cancel(
        &self,
        actor: &Actor,
        order_id: &str,
        reason: Option<String>,
    ) -> AppResult<Order> {
        let order = self.fetch(order_id).await?;
        let customer = actor.require_customer()?;
        if *customer != order.customer {
            return Err(AppError::forbidden("Not your order"));
        }

        let cancelled = self
            .cancel_stored(&order, CancelledBy::Customer, reason)
            .await?;

        if let Ok(Some(restaurant)) = self
            .restaurants
            .find_by_id(&cancelled.restaurant.to_string())
            .await
            && let Ok(id) = record_id(&cancelled)
        {
            self.notify_owner(
                &restaurant,
                &id,
                "Order cancelled",
                format!(
                    "Order {} was cancelled by the customer",
                    cancelled.order_number
                ),
            )
            .await;
        }

        Ok(cancelled)
    }

    /// 订单评分，一单一评，先写胜出
    pub async fn rate(&self, actor: &Actor, order_id: &str, payload: OrderRate) -> AppResult<Order> {
        let order = self.fetch(order_id).await?;
        let customer = actor.require_customer()?;
        if *customer != order.customer {
            return Err(AppError::forbidden("Not your order"));
        }
        if order.status != OrderStatus::Completed {
            return Err(AppError::validation("Only completed orders can be rated"));
        }

        let id = record_id(&order)?;
        self.orders
            .rate(&id, payload.rating, payload.review)
            .await?
            .ok_or_else(|| AppError::conflict("Order has already been rated"))
    }

    /// 店主维度的订单统计
    pub async fn stats(&self, actor: &Actor) -> AppResult<OrderStats> {
        let restaurant = actor.require_restaurant()?;
        Ok(self.orders.stats(restaurant).await?)
    }

    /// 单条读取，仅当事人可见
    pub async fn get(&self, actor: &Actor, order_id: &str) -> AppResult<Order> {
        let order = self.fetch(order_id).await?;
        if !actor.is_order_participant(&order) {
            return Err(AppError::forbidden("Not a participant of this order"));
        }
        Ok(order)
    }

    /// 顾客订单列表
    pub async fn list_for_customer(
        &self,
        actor: &Actor,
        page: Pagination,
    ) -> AppResult<(Vec<Order>, i64)> {
        let customer = actor.require_customer()?;
        let orders = self.orders.find_by_customer(customer, page).await?;
        let total = self.orders.count_by_customer(customer).await?;
        Ok((orders, total))
    }

    /// 店主订单列表，可按状态过滤
    pub async fn list_for_restaurant(
        &self,
        actor: &Actor,
        status: Option<OrderStatus>,
        page: Pagination,
    ) -> AppResult<(Vec<Order>, i64)> {
        let restaurant = actor.require_restaurant()?;
        let orders = self
            .orders
            .find_by_restaurant(restaurant, status, page)
            .await?;
        let total = self.orders.count_by_restaurant(restaurant, status).await?;
        Ok((orders, total))
    }

    // ========== Internal ==========

    async fn fetch(&self, order_id: &str) -> AppResult<Order> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found("Order not found"))
    }

    /// 菜单行快照：校验归属与可售性，捕获当前名称价格
    async fn snapshot_lines(
        &self,
        restaurant: &RecordId,
        payload: &OrderCreate,
    ) -> AppResult<(Vec<OrderItem>, Vec<i32>)> {
        let mut items = Vec::with_capacity(payload.items.len());
        let mut preparation_times = Vec::with_capacity(payload.items.len());

        for line in &payload.items {
            let item = self
                .menu_items
                .find_by_id(&line.menu_item_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("Menu item not found: {}", line.menu_item_id))
                })?;
            if item.restaurant != *restaurant {
                return Err(AppError::validation(format!(
                    "Menu item '{}' does not belong to this restaurant",
                    item.name
                )));
            }
            if !item.is_available {
                return Err(AppError::validation(format!(
                    "Menu item '{}' is currently unavailable",
                    item.name
                )));
            }

            let menu_item = item
                .id
                .clone()
                .ok_or_else(|| AppError::internal("Menu item record has no id"))?;
            preparation_times.push(item.preparation_time);
            items.push(OrderItem {
                menu_item,
                name: item.name,
                price: item.price,
                quantity: line.quantity,
                special_instructions: line.special_instructions.clone(),
            });
        }

        Ok((items, preparation_times))
    }

    /// 占桌；桌号不存在时跳过不报错
    async fn occupy_table(
        &self,
        restaurant: &RecordId,
        number: i32,
        order: &RecordId,
    ) -> AppResult<()> {
        match self.tables.find_by_number(restaurant, number).await? {
            Some(table) => {
                let table_id = table
                    .id
                    .ok_or_else(|| AppError::internal("Table record has no id"))?;
                self.tables.occupy(&table_id, order).await?;
            }
            None => {
                tracing::debug!(restaurant = %restaurant, number, "Order references unknown table");
            }
        }
        Ok(())
    }

    /// 取消的公共路径：CAS 置终态、释放桌台、广播
    async fn cancel_stored(
        &self,
        order: &Order,
        by: CancelledBy,
        reason: Option<String>,
    ) -> AppResult<Order> {
        if !order.status.can_cancel() {
            return Err(AppError::conflict(format!(
                "Order in status '{}' can no longer be cancelled",
                order.status.as_str()
            )));
        }

        let id = record_id(order)?;
        let entry = StatusHistoryEntry {
            status: OrderStatus::Cancelled,
            timestamp: Utc::now(),
        };
        let cancelled = self
            .orders
            .cancel(&id, entry, by, reason)
            .await?
            .ok_or_else(|| AppError::conflict("Order status has changed, please retry"))?;

        self.release_table(&cancelled).await;
        self.emit(
            &Channel::Restaurant(cancelled.restaurant.key().to_string()),
            "order-cancelled",
            &cancelled,
        );
        tracing::info!(order = %cancelled.order_number, by = ?by, "Order cancelled");

        Ok(cancelled)
    }

    /// completed 的收尾：时间戳、现金转已付、释放桌台、核销券
    async fn finalize_completed(&self, order: Order) -> AppResult<Order> {
        let id = record_id(&order)?;
        self.orders.set_completed_at(&id, Utc::now()).await?;

        if order.payment_method == PaymentMethod::Cash
            && order.payment_status == PaymentStatus::Pending
        {
            self.orders
                .set_payment_status(&id, PaymentStatus::Paid)
                .await?;
        }

        self.release_table(&order).await;

        if let Some(code) = order.coupon_code.as_deref()
            && let Err(err) = self.coupons.redeem(code, &order.restaurant, &order.customer).await
        {
            tracing::warn!(error = %err, code, "Coupon redemption failed");
        }

        self.fetch(&id.to_string()).await
    }

    /// 释放被本单占用的桌台，失败只记日志
    async fn release_table(&self, order: &Order) {
        if order.order_type != OrderType::DineIn || order.table_number.is_none() {
            return;
        }
        let Ok(id) = record_id(order) else {
            return;
        };
        if let Err(err) = self.tables.release_by_order(&order.restaurant, &id).await {
            tracing::warn!(error = %err, order = %order.order_number, "Failed to release table");
        }
    }

    fn emit(&self, channel: &Channel, name: &str, order: &Order) {
        match serde_json::to_value(order) {
            Ok(payload) => self.bus.publish(Event::new(channel, name, payload)),
            Err(err) => tracing::warn!(error = %err, "Failed to encode order event"),
        }
    }

    /// 通知店主，失败只记日志
    async fn notify_owner(
        &self,
        restaurant: &Restaurant,
        order: &RecordId,
        title: &str,
        message: String,
    ) {
        if let Err(err) = self
            .notifications
            .notify(
                &restaurant.owner,
                title,
                message,
                NotificationKind::Order,
                Some(order.clone()),
                None,
            )
            .await
        {
            tracing::warn!(error = %err, "Failed to notify restaurant owner");
        }
    }

    /// 通知下单顾客，失败只记日志
    async fn notify_customer(&self, order: &Order, title: &str, message: String) {
        let related = record_id(order).ok();
        if let Err(err) = self
            .notifications
            .notify(
                &order.customer,
                title,
                message,
                NotificationKind::Order,
                related,
                None,
            )
            .await
        {
            tracing::warn!(error = %err, "Failed to notify customer");
        }
    }
}

fn record_id(order: &Order) -> AppResult<RecordId> {
    order
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Order record has no id"))
}
