//! 请求主体与归属谓词
//!
//! ## 设计原则
//! - 身份比较一律按记录 ID 的值，绝不比较引用
//! - 谓词只回答"是否"，拒绝动作由调用方决定（统一返回 403）
//! - 店主变体携带其餐厅 ID，注册餐厅前为 None

use surrealdb::RecordId;

use crate::db::models::{Chat, Notification, Order, Reservation};
use crate::utils::{AppError, AppResult};

/// 请求主体
///
/// | 变体 | 说明 |
/// |------|------|
/// | Customer | 顾客账号 |
/// | Owner | 餐厅侧账号，携带其名下餐厅 ID |
#[derive(Debug, Clone, PartialEq)]
pub enum Actor {
    Customer {
        id: RecordId,
    },
    Owner {
        id: RecordId,
        /// 尚未注册餐厅时为 None
        restaurant_id: Option<RecordId>,
    },
}

impl Actor {
    /// 主体的用户记录 ID
    pub fn user_id(&self) -> &RecordId {
        match self {
            Actor::Customer { id } => id,
            Actor::Owner { id, .. } => id,
        }
    }

    pub fn is_customer(&self) -> bool {
        matches!(self, Actor::Customer { .. })
    }

    /// 店主名下的餐厅 ID
    pub fn restaurant_id(&self) -> Option<&RecordId> {
        match self {
            Actor::Owner { restaurant_id, .. } => restaurant_id.as_ref(),
            Actor::Customer { .. } => None,
        }
    }

    /// 是否为指定餐厅的店主
    pub fn is_owner_of(&self, restaurant: &RecordId) -> bool {
        matches!(self, Actor::Owner { restaurant_id: Some(owned), .. } if owned == restaurant)
    }

    /// 是否为订单当事人（下单顾客或接单餐厅的店主）
    pub fn is_order_participant(&self, order: &Order) -> bool {
        match self {
            Actor::Customer { id } => *id == order.customer,
            Actor::Owner { .. } => self.is_owner_of(&order.restaurant),
        }
    }

    /// 是否在会话参与者列表中
    pub fn is_chat_participant(&self, chat: &Chat) -> bool {
        chat.participants.contains(self.user_id())
    }

    /// 是否为预订当事人（预订顾客或目标餐厅的店主）
    pub fn is_reservation_party(&self, reservation: &Reservation) -> bool {
        match self {
            Actor::Customer { id } => *id == reservation.customer,
            Actor::Owner { .. } => self.is_owner_of(&reservation.restaurant),
        }
    }

    /// 是否为通知的接收者
    pub fn is_recipient(&self, notification: &Notification) -> bool {
        *self.user_id() == notification.recipient
    }

    // ========== Guard Helpers ==========

    /// 要求店主身份且已注册餐厅，返回餐厅 ID
    pub fn require_restaurant(&self) -> AppResult<&RecordId> {
        match self {
            Actor::Owner {
                restaurant_id: Some(restaurant),
                ..
            } => Ok(restaurant),
            Actor::Owner { .. } => Err(AppError::not_found(
                "No restaurant registered for this account",
            )),
            Actor::Customer { .. } => {
                Err(AppError::forbidden("Restaurant account required"))
            }
        }
    }

    /// 要求顾客身份，返回用户 ID
    pub fn require_customer(&self) -> AppResult<&RecordId> {
        match self {
            Actor::Customer { id } => Ok(id),
            Actor::Owner { .. } => Err(AppError::forbidden("Customer account required")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{
        OrderStatus, OrderType, PaymentMethod, PaymentStatus, ReservationStatus, TablePreference,
    };
    use chrono::{NaiveDate, Utc};

    fn rid(table: &str, key: &str) -> RecordId {
        RecordId::from_table_key(table, key)
    }

    fn customer(key: &str) -> Actor {
        Actor::Customer {
            id: rid("user", key),
        }
    }

    fn owner(key: &str, restaurant: Option<&str>) -> Actor {
        Actor::Owner {
            id: rid("user", key),
            restaurant_id: restaurant.map(|r| rid("restaurant", r)),
        }
    }

    fn order_fixture(customer: &str, restaurant: &str) -> Order {
        Order {
            id: None,
            order_number: "ORD0001".into(),
            customer: rid("user", customer),
            restaurant: rid("restaurant", restaurant),
            items: vec![],
            status: OrderStatus::Pending,
            order_type: OrderType::Takeaway,
            table_number: None,
            payment_method: PaymentMethod::Cash,
            payment_status: PaymentStatus::Pending,
            total_amount: 10.0,
            tax_amount: 1.0,
            delivery_fee: 0.0,
            discount_amount: 0.0,
            final_amount: 11.0,
            coupon_code: None,
            estimated_time: 20,
            special_instructions: None,
            rating: None,
            review: None,
            status_history: vec![],
            completed_at: None,
            cancelled_by: None,
            cancellation_reason: None,
            created_at: Utc::now(),
        }
    }

    fn reservation_fixture(customer: &str, restaurant: &str) -> Reservation {
        Reservation {
            id: None,
            customer: rid("user", customer),
            restaurant: rid("restaurant", restaurant),
            customer_name: "Ana".into(),
            customer_phone: "600111222".into(),
            customer_email: "ana@example.com".into(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            time: "20:30".into(),
            party_size: 2,
            table_preference: TablePreference::Any,
            status: ReservationStatus::Pending,
            assigned_table: None,
            special_request: None,
            confirmed_at: None,
            cancelled_at: None,
            cancellation_reason: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn owner_of_matches_only_own_restaurant() {
        let actor = owner("u1", Some("r1"));
        assert!(actor.is_owner_of(&rid("restaurant", "r1")));
        assert!(!actor.is_owner_of(&rid("restaurant", "r2")));

        let unregistered = owner("u2", None);
        assert!(!unregistered.is_owner_of(&rid("restaurant", "r1")));

        assert!(!customer("u3").is_owner_of(&rid("restaurant", "r1")));
    }

    #[test]
    fn order_participants() {
        let order = order_fixture("alice", "r1");

        assert!(customer("alice").is_order_participant(&order));
        assert!(!customer("bob").is_order_participant(&order));
        assert!(owner("boss", Some("r1")).is_order_participant(&order));
        assert!(!owner("boss", Some("r2")).is_order_participant(&order));
    }

    #[test]
    fn reservation_parties() {
        let reservation = reservation_fixture("alice", "r1");

        assert!(customer("alice").is_reservation_party(&reservation));
        assert!(!customer("mallory").is_reservation_party(&reservation));
        assert!(owner("boss", Some("r1")).is_reservation_party(&reservation));
        assert!(!owner("other", Some("r9")).is_reservation_party(&reservation));
    }

    #[test]
    fn chat_participants_by_id_value() {
        let chat = Chat {
            id: None,
            participants: vec![rid("user", "alice"), rid("user", "boss")],
            restaurant: None,
            order: None,
            messages: vec![],
            last_message: None,
            last_message_at: None,
            unread_counts: vec![],
            is_active: true,
            created_at: Utc::now(),
        };

        assert!(customer("alice").is_chat_participant(&chat));
        assert!(owner("boss", None).is_chat_participant(&chat));
        assert!(!customer("eve").is_chat_participant(&chat));
    }

    #[test]
    fn notification_recipient() {
        let notification = Notification {
            id: None,
            recipient: rid("user", "alice"),
            title: "t".into(),
            message: "m".into(),
            kind: crate::db::models::NotificationKind::System,
            related_order: None,
            related_reservation: None,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        };

        assert!(customer("alice").is_recipient(&notification));
        assert!(!customer("bob").is_recipient(&notification));
    }

    #[test]
    fn require_restaurant_guards() {
        assert!(owner("u1", Some("r1")).require_restaurant().is_ok());
        assert!(matches!(
            owner("u1", None).require_restaurant(),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            customer("u2").require_restaurant(),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn require_customer_guards() {
        assert!(customer("u1").require_customer().is_ok());
        assert!(matches!(
            owner("u1", Some("r1")).require_customer(),
            Err(AppError::Forbidden(_))
        ));
    }
}
