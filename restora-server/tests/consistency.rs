//! 数据一致性集成测试
//!
//! 计数器只增、优惠券台账、评分重算、会话未读、通知归属、
//! 重置令牌存储与预订快照。每个测试独立建库。

mod common;

use chrono::{Duration, Utc};
use common::{
    id_of, place_takeaway, run_to_completion, seed_customer, seed_menu_item,
    seed_owner_with_restaurant, seed_table, setup, setup_with,
};
use surrealdb::RecordId;

use restora_server::db::models::{
    ApplicableFor, ChatOpen, ChatSendMessage, Coupon, DiningTable, DiscountType, ForgotPasswordRequest,
    OrderCreate, OrderItemRequest, OrderType, PaymentMethod, ReservationCancel, ReservationCreate,
    ReservationStatus, ReservationStatusUpdate, ReviewCreate, ReviewResponse, TableLocation,
    TableStatus,
};
use restora_server::db::repository::{
    CouponRepository, DiningTableRepository, MenuItemRepository, Pagination, RepoError,
    RestaurantRepository, UserRepository,
};
use restora_server::realtime::Channel;
use restora_server::utils::AppError;

fn base_coupon(restaurant: &RecordId, code: &str) -> Coupon {
    Coupon {
        id: None,
        code: code.to_string(),
        description: "Five off your order".to_string(),
        discount_type: DiscountType::Fixed,
        discount_value: 5.0,
        min_order_amount: 10.0,
        max_discount_amount: None,
        usage_limit: None,
        usage_count: 0,
        user_usage_limit: 1,
        used_by: vec![],
        valid_from: Utc::now() - Duration::days(1),
        valid_until: Utc::now() + Duration::days(30),
        is_active: true,
        restaurant: restaurant.clone(),
        applicable_for: ApplicableFor::All,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn order_counters_only_go_up() {
    let env = setup().await;
    let state = &env.state;
    let customer = seed_customer(state, "Ana", "ana@example.com").await;
    let (_owner, restaurant) = seed_owner_with_restaurant(state, "Marco", "marco@example.com").await;
    let item = seed_menu_item(state, &restaurant, "Paella", 12.5, 20).await;
    let item_id = item.id.clone().unwrap().to_string();

    let restaurants = RestaurantRepository::new(state.db.clone());
    let menu_items = MenuItemRepository::new(state.db.clone());

    let before = restaurants
        .find_by_id(&restaurant.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(before.total_orders, 0);

    let order = place_takeaway(state, &customer, &restaurant, &item, 2).await;
    let after = restaurants
        .find_by_id(&restaurant.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.total_orders, 1);
    let popularity = menu_items.find_by_id(&item_id).await.unwrap().unwrap();
    assert_eq!(popularity.total_orders, 2);

    // 取消不回退计数
    state
        .orders
        .cancel(&customer, &id_of(&order), None)
        .await
        .unwrap();
    let after_cancel = restaurants
        .find_by_id(&restaurant.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after_cancel.total_orders, 1);
    let popularity = menu_items.find_by_id(&item_id).await.unwrap().unwrap();
    assert_eq!(popularity.total_orders, 2);

    place_takeaway(state, &customer, &restaurant, &item, 1).await;
    let next = restaurants
        .find_by_id(&restaurant.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(next.total_orders, 2);
    let popularity = menu_items.find_by_id(&item_id).await.unwrap().unwrap();
    assert_eq!(popularity.total_orders, 3);
}

#[tokio::test]
async fn coupon_discounts_pre_tax_and_settles_at_completion() {
    let env = setup().await;
    let state = &env.state;
    let customer = seed_customer(state, "Ana", "ana@example.com").await;
    let (owner, restaurant) = seed_owner_with_restaurant(state, "Marco", "marco@example.com").await;
    let item = seed_menu_item(state, &restaurant, "Paella", 10.0, 20).await;

    let coupons = CouponRepository::new(state.db.clone());
    coupons
        .create(base_coupon(&restaurant, "SAVE5"))
        .await
        .unwrap();

    // 码面大小写和空白在入口统一
    let order = state
        .orders
        .create(
            &customer,
            OrderCreate {
                restaurant_id: restaurant.to_string(),
                items: vec![OrderItemRequest {
                    menu_item_id: item.id.clone().unwrap().to_string(),
                    quantity: 2,
                    special_instructions: None,
                }],
                order_type: OrderType::Takeaway,
                table_number: None,
                payment_method: PaymentMethod::Cash,
                delivery_fee: None,
                coupon_code: Some(" save5 ".to_string()),
                special_instructions: None,
            },
        )
        .await
        .unwrap();

    // 折扣按税前金额算: 20.00 − 5.00, 税照全额收
    assert_eq!(order.total_amount, 20.0);
    assert_eq!(order.discount_amount, 5.0);
    assert_eq!(order.tax_amount, 2.0);
    assert_eq!(order.final_amount, 17.0);
    assert_eq!(order.coupon_code.as_deref(), Some("SAVE5"));

    // 下单不消耗额度
    let stored = coupons
        .find_by_code("SAVE5", &restaurant)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.usage_count, 0);
    assert!(stored.used_by.is_empty());

    // 完成时核销一次
    run_to_completion(state, &owner, &id_of(&order)).await;
    let settled = coupons
        .find_by_code("SAVE5", &restaurant)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(settled.usage_count, 1);
    assert_eq!(settled.used_by.len(), 1);
    assert_eq!(settled.used_by[0].count, 1);

    // 人均一次，第二次校验被拒
    let err = state
        .coupons
        .validate("SAVE5", &restaurant, customer.user_id(), 20.0)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation failed: Coupon has already been used"
    );

    // 别的顾客不受影响
    let other = seed_customer(state, "Eve", "eve@example.com").await;
    let quote = state
        .coupons
        .validate("SAVE5", &restaurant, other.user_id(), 20.0)
        .await
        .unwrap();
    assert_eq!(quote.discount_amount, 5.0);
    assert_eq!(quote.final_amount, 15.0);
}

#[tokio::test]
async fn cancelled_orders_never_consume_coupons() {
    let env = setup().await;
    let state = &env.state;
    let customer = seed_customer(state, "Ana", "ana@example.com").await;
    let (_owner, restaurant) = seed_owner_with_restaurant(state, "Marco", "marco@example.com").await;
    let item = seed_menu_item(state, &restaurant, "Paella", 10.0, 20).await;

    let coupons = CouponRepository::new(state.db.clone());
    coupons
        .create(base_coupon(&restaurant, "SAVE5"))
        .await
        .unwrap();

    let order = state
        .orders
        .create(
            &customer,
            OrderCreate {
                restaurant_id: restaurant.to_string(),
                items: vec![OrderItemRequest {
                    menu_item_id: item.id.clone().unwrap().to_string(),
                    quantity: 2,
                    special_instructions: None,
                }],
                order_type: OrderType::Takeaway,
                table_number: None,
                payment_method: PaymentMethod::Cash,
                delivery_fee: None,
                coupon_code: Some("SAVE5".to_string()),
                special_instructions: None,
            },
        )
        .await
        .unwrap();
    state
        .orders
        .cancel(&customer, &id_of(&order), None)
        .await
        .unwrap();

    let stored = coupons
        .find_by_code("SAVE5", &restaurant)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.usage_count, 0);
    assert!(stored.used_by.is_empty());

    // 额度还在，同一顾客可再次使用
    let quote = state
        .coupons
        .validate("SAVE5", &restaurant, customer.user_id(), 20.0)
        .await
        .unwrap();
    assert_eq!(quote.discount_amount, 5.0);
}

#[tokio::test]
async fn coupon_validation_gates() {
    let env = setup().await;
    let state = &env.state;
    let customer = seed_customer(state, "Ana", "ana@example.com").await;
    let (_owner, restaurant) = seed_owner_with_restaurant(state, "Marco", "marco@example.com").await;
    let item = seed_menu_item(state, &restaurant, "Paella", 10.0, 20).await;
    let user = customer.user_id();

    let coupons = CouponRepository::new(state.db.clone());

    let err = state
        .coupons
        .validate("NOPE", &restaurant, user, 50.0)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Resource not found: Invalid coupon code");

    let mut expired = base_coupon(&restaurant, "EXPIRED");
    expired.valid_until = Utc::now() - Duration::hours(1);
    coupons.create(expired).await.unwrap();
    let err = state
        .coupons
        .validate("EXPIRED", &restaurant, user, 50.0)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation failed: Coupon is expired or inactive"
    );

    let mut disabled = base_coupon(&restaurant, "DISABLED");
    disabled.is_active = false;
    coupons.create(disabled).await.unwrap();
    let err = state
        .coupons
        .validate("DISABLED", &restaurant, user, 50.0)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation failed: Coupon is expired or inactive"
    );

    let mut drained = base_coupon(&restaurant, "DRAINED");
    drained.usage_limit = Some(1);
    drained.usage_count = 1;
    coupons.create(drained).await.unwrap();
    let err = state
        .coupons
        .validate("DRAINED", &restaurant, user, 50.0)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation failed: Coupon is expired or inactive"
    );

    let mut pricey = base_coupon(&restaurant, "BIGSPEND");
    pricey.min_order_amount = 25.0;
    coupons.create(pricey).await.unwrap();
    let err = state
        .coupons
        .validate("BIGSPEND", &restaurant, user, 20.0)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation failed: Minimum order amount for this coupon is 25.00"
    );

    // 校验失败挡掉整个下单
    let err = state
        .orders
        .create(
            &customer,
            OrderCreate {
                restaurant_id: restaurant.to_string(),
                items: vec![OrderItemRequest {
                    menu_item_id: item.id.clone().unwrap().to_string(),
                    quantity: 1,
                    special_instructions: None,
                }],
                order_type: OrderType::Takeaway,
                table_number: None,
                payment_method: PaymentMethod::Cash,
                delivery_fee: None,
                coupon_code: Some("EXPIRED".to_string()),
                special_instructions: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn coupon_codes_are_globally_unique() {
    let env = setup().await;
    let state = &env.state;
    let (_o1, first) = seed_owner_with_restaurant(state, "Marco", "marco@example.com").await;
    let (_o2, second) = seed_owner_with_restaurant(state, "Luigi", "luigi@example.com").await;

    let coupons = CouponRepository::new(state.db.clone());
    coupons
        .create(base_coupon(&first, "WELCOME"))
        .await
        .unwrap();

    // 跨餐厅同码也不行
    let err = coupons
        .create(base_coupon(&second, "WELCOME"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
    assert_eq!(err.to_string(), "Duplicate: Coupon code 'WELCOME' already exists");
}

#[tokio::test]
async fn reviews_recompute_rating_on_every_write() {
    let env = setup().await;
    let state = &env.state;
    let ana = seed_customer(state, "Ana", "ana@example.com").await;
    let eve = seed_customer(state, "Eve", "eve@example.com").await;
    let (_owner, restaurant) = seed_owner_with_restaurant(state, "Marco", "marco@example.com").await;

    let restaurants = RestaurantRepository::new(state.db.clone());
    let review = |rating: i32| ReviewCreate {
        restaurant_id: restaurant.to_string(),
        order_id: None,
        menu_item_id: None,
        rating,
        comment: "Best paella this side of Valencia".to_string(),
        food_rating: None,
        service_rating: None,
        ambiance_rating: None,
    };

    let first = state.reviews.create(&ana, review(5)).await.unwrap();
    let snapshot = restaurants
        .find_by_id(&restaurant.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.average_rating, 5.0);
    assert_eq!(snapshot.total_reviews, 1);

    state.reviews.create(&eve, review(4)).await.unwrap();
    let snapshot = restaurants
        .find_by_id(&restaurant.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.average_rating, 4.5);
    assert_eq!(snapshot.total_reviews, 2);

    // 均值保留一位小数
    let walkin = seed_customer(state, "Luc", "luc@example.com").await;
    state.reviews.create(&walkin, review(4)).await.unwrap();
    let snapshot = restaurants
        .find_by_id(&restaurant.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.average_rating, 4.3);
    assert_eq!(snapshot.total_reviews, 3);

    // 删除同样触发重算
    let first_id = first.id.unwrap().to_string();
    state.reviews.delete(&ana, &first_id).await.unwrap();
    let snapshot = restaurants
        .find_by_id(&restaurant.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.average_rating, 4.0);
    assert_eq!(snapshot.total_reviews, 2);

    let (rest, total) = state
        .reviews
        .list_for_restaurant(&restaurant.to_string(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(total, 2);
    for r in rest {
        let author = if r.customer == *eve.user_id() { &eve } else { &walkin };
        state
            .reviews
            .delete(author, &r.id.unwrap().to_string())
            .await
            .unwrap();
    }

    // 无评论归零
    let snapshot = restaurants
        .find_by_id(&restaurant.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.average_rating, 0.0);
    assert_eq!(snapshot.total_reviews, 0);
}

#[tokio::test]
async fn order_reviews_require_completion_and_dedup() {
    let env = setup().await;
    let state = &env.state;
    let customer = seed_customer(state, "Ana", "ana@example.com").await;
    let (owner, restaurant) = seed_owner_with_restaurant(state, "Marco", "marco@example.com").await;
    let item = seed_menu_item(state, &restaurant, "Paella", 12.5, 20).await;

    let order = place_takeaway(state, &customer, &restaurant, &item, 1).await;
    let review = ReviewCreate {
        restaurant_id: restaurant.to_string(),
        order_id: Some(id_of(&order)),
        menu_item_id: None,
        rating: 5,
        comment: "Arrived hot and on time, would order again".to_string(),
        food_rating: Some(5),
        service_rating: Some(4),
        ambiance_rating: None,
    };

    // 未完成的订单不能评
    let err = state
        .reviews
        .create(&customer, review.clone())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation failed: Only completed orders can be reviewed"
    );

    run_to_completion(state, &owner, &id_of(&order)).await;

    // 别人的订单不能评
    let stranger = seed_customer(state, "Eve", "eve@example.com").await;
    let err = state
        .reviews
        .create(&stranger, review.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let created = state.reviews.create(&customer, review.clone()).await.unwrap();
    assert_eq!(created.rating, 5);
    assert_eq!(created.food_rating, Some(5));

    // 一单一评
    let err = state
        .reviews
        .create(&customer, review)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Conflict: Order has already been reviewed");
}

#[tokio::test]
async fn review_responses_and_helpful_votes() {
    let env = setup().await;
    let state = &env.state;
    let customer = seed_customer(state, "Ana", "ana@example.com").await;
    let voter = seed_customer(state, "Eve", "eve@example.com").await;
    let (owner, restaurant) = seed_owner_with_restaurant(state, "Marco", "marco@example.com").await;
    let (other_owner, _) = seed_owner_with_restaurant(state, "Luigi", "luigi@example.com").await;

    let review = state
        .reviews
        .create(
            &customer,
            ReviewCreate {
                restaurant_id: restaurant.to_string(),
                order_id: None,
                menu_item_id: None,
                rating: 4,
                comment: "Good food but the wait was long".to_string(),
                food_rating: None,
                service_rating: None,
                ambiance_rating: None,
            },
        )
        .await
        .unwrap();
    let review_id = review.id.unwrap().to_string();

    // 只有本店店主能回复
    let err = state
        .reviews
        .respond(
            &other_owner,
            &review_id,
            ReviewResponse {
                response: "Sorry about that".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let responded = state
        .reviews
        .respond(
            &owner,
            &review_id,
            ReviewResponse {
                response: "Thanks, we are adding staff on weekends".to_string(),
            },
        )
        .await
        .unwrap();
    let response = responded.response.unwrap();
    assert_eq!(response.text, "Thanks, we are adding staff on weekends");

    // 每人一票
    let voted = state.reviews.mark_helpful(&voter, &review_id).await.unwrap();
    assert_eq!(voted.helpful_count, 1);
    let err = state
        .reviews
        .mark_helpful(&voter, &review_id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Conflict: Already marked as helpful");
}

#[tokio::test]
async fn chats_collapse_to_one_per_pair() {
    let env = setup().await;
    let state = &env.state;
    let customer = seed_customer(state, "Ana", "ana@example.com").await;
    let (owner, _restaurant) = seed_owner_with_restaurant(state, "Marco", "marco@example.com").await;

    let opened = state
        .chats
        .open(
            &customer,
            ChatOpen {
                participant_id: owner.user_id().to_string(),
                restaurant_id: None,
                order_id: None,
            },
        )
        .await
        .unwrap();

    // 反向打开回到同一会话
    let reopened = state
        .chats
        .open(
            &owner,
            ChatOpen {
                participant_id: customer.user_id().to_string(),
                restaurant_id: None,
                order_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(opened.id, reopened.id);
    assert_eq!(state.chats.list(&customer).await.unwrap().len(), 1);

    let err = state
        .chats
        .open(
            &customer,
            ChatOpen {
                participant_id: customer.user_id().to_string(),
                restaurant_id: None,
                order_id: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation failed: Cannot open a chat with yourself"
    );

    let err = state
        .chats
        .open(
            &customer,
            ChatOpen {
                participant_id: "user:doesnotexist".to_string(),
                restaurant_id: None,
                order_id: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn chat_unread_counts_and_read_sweep() {
    let env = setup().await;
    let state = &env.state;
    let customer = seed_customer(state, "Ana", "ana@example.com").await;
    let (owner, _restaurant) = seed_owner_with_restaurant(state, "Marco", "marco@example.com").await;

    let chat = state
        .chats
        .open(
            &customer,
            ChatOpen {
                participant_id: owner.user_id().to_string(),
                restaurant_id: None,
                order_id: None,
            },
        )
        .await
        .unwrap();
    let chat_id = chat.id.clone().unwrap().to_string();

    let mut owner_rx = state
        .bus
        .subscribe(&Channel::User(owner.user_id().key().to_string()));
    let mut customer_rx = state
        .bus
        .subscribe(&Channel::User(customer.user_id().key().to_string()));

    for text in ["Is the paella gluten free?", "And do you deliver to Sol?"] {
        state
            .chats
            .send_message(
                &customer,
                &chat_id,
                ChatSendMessage {
                    content: text.to_string(),
                    message_type: None,
                },
            )
            .await
            .unwrap();
    }

    let updated = state.chats.messages(&owner, &chat_id).await.unwrap();
    assert_eq!(updated.len(), 2);
    assert!(!updated[0].is_read);

    let chat = state.chats.list(&owner).await.unwrap().remove(0);
    assert_eq!(chat.unread_for(owner.user_id()), 2);
    assert_eq!(chat.unread_for(customer.user_id()), 0);
    assert_eq!(state.chats.unread_total(&owner).await.unwrap(), 2);
    assert_eq!(state.chats.unread_total(&customer).await.unwrap(), 0);
    assert_eq!(chat.last_message.as_deref(), Some("And do you deliver to Sol?"));
    assert!(chat.last_message_at.is_some());

    // 发消息给对端推送 new-message
    let event = owner_rx.try_recv().unwrap();
    assert_eq!(event.name, "new-message");
    assert_eq!(event.payload["message"]["content"], "Is the paella gluten free?");
    assert!(customer_rx.try_recv().is_err());

    // 已读清零并为对方消息补时间戳
    let read = state.chats.mark_read(&owner, &chat_id).await.unwrap();
    assert_eq!(read.unread_for(owner.user_id()), 0);
    for message in &read.messages {
        assert!(message.is_read);
        assert!(message.read_at.is_some());
    }
    let event = customer_rx.try_recv().unwrap();
    assert_eq!(event.name, "message-read");

    // 非参与者不可读
    let stranger = seed_customer(state, "Eve", "eve@example.com").await;
    let err = state.chats.messages(&stranger, &chat_id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn order_chats_link_customer_and_owner() {
    let env = setup().await;
    let state = &env.state;
    let customer = seed_customer(state, "Ana", "ana@example.com").await;
    let (owner, restaurant) = seed_owner_with_restaurant(state, "Marco", "marco@example.com").await;
    let item = seed_menu_item(state, &restaurant, "Paella", 12.5, 20).await;
    let order = place_takeaway(state, &customer, &restaurant, &item, 1).await;
    let order_id = id_of(&order);

    let chat = state.chats.open_for_order(&customer, &order_id).await.unwrap();
    assert!(chat.participants.contains(customer.user_id()));
    assert!(chat.participants.contains(owner.user_id()));
    assert_eq!(chat.order, order.id);

    // 店主侧拿到同一会话
    let same = state.chats.open_for_order(&owner, &order_id).await.unwrap();
    assert_eq!(chat.id, same.id);

    let stranger = seed_customer(state, "Eve", "eve@example.com").await;
    let err = state
        .chats
        .open_for_order(&stranger, &order_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn notifications_track_unread_and_enforce_recipient() {
    let env = setup().await;
    let state = &env.state;
    let customer = seed_customer(state, "Ana", "ana@example.com").await;
    let (owner, restaurant) = seed_owner_with_restaurant(state, "Marco", "marco@example.com").await;
    let item = seed_menu_item(state, &restaurant, "Paella", 12.5, 20).await;

    let mut owner_rx = state
        .bus
        .subscribe(&Channel::User(owner.user_id().key().to_string()));

    place_takeaway(state, &customer, &restaurant, &item, 1).await;
    place_takeaway(state, &customer, &restaurant, &item, 1).await;

    assert_eq!(state.notifications.unread_count(&owner).await.unwrap(), 2);
    let event = owner_rx.try_recv().unwrap();
    assert_eq!(event.name, "notification");
    assert_eq!(event.payload["title"], "New order received");

    let (items, total) = state
        .notifications
        .list(&owner, Pagination::default())
        .await
        .unwrap();
    assert_eq!(total, 2);
    let first_id = items[0].id.clone().unwrap().to_string();

    // 别人的通知动不得
    let err = state
        .notifications
        .mark_read(&customer, &first_id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Permission denied: Not your notification");

    let read = state.notifications.mark_read(&owner, &first_id).await.unwrap();
    assert!(read.is_read);
    assert!(read.read_at.is_some());
    assert_eq!(state.notifications.unread_count(&owner).await.unwrap(), 1);

    state.notifications.mark_all_read(&owner).await.unwrap();
    assert_eq!(state.notifications.unread_count(&owner).await.unwrap(), 0);

    state.notifications.delete(&owner, &first_id).await.unwrap();
    let (_, total) = state
        .notifications
        .list(&owner, Pagination::default())
        .await
        .unwrap();
    assert_eq!(total, 1);
}

#[tokio::test]
async fn password_reset_tokens_are_hashed_at_rest() {
    let env = setup().await;
    let state = &env.state;
    seed_customer(state, "Ana", "ana@example.com").await;

    state
        .accounts
        .forgot_password(ForgotPasswordRequest {
            email: "ana@example.com".to_string(),
        })
        .await
        .unwrap();

    let stored = UserRepository::new(state.db.clone())
        .find_by_email("ana@example.com")
        .await
        .unwrap()
        .unwrap();
    let digest = stored.reset_password_token.unwrap();
    // sha-256 摘要，不是明文令牌 (明文 40 hex)
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(stored.reset_password_expire.unwrap() > Utc::now());

    let err = state
        .accounts
        .forgot_password(ForgotPasswordRequest {
            email: "nobody@example.com".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Resource not found: No account with that email"
    );
}

#[tokio::test]
async fn failed_reset_email_leaves_no_token_behind() {
    let env = setup_with(false).await;
    let state = &env.state;
    seed_customer(state, "Ana", "ana@example.com").await;

    let err = state
        .accounts
        .forgot_password(ForgotPasswordRequest {
            email: "ana@example.com".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Upstream(_)));

    let stored = UserRepository::new(state.db.clone())
        .find_by_email("ana@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(stored.reset_password_token.is_none());
    assert!(stored.reset_password_expire.is_none());
}

#[tokio::test]
async fn table_numbers_are_unique_per_restaurant() {
    let env = setup().await;
    let state = &env.state;
    let (_o1, first) = seed_owner_with_restaurant(state, "Marco", "marco@example.com").await;
    let (_o2, second) = seed_owner_with_restaurant(state, "Luigi", "luigi@example.com").await;

    let table = seed_table(state, &first, 1).await;

    let tables = DiningTableRepository::new(state.db.clone());
    let err = tables
        .create(DiningTable {
            id: None,
            restaurant: first.clone(),
            number: 1,
            capacity: 2,
            location: TableLocation::Outdoor,
            status: TableStatus::Available,
            qr_code: format!("TABLE-{}-1-dup", first.key()),
            is_active: true,
            current_order: None,
            created_at: Utc::now(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    // 别家餐厅可以用同一桌号
    seed_table(state, &second, 1).await;

    // 二维码回查到同一张桌子
    let resolved = tables.find_by_qr(&table.qr_code).await.unwrap().unwrap();
    assert_eq!(resolved.id, table.id);

    let restaurants = RestaurantRepository::new(state.db.clone());
    let snapshot = restaurants
        .find_by_id(&first.to_string())
        .await
        .unwrap()
        .unwrap();
    assert!(snapshot.qr_code.starts_with("RESTORA-"));
    let by_qr = restaurants
        .find_by_qr(&snapshot.qr_code)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_qr.id, snapshot.id);
}

#[tokio::test]
async fn reservations_snapshot_contact_and_reserve_tables() {
    let env = setup().await;
    let state = &env.state;
    let customer = seed_customer(state, "Ana", "ana@example.com").await;
    let (owner, restaurant) = seed_owner_with_restaurant(state, "Marco", "marco@example.com").await;
    let table = seed_table(state, &restaurant, 3).await;

    let date = (Utc::now().date_naive() + Duration::days(7))
        .format("%Y-%m-%d")
        .to_string();
    let reservation = state
        .reservations
        .create(
            &customer,
            ReservationCreate {
                restaurant_id: restaurant.to_string(),
                date: date.clone(),
                time: "20:30".to_string(),
                party_size: 4,
                table_preference: None,
                special_request: Some("window seat".to_string()),
            },
        )
        .await
        .unwrap();

    // 联系方式快照自账号资料
    assert_eq!(reservation.status, ReservationStatus::Pending);
    assert_eq!(reservation.customer_name, "Ana");
    assert_eq!(reservation.customer_email, "ana@example.com");
    assert_eq!(reservation.customer_phone, "600333444");
    assert!(reservation.confirmed_at.is_none());

    // 确认同时指派桌台
    let reservation_id = reservation.id.clone().unwrap().to_string();
    let confirmed = state
        .reservations
        .update_status(
            &owner,
            &reservation_id,
            ReservationStatusUpdate {
                status: ReservationStatus::Confirmed,
                table_id: Some(table.id.clone().unwrap().to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(confirmed.status, ReservationStatus::Confirmed);
    assert!(confirmed.confirmed_at.is_some());
    assert_eq!(confirmed.assigned_table, table.id);

    let reserved = DiningTableRepository::new(state.db.clone())
        .find_by_number(&restaurant, 3)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reserved.status, TableStatus::Reserved);

    // 顾客收到状态通知
    assert!(state.notifications.unread_count(&customer).await.unwrap() >= 1);
}

#[tokio::test]
async fn reservation_cancellation_is_single_shot() {
    let env = setup().await;
    let state = &env.state;
    let customer = seed_customer(state, "Ana", "ana@example.com").await;
    let stranger = seed_customer(state, "Eve", "eve@example.com").await;
    let (_owner, restaurant) = seed_owner_with_restaurant(state, "Marco", "marco@example.com").await;

    let date = (Utc::now().date_naive() + Duration::days(3))
        .format("%Y-%m-%d")
        .to_string();
    let reservation = state
        .reservations
        .create(
            &customer,
            ReservationCreate {
                restaurant_id: restaurant.to_string(),
                date,
                time: "13:00".to_string(),
                party_size: 2,
                table_preference: None,
                special_request: None,
            },
        )
        .await
        .unwrap();
    let reservation_id = reservation.id.clone().unwrap().to_string();

    let err = state
        .reservations
        .cancel(
            &stranger,
            &reservation_id,
            ReservationCancel { reason: None },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let cancelled = state
        .reservations
        .cancel(
            &customer,
            &reservation_id,
            ReservationCancel {
                reason: Some("plans changed".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(cancelled.status, ReservationStatus::Cancelled);
    assert!(cancelled.cancelled_at.is_some());
    assert_eq!(cancelled.cancellation_reason.as_deref(), Some("plans changed"));

    // 重复取消报冲突
    let err = state
        .reservations
        .cancel(
            &customer,
            &reservation_id,
            ReservationCancel { reason: None },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Conflict: Reservation is already cancelled");
}

#[tokio::test]
async fn reservations_reject_past_dates_and_foreign_tables() {
    let env = setup().await;
    let state = &env.state;
    let customer = seed_customer(state, "Ana", "ana@example.com").await;
    let (owner, restaurant) = seed_owner_with_restaurant(state, "Marco", "marco@example.com").await;
    let (_other_owner, other) = seed_owner_with_restaurant(state, "Luigi", "luigi@example.com").await;
    let foreign_table = seed_table(state, &other, 1).await;

    let past = (Utc::now().date_naive() - Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();
    let err = state
        .reservations
        .create(
            &customer,
            ReservationCreate {
                restaurant_id: restaurant.to_string(),
                date: past,
                time: "20:00".to_string(),
                party_size: 2,
                table_preference: None,
                special_request: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = state
        .reservations
        .create(
            &customer,
            ReservationCreate {
                restaurant_id: restaurant.to_string(),
                date: "23/08/2026".to_string(),
                time: "20:00".to_string(),
                party_size: 2,
                table_preference: None,
                special_request: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let date = (Utc::now().date_naive() + Duration::days(2))
        .format("%Y-%m-%d")
        .to_string();
    let reservation = state
        .reservations
        .create(
            &customer,
            ReservationCreate {
                restaurant_id: restaurant.to_string(),
                date,
                time: "20:00".to_string(),
                party_size: 2,
                table_preference: None,
                special_request: None,
            },
        )
        .await
        .unwrap();
    let reservation_id = reservation.id.clone().unwrap().to_string();

    // 指派的桌台必须属于本店
    let err = state
        .reservations
        .update_status(
            &owner,
            &reservation_id,
            ReservationStatusUpdate {
                status: ReservationStatus::Confirmed,
                table_id: Some(foreign_table.id.clone().unwrap().to_string()),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation failed: Table does not belong to this restaurant"
    );
}
