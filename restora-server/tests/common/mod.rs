//! 集成测试公共设施
//!
//! 每个测试在独立的临时 RocksDB 上初始化完整 ServerState，
//! 种子数据直接走仓储层，业务断言走服务层。

use chrono::Utc;
use surrealdb::RecordId;
use tempfile::TempDir;
use uuid::Uuid;

use restora_server::auth::Actor;
use restora_server::db::models::{
    Address, DiningTable, MenuCategory, MenuItem, Order, OrderCreate, OrderItemRequest,
    OrderStatus, OrderType, PaymentMethod, RegisterRequest, Restaurant, TableLocation,
    TableStatus, UserRole,
};
use restora_server::db::repository::{
    DiningTableRepository, MenuItemRepository, RestaurantRepository,
};
use restora_server::{Config, ServerState};

/// 测试环境，TempDir 随之存活直到测试结束
pub struct TestEnv {
    pub state: ServerState,
    _dir: TempDir,
}

pub async fn setup() -> TestEnv {
    setup_with(true).await
}

pub async fn setup_with(email_enabled: bool) -> TestEnv {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::with_overrides(dir.path().join("restora.db").to_string_lossy(), 0);
    config.email_enabled = email_enabled;
    let state = ServerState::initialize(&config).await;
    TestEnv { state, _dir: dir }
}

/// 注册顾客账号
pub async fn seed_customer(state: &ServerState, name: &str, email: &str) -> Actor {
    let user = state
        .accounts
        .register(RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            role: UserRole::Customer,
            phone: Some("600333444".to_string()),
        })
        .await
        .unwrap();
    Actor::Customer {
        id: user.id.unwrap(),
    }
}

/// 注册店主账号并直接挂一家营业中的餐厅
pub async fn seed_owner_with_restaurant(
    state: &ServerState,
    name: &str,
    email: &str,
) -> (Actor, RecordId) {
    let user = state
        .accounts
        .register(RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            role: UserRole::Restaurant,
            phone: Some("600111222".to_string()),
        })
        .await
        .unwrap();
    let owner_id = user.id.unwrap();

    let key = Uuid::new_v4().simple().to_string();
    let restaurant = Restaurant {
        id: Some(RecordId::from_table_key("restaurant", key.clone())),
        owner: owner_id.clone(),
        name: format!("{} Kitchen", name),
        description: "Small kitchen with a short seasonal menu".to_string(),
        cuisine: "spanish".to_string(),
        price_range: 2,
        address: Address {
            street: "Calle Mayor 1".to_string(),
            city: "Madrid".to_string(),
            state: None,
            postal_code: "28001".to_string(),
            country: "ES".to_string(),
        },
        phone: "+34600111222".to_string(),
        email: email.to_string(),
        opening_hours: vec![],
        seating_capacity: 30,
        delivery_available: true,
        takeaway_available: true,
        has_vegetarian_options: false,
        is_active: true,
        is_verified: false,
        is_featured: false,
        qr_code: format!("RESTORA-{}-{}", key, Utc::now().timestamp_millis()),
        average_rating: 0.0,
        total_reviews: 0,
        total_orders: 0,
        created_at: Utc::now(),
    };
    let stored = RestaurantRepository::new(state.db.clone())
        .create(restaurant)
        .await
        .unwrap();
    let restaurant_id = stored.id.unwrap();

    let actor = Actor::Owner {
        id: owner_id,
        restaurant_id: Some(restaurant_id.clone()),
    };
    (actor, restaurant_id)
}

pub async fn seed_menu_item(
    state: &ServerState,
    restaurant: &RecordId,
    name: &str,
    price: f64,
    preparation_time: i32,
) -> MenuItem {
    let item = MenuItem {
        id: None,
        restaurant: restaurant.clone(),
        name: name.to_string(),
        description: None,
        price,
        category: MenuCategory::MainCourse,
        image: None,
        ingredients: vec![],
        is_vegetarian: false,
        is_vegan: false,
        is_gluten_free: false,
        spicy_level: 0,
        preparation_time,
        is_available: true,
        total_orders: 0,
        created_at: Utc::now(),
    };
    MenuItemRepository::new(state.db.clone())
        .create(item)
        .await
        .unwrap()
}

pub async fn seed_table(state: &ServerState, restaurant: &RecordId, number: i32) -> DiningTable {
    let table = DiningTable {
        id: None,
        restaurant: restaurant.clone(),
        number,
        capacity: 4,
        location: TableLocation::Indoor,
        status: TableStatus::Available,
        qr_code: format!(
            "TABLE-{}-{}-{}",
            restaurant.key(),
            number,
            Utc::now().timestamp_millis()
        ),
        is_active: true,
        current_order: None,
        created_at: Utc::now(),
    };
    DiningTableRepository::new(state.db.clone())
        .create(table)
        .await
        .unwrap()
}

/// 下一单现金外带订单（单行）
pub async fn place_takeaway(
    state: &ServerState,
    customer: &Actor,
    restaurant: &RecordId,
    menu_item: &MenuItem,
    quantity: i32,
) -> Order {
    state
        .orders
        .create(
            customer,
            OrderCreate {
                restaurant_id: restaurant.to_string(),
                items: vec![OrderItemRequest {
                    menu_item_id: menu_item.id.clone().unwrap().to_string(),
                    quantity,
                    special_instructions: None,
                }],
                order_type: OrderType::Takeaway,
                table_number: None,
                payment_method: PaymentMethod::Cash,
                delivery_fee: None,
                coupon_code: None,
                special_instructions: None,
            },
        )
        .await
        .unwrap()
}

/// 店主把订单一路推进到 completed
pub async fn run_to_completion(state: &ServerState, owner: &Actor, order_id: &str) -> Order {
    let mut order = None;
    for status in [
        OrderStatus::Received,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Served,
        OrderStatus::Completed,
    ] {
        order = Some(
            state
                .orders
                .advance_status(owner, order_id, status)
                .await
                .unwrap(),
        );
    }
    order.unwrap()
}

pub fn id_of(order: &Order) -> String {
    order.id.clone().unwrap().to_string()
}
