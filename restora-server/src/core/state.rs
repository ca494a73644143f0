use std::path::Path;
use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;
use crate::orders::OrderService;
use crate::realtime::EventBus;
use crate::services::{
    AccountService, AggregateService, ChatService, CouponService, DisabledEmailSender,
    EmailSender, LogEmailSender, LogPushSender, NotificationService, PushSender,
    ReservationService, ReviewService,
};

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是整个服务的核心数据结构，持有数据库句柄、事件总线
/// 与各业务服务的共享引用。内部都是 Arc 浅拷贝，Clone 成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | bus | EventBus | 进程内事件总线 |
/// | accounts | AccountService | 注册、身份、密码重置 |
/// | orders | OrderService | 订单生命周期 |
/// | reviews | ReviewService | 评论与评分联动 |
/// | coupons | CouponService | 优惠券校验与核销 |
/// | chats | ChatService | 会话与未读计数 |
/// | reservations | ReservationService | 预订流转 |
/// | notifications | NotificationService | 站内通知与推送 |
/// | aggregates | AggregateService | 聚合重算与计数器 |
///
/// # 使用示例
///
/// ```ignore
/// // 简单 CRUD 直接从 db 建仓储
/// let repo = RestaurantRepository::new(state.db.clone());
///
/// // 带业务规则的操作走服务
/// let order = state.orders.create(&actor, payload).await?;
/// ```
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 进程内事件总线
    pub bus: EventBus,
    /// 账号服务
    pub accounts: AccountService,
    /// 订单服务
    pub orders: OrderService,
    /// 评论服务
    pub reviews: ReviewService,
    /// 优惠券服务
    pub coupons: CouponService,
    /// 聊天服务
    pub chats: ChatService,
    /// 预订服务
    pub reservations: ReservationService,
    /// 通知服务
    pub notifications: NotificationService,
    /// 聚合维护服务
    pub aggregates: AggregateService,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`initialize()`](Self::initialize) 方法代替
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        bus: EventBus,
        accounts: AccountService,
        orders: OrderService,
        reviews: ReviewService,
        coupons: CouponService,
        chats: ChatService,
        reservations: ReservationService,
        notifications: NotificationService,
        aggregates: AggregateService,
    ) -> Self {
        Self {
            config,
            db,
            bus,
            accounts,
            orders,
            reviews,
            coupons,
            chats,
            reservations,
            notifications,
            aggregates,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 数据库目录与连接 (含唯一索引引导)
    /// 2. 事件总线与外协通道 (邮件、推送)
    /// 3. 各业务服务 (按依赖顺序)
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        // 1. Initialize DB
        if let Some(parent) = Path::new(&config.db_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).expect("Failed to create database directory");
        }
        let db_service = DbService::new(&config.db_path)
            .await
            .expect("Failed to initialize database");
        let db = db_service.db;

        // 2. Event bus and outbound channels
        let bus = EventBus::new();
        let email: Arc<dyn EmailSender> = if config.email_enabled {
            Arc::new(LogEmailSender)
        } else {
            Arc::new(DisabledEmailSender)
        };
        let push: Arc<dyn PushSender> = Arc::new(LogPushSender);

        // 3. Services, in dependency order
        let notifications = NotificationService::new(db.clone(), bus.clone(), push);
        let aggregates = AggregateService::new(db.clone());
        let coupons = CouponService::new(db.clone());
        let accounts = AccountService::new(db.clone(), email);
        let orders = OrderService::new(
            db.clone(),
            bus.clone(),
            notifications.clone(),
            coupons.clone(),
            aggregates.clone(),
        );
        let reviews = ReviewService::new(db.clone(), aggregates.clone());
        let chats = ChatService::new(db.clone(), bus.clone());
        let reservations = ReservationService::new(db.clone(), bus.clone(), notifications.clone());

        Self::new(
            config.clone(),
            db,
            bus,
            accounts,
            orders,
            reviews,
            coupons,
            chats,
            reservations,
            notifications,
            aggregates,
        )
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
