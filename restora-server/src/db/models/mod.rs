//! Database Models

// Serde helpers
pub mod serde_helpers;

// Accounts
pub mod user;

// Restaurant Domain
pub mod menu_item;
pub mod restaurant;

// Orders
pub mod order;

// Engagement
pub mod coupon;
pub mod review;

// Front of house
pub mod dining_table;
pub mod reservation;

// Messaging
pub mod chat;
pub mod notification;

// Re-exports
pub use user::{ForgotPasswordRequest, RegisterRequest, User, UserRole};
pub use restaurant::{Address, OpeningHours, Restaurant, RestaurantCreate, RestaurantUpdate};
pub use menu_item::{MenuCategory, MenuItem, MenuItemCreate, MenuItemUpdate};
pub use order::{
    CancelledBy, Order, OrderCancel, OrderCreate, OrderItem, OrderItemRequest, OrderRate,
    OrderStats, OrderStatus, OrderStatusUpdate, OrderType, PaymentMethod, PaymentStatus,
    StatusHistoryEntry,
};
pub use review::{OwnerResponse, Review, ReviewCreate, ReviewResponse, ReviewUpdate};
pub use coupon::{
    ApplicableFor, Coupon, CouponCreate, CouponQuote, CouponUpdate, CouponUse, CouponValidate,
    DiscountType,
};
pub use dining_table::{
    DiningTable, DiningTableCreate, DiningTableUpdate, TableLocation, TableStatus,
    TableStatusUpdate,
};
pub use reservation::{
    Reservation, ReservationCancel, ReservationCreate, ReservationStatus,
    ReservationStatusUpdate, TablePreference,
};
pub use chat::{Chat, ChatMessage, ChatOpen, ChatSendMessage, MessageType, UnreadEntry};
pub use notification::{Notification, NotificationKind, UnreadCount};
