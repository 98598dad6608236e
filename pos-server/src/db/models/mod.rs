//! Data models for the POS entities

pub mod admin;
pub mod dining_table;
pub mod dish;
pub mod order;
pub mod serde_helpers;
pub mod user;

pub use admin::{Admin, AdminCreate};
pub use dining_table::{DiningTable, DiningTableCreate};
pub use dish::{
    Dish, DishCategory, DishCreate, DishPatch, DishStatus, DishType, DishUpdate, SpiceLevel,
    split_ingredients,
};
pub use order::{
    Order, OrderCreateRequest, OrderCustomerInfo, OrderDetail, OrderDishInfo, OrderItem,
    OrderItemDetail, OrderItemInput, OrderItemPatch, OrderStatus, OrderTableInfo, OrderType,
    PaymentStatus,
};
pub use user::{User, UserCreate, UserId};
