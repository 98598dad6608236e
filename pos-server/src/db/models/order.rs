//! Order Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Placed,
    Pending,
    Completed,
    Canceled,
    Hold,
}

impl OrderStatus {
    /// Active orders populate the table dashboard.
    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Hold)
    }
}

/// Service type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "DINE-IN")]
    DineIn,
    #[serde(rename = "TAKEAWAY")]
    Takeaway,
}

/// Settlement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

/// A single order line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(with = "serde_helpers::record_id")]
    pub dish: RecordId,
    pub qty: i32,
    #[serde(default)]
    pub discount: f64,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub table: RecordId,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub total_amount: f64,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

// ── Wire requests ───────────────────────────────────────────────────

/// Order line as submitted by clients
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemInput {
    pub dish: String,
    pub qty: i32,
    #[serde(default)]
    pub discount: Option<f64>,
}

/// Place-order request; required fields checked by the handler so that
/// every missing field can be named in one response.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreateRequest {
    pub customer_id: Option<String>,
    pub table_id: Option<String>,
    pub items: Option<Vec<OrderItemInput>>,
    pub status: Option<OrderStatus>,
    pub order_type: Option<OrderType>,
    pub total_amount: Option<f64>,
    pub payment_status: Option<PaymentStatus>,
}

/// Patch for one order line (quantity and/or discount)
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemPatch {
    pub dish_id: Option<String>,
    pub qty: Option<i32>,
    pub discount: Option<f64>,
}

// ── Populated views ─────────────────────────────────────────────────

/// Customer summary embedded in populated order views
#[derive(Debug, Clone, Serialize)]
pub struct OrderCustomerInfo {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    pub name: String,
    pub is_online: bool,
}

/// Table summary embedded in populated order views
#[derive(Debug, Clone, Serialize)]
pub struct OrderTableInfo {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    pub capacity: i32,
}

/// Dish summary embedded in populated order lines
#[derive(Debug, Clone, Serialize)]
pub struct OrderDishInfo {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    pub name: String,
    pub price: f64,
}

/// Populated order line
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemDetail {
    pub dish: OrderDishInfo,
    pub qty: i32,
    pub discount: f64,
}

/// Populated order: the raw customer/table references are replaced by
/// `customer_info` / `table_info` summaries.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_info: Option<OrderCustomerInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_info: Option<OrderTableInfo>,
    pub items: Vec<OrderItemDetail>,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub total_amount: f64,
    pub payment_status: PaymentStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_and_hold_are_active() {
        assert!(OrderStatus::Pending.is_active());
        assert!(OrderStatus::Hold.is_active());
        assert!(!OrderStatus::Placed.is_active());
        assert!(!OrderStatus::Completed.is_active());
        assert!(!OrderStatus::Canceled.is_active());
    }

    #[test]
    fn order_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderType::DineIn).unwrap(),
            "\"DINE-IN\""
        );
        assert_eq!(
            serde_json::from_str::<OrderType>("\"TAKEAWAY\"").unwrap(),
            OrderType::Takeaway
        );
    }
}
