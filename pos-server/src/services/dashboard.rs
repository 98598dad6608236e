//! Table Dashboard
//!
//! The floor overview: every table, its current customer and that
//! customer's active order (PENDING or HOLD, newest first) with dish
//! details. Resolved as an explicit read pipeline: table, then
//! customer, then order, then dishes.

use serde::Serialize;
use surrealdb::RecordId;

use crate::db::models::serde_helpers;
use crate::db::models::{OrderStatus, OrderType, PaymentStatus};
use crate::db::repository::{
    DiningTableRepository, DishRepository, OrderRepository, RepoResult, UserRepository,
};

/// One table on the dashboard. Tables without a customer, and customers
/// without an active order, simply omit the optional parts.
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    #[serde(with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub capacity: i32,
    pub is_occupied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_customer: Option<TableCustomer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_order_info: Option<TableOrderInfo>,
}

/// Customer summary for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct TableCustomer {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    pub name: String,
    pub total_person: i32,
}

/// Active order summary for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct TableOrderInfo {
    pub status: OrderStatus,
    pub total_amount: f64,
    pub order_type: OrderType,
    pub payment_status: PaymentStatus,
    pub items: Vec<TableOrderItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableOrderItem {
    pub dish: TableOrderDish,
    pub qty: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableOrderDish {
    pub name: String,
    pub price: f64,
    pub category: crate::db::models::DishCategory,
    pub status: crate::db::models::DishStatus,
}

#[derive(Clone)]
pub struct TableDashboard {
    tables: DiningTableRepository,
    users: UserRepository,
    orders: OrderRepository,
    dishes: DishRepository,
}

impl TableDashboard {
    pub fn new(
        tables: DiningTableRepository,
        users: UserRepository,
        orders: OrderRepository,
        dishes: DishRepository,
    ) -> Self {
        Self {
            tables,
            users,
            orders,
            dishes,
        }
    }

    /// Build the dashboard for every table.
    ///
    /// Read-only view; no coordination with concurrent order
    /// mutations beyond read-after-write.
    pub async fn list_with_active_order(&self) -> RepoResult<Vec<TableView>> {
        let tables = self.tables.find_all().await?;
        let mut views = Vec::with_capacity(tables.len());

        for table in tables {
            let mut view = TableView {
                id: table.id,
                name: table.name,
                capacity: table.capacity,
                is_occupied: table.is_occupied,
                current_customer: None,
                current_order_info: None,
            };

            if let Some(customer_id) = table.current_customer
                && let Some(customer) = self.users.find_by_record(&customer_id).await?
            {
                view.current_customer = Some(TableCustomer {
                    id: customer_id.clone(),
                    name: customer.name,
                    total_person: customer.total_person,
                });

                if let Some(order) = self
                    .orders
                    .find_latest_active_for_customer(&customer_id)
                    .await?
                {
                    view.current_order_info = Some(TableOrderInfo {
                        status: order.status,
                        total_amount: order.total_amount,
                        order_type: order.order_type,
                        payment_status: order.payment_status,
                        items: self.resolve_items(&order.items).await?,
                    });
                }
            }

            views.push(view);
        }

        Ok(views)
    }

    async fn resolve_items(
        &self,
        items: &[crate::db::models::OrderItem],
    ) -> RepoResult<Vec<TableOrderItem>> {
        let mut resolved = Vec::with_capacity(items.len());
        for item in items {
            // Removed dishes drop off the view silently
            if let Some(dish) = self.dishes.find_by_id(&item.dish.to_string()).await? {
                resolved.push(TableOrderItem {
                    dish: TableOrderDish {
                        name: dish.name,
                        price: dish.price,
                        category: dish.category,
                        status: dish.status,
                    },
                    qty: item.qty,
                });
            }
        }
        Ok(resolved)
    }
}
