//! Order Repository
//!
//! Order CRUD plus the populated read views. Population is an explicit
//! multi-step pipeline (orders, then customers, tables and dishes by
//! id) so it does not lean on any store-specific join feature.

use std::collections::HashMap;

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{
    DiningTable, Dish, Order, OrderCustomerInfo, OrderDetail, OrderDishInfo, OrderItem,
    OrderItemDetail, OrderStatus, OrderTableInfo, OrderType, PaymentStatus, User,
};
use crate::utils::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const TABLE: &str = "order";

/// Fields of a new order, already id-validated by the caller
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub customer: surrealdb::RecordId,
    pub table: surrealdb::RecordId,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub total_amount: f64,
    pub payment_status: PaymentStatus,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record = parse_id(id, TABLE)?;
        let order: Option<Order> = self.base.db().select(record).await?;
        Ok(order)
    }

    /// Orders created at or after `start_millis`, newest first.
    ///
    /// Sorted here rather than in the query: the embedded engine
    /// mis-orders WHERE + ORDER BY + LIMIT combinations.
    pub async fn find_since(&self, start_millis: i64) -> RepoResult<Vec<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE created_at >= $start")
            .bind(("start", start_millis))
            .await?;
        let mut orders: Vec<Order> = result.take(0)?;
        orders.sort_by_key(|o| std::cmp::Reverse(o.created_at));
        Ok(orders)
    }

    /// Most recent active (PENDING/HOLD) order for a customer, if any.
    pub async fn find_latest_active_for_customer(
        &self,
        customer: &surrealdb::RecordId,
    ) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE customer = $customer")
            .bind(("customer", customer.clone()))
            .await?;
        let mut orders: Vec<Order> = result.take(0)?;
        orders.retain(|o| o.status.is_active());
        orders.sort_by_key(|o| std::cmp::Reverse(o.created_at));
        Ok(orders.into_iter().next())
    }

    /// Create a new order
    pub async fn create(&self, data: OrderCreate) -> RepoResult<Order> {
        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE order SET
                    customer = $customer,
                    table = $table,
                    items = $items,
                    status = $status,
                    order_type = $order_type,
                    total_amount = $total_amount,
                    payment_status = $payment_status,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("customer", data.customer))
            .bind(("table", data.table))
            .bind(("items", data.items))
            .bind(("status", data.status))
            .bind(("order_type", data.order_type))
            .bind(("total_amount", data.total_amount))
            .bind(("payment_status", data.payment_status))
            .bind(("now", now))
            .await?;

        let created: Option<Order> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Replace the order's line items
    pub async fn update_items(&self, id: &str, items: Vec<OrderItem>) -> RepoResult<Order> {
        let record = parse_id(id, TABLE)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET items = $items, updated_at = $now RETURN AFTER")
            .bind(("thing", record))
            .bind(("items", items))
            .bind(("now", now_millis()))
            .await?;
        let updated: Option<Order> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Set the order status
    pub async fn set_status(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        let record = parse_id(id, TABLE)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET status = $status, updated_at = $now RETURN AFTER")
            .bind(("thing", record))
            .bind(("status", status))
            .bind(("now", now_millis()))
            .await?;
        let updated: Option<Order> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Hard delete an order, returning it for history cleanup
    pub async fn delete(&self, id: &str) -> RepoResult<Option<Order>> {
        let record = parse_id(id, TABLE)?;
        let deleted: Option<Order> = self.base.db().delete(record).await?;
        Ok(deleted)
    }

    // ── Populated views ─────────────────────────────────────────────

    /// All orders with customer/table/dish summaries resolved
    pub async fn find_all_detailed(&self) -> RepoResult<Vec<OrderDetail>> {
        let orders = self.find_all().await?;
        self.populate(orders).await
    }

    /// One order with customer/table/dish summaries resolved
    pub async fn find_detail(&self, id: &str) -> RepoResult<Option<OrderDetail>> {
        match self.find_by_id(id).await? {
            Some(order) => Ok(self.populate(vec![order]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    /// Resolve referenced customers, tables and dishes in three batch
    /// reads and stitch the summaries onto each order.
    async fn populate(&self, orders: Vec<Order>) -> RepoResult<Vec<OrderDetail>> {
        let mut customer_ids: Vec<surrealdb::RecordId> = Vec::new();
        let mut table_ids: Vec<surrealdb::RecordId> = Vec::new();
        let mut dish_ids: Vec<surrealdb::RecordId> = Vec::new();

        for order in &orders {
            if !customer_ids.contains(&order.customer) {
                customer_ids.push(order.customer.clone());
            }
            if !table_ids.contains(&order.table) {
                table_ids.push(order.table.clone());
            }
            for item in &order.items {
                if !dish_ids.contains(&item.dish) {
                    dish_ids.push(item.dish.clone());
                }
            }
        }

        let users: Vec<User> = self.fetch_by_ids("user", customer_ids).await?;
        let tables: Vec<DiningTable> = self.fetch_by_ids("dining_table", table_ids).await?;
        let dishes: Vec<Dish> = self.fetch_by_ids("dish", dish_ids).await?;

        let users: HashMap<String, User> = index_by_id(users, |u| u.id.clone());
        let tables: HashMap<String, DiningTable> = index_by_id(tables, |t| t.id.clone());
        let dishes: HashMap<String, Dish> = index_by_id(dishes, |d| d.id.clone());

        let details = orders
            .into_iter()
            .map(|order| {
                let customer_info = users.get(&order.customer.to_string()).map(|u| {
                    OrderCustomerInfo {
                        id: order.customer.clone(),
                        name: u.name.clone(),
                        is_online: u.is_online,
                    }
                });
                let table_info =
                    tables
                        .get(&order.table.to_string())
                        .map(|t| OrderTableInfo {
                            id: order.table.clone(),
                            capacity: t.capacity,
                        });
                // Lines whose dish has since been removed are dropped
                // from the view rather than shown half-populated
                let items = order
                    .items
                    .iter()
                    .filter_map(|item| {
                        dishes.get(&item.dish.to_string()).map(|d| OrderItemDetail {
                            dish: OrderDishInfo {
                                id: item.dish.clone(),
                                name: d.name.clone(),
                                price: d.price,
                            },
                            qty: item.qty,
                            discount: item.discount,
                        })
                    })
                    .collect();

                OrderDetail {
                    id: order.id,
                    customer_info,
                    table_info,
                    items,
                    status: order.status,
                    order_type: order.order_type,
                    total_amount: order.total_amount,
                    payment_status: order.payment_status,
                    created_at: order.created_at,
                    updated_at: order.updated_at,
                }
            })
            .collect();

        Ok(details)
    }

    async fn fetch_by_ids<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        ids: Vec<surrealdb::RecordId>,
    ) -> RepoResult<Vec<T>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut result = self
            .base
            .db()
            .query(format!("SELECT * FROM {table} WHERE id IN $ids"))
            .bind(("ids", ids))
            .await?;
        Ok(result.take(0)?)
    }
}

fn index_by_id<T>(
    rows: Vec<T>,
    id_of: impl Fn(&T) -> Option<surrealdb::RecordId>,
) -> HashMap<String, T> {
    rows.into_iter()
        .filter_map(|row| id_of(&row).map(|id| (id.to_string(), row)))
        .collect()
}
