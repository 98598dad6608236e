//! Order API Handlers
//!
//! Order placement, populated reads, per-line updates, cancel and
//! delete. Placement validates every referenced id up front so the
//! stored order never points at a syntactically bad reference.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::models::{
    Order, OrderCreateRequest, OrderDetail, OrderItem, OrderItemPatch, OrderStatus, OrderType,
    PaymentStatus,
};
use crate::db::repository::{dining_table, dish, order::OrderCreate, parse_id, user};
use crate::utils::{ApiResponse, AppError, AppResult, MissingFields, ok, today_start_millis};

#[derive(Serialize)]
pub struct OrderBody {
    pub order: Order,
}

#[derive(Serialize)]
pub struct OrdersBody {
    pub orders: Vec<Order>,
}

#[derive(Serialize)]
pub struct OrderDetailBody {
    pub order: OrderDetail,
}

#[derive(Serialize)]
pub struct OrderDetailsBody {
    pub orders: Vec<OrderDetail>,
}

#[derive(Serialize)]
pub struct UpdatedOrderBody {
    pub updated_order: Order,
}

#[derive(Serialize)]
pub struct DeletedOrderBody {
    pub deleted_order: Order,
}

/// POST /api/v1/order/ - place an order
pub async fn create(
    State(state): State<ServerState>,
    Json(req): Json<OrderCreateRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderBody>>)> {
    let mut missing = MissingFields::new();
    missing.check("customer_id", &req.customer_id);
    missing.check("table_id", &req.table_id);
    missing.check_that(
        "items",
        req.items.as_ref().is_some_and(|items| !items.is_empty()),
    );
    missing.check_that("status", req.status.is_some());
    missing.check_that("order_type", req.order_type.is_some());
    missing.check_that("total_amount", req.total_amount.is_some());
    missing.check_that("payment_status", req.payment_status.is_some());
    missing.into_result()?;

    let items = req.items.unwrap_or_default();

    // Every referenced id has to parse before anything is written
    let mut invalid: Vec<String> = Vec::new();
    let customer = match parse_id(req.customer_id.as_deref().unwrap_or_default(), user::TABLE) {
        Ok(record) => Some(record),
        Err(_) => {
            invalid.push(req.customer_id.clone().unwrap_or_default());
            None
        }
    };
    let table = match parse_id(
        req.table_id.as_deref().unwrap_or_default(),
        dining_table::TABLE,
    ) {
        Ok(record) => Some(record),
        Err(_) => {
            invalid.push(req.table_id.clone().unwrap_or_default());
            None
        }
    };

    let mut order_items = Vec::with_capacity(items.len());
    for item in &items {
        match parse_id(&item.dish, dish::TABLE) {
            Ok(record) => order_items.push(OrderItem {
                dish: record,
                qty: item.qty,
                discount: item.discount.unwrap_or(0.0),
            }),
            Err(_) => invalid.push(item.dish.clone()),
        }
    }

    if !invalid.is_empty() {
        return Err(AppError::validation(format!(
            "Invalid id(s): {}",
            invalid.join(", ")
        )));
    }

    let customer = customer.ok_or_else(|| AppError::internal("Customer id missing"))?;
    let table = table.ok_or_else(|| AppError::internal("Table id missing"))?;

    let order = state
        .orders()
        .create(OrderCreate {
            customer: customer.clone(),
            table,
            items: order_items,
            // All Some after the missing-field pass above
            status: req.status.unwrap_or(OrderStatus::Placed),
            order_type: req.order_type.unwrap_or(OrderType::DineIn),
            total_amount: req.total_amount.unwrap_or_default(),
            payment_status: req.payment_status.unwrap_or(PaymentStatus::Unpaid),
        })
        .await?;

    if let Some(order_id) = &order.id {
        state.users().push_order(&customer, order_id).await?;
    }

    tracing::info!(
        customer = %customer,
        total = order.total_amount,
        "Order placed"
    );

    Ok((
        StatusCode::CREATED,
        ok("Order placed successfully", OrderBody { order }),
    ))
}

/// GET /api/v1/order/ - all orders, populated
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<OrderDetailsBody>>> {
    let orders = state.orders().find_all_detailed().await?;
    Ok(ok(
        "Orders fetched successfully",
        OrderDetailsBody { orders },
    ))
}

/// GET /api/v1/order/{id} - one order, populated
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderDetailBody>>> {
    let order = state
        .orders()
        .find_detail(&id)
        .await?
        .ok_or_else(|| AppError::not_found("No order found with this id"))?;
    Ok(ok("Order fetched successfully", OrderDetailBody { order }))
}

/// GET /api/v1/order/order-list/today - today's orders
pub async fn today(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<OrdersBody>>> {
    let orders = state.orders().find_since(today_start_millis()).await?;
    Ok(ok("Orders fetched successfully", OrdersBody { orders }))
}

/// PATCH /api/v1/order/update_item/{id} - adjust one line's qty/discount
pub async fn update_item(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<OrderItemPatch>,
) -> AppResult<Json<ApiResponse<UpdatedOrderBody>>> {
    let dish_id = match &req.dish_id {
        Some(d) if !d.trim().is_empty() => d.clone(),
        _ => {
            return Err(AppError::validation(
                "Either quantity or discount and dish id must be provided",
            ));
        }
    };
    if req.qty.is_none() && req.discount.is_none() {
        return Err(AppError::validation(
            "Either quantity or discount and dish id must be provided",
        ));
    }

    let dish_record = parse_id(&dish_id, dish::TABLE)
        .map_err(|_| AppError::validation(format!("Invalid dish id: {}", dish_id)))?;

    let mut order = state
        .orders()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("No order found with this id"))?;

    let item = order
        .items
        .iter_mut()
        .find(|item| item.dish == dish_record)
        .ok_or_else(|| AppError::not_found("No order found with this id or dish"))?;

    if let Some(qty) = req.qty {
        if qty <= 0 {
            return Err(AppError::validation("Quantity must be positive"));
        }
        item.qty = qty;
    }
    if let Some(discount) = req.discount {
        if discount < 0.0 {
            return Err(AppError::validation("Discount must not be negative"));
        }
        item.discount = discount;
    }

    let updated_order = state.orders().update_items(&id, order.items).await?;

    Ok(ok(
        "Order quantity or discount updated successfully",
        UpdatedOrderBody { updated_order },
    ))
}

/// PATCH /api/v1/order/cancel/{id} - cancel an order
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderBody>>> {
    // Existence first so an unknown id reads as a miss, not a no-op
    state
        .orders()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("No order found with this id"))?;

    let order = state.orders().set_status(&id, OrderStatus::Canceled).await?;

    Ok(ok("Order canceled successfully", OrderBody { order }))
}

/// DELETE /api/v1/order/{id} - remove an order
///
/// Pulls the order from the customer's history. Table occupancy is
/// left alone unless `release_table_on_order_delete` is enabled.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DeletedOrderBody>>> {
    let order = state
        .orders()
        .delete(&id)
        .await?
        .ok_or_else(|| AppError::not_found("No order found with this id"))?;

    if let Some(order_id) = &order.id {
        state.users().pull_order(&order.customer, order_id).await?;
    }

    if state.config.release_table_on_order_delete && order.order_type == OrderType::DineIn {
        state.assignment().release(&order.table).await?;
        state
            .users()
            .set_current_table(&order.customer, None)
            .await?;
    }

    Ok(ok(
        "Order deleted successfully",
        DeletedOrderBody {
            deleted_order: order,
        },
    ))
}
