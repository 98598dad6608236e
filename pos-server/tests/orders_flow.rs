//! Order lifecycle and the table dashboard
//!
//! Placement appends to the customer's history, deletion pulls it back
//! out without touching table occupancy, and the dashboard only ever
//! shows PENDING/HOLD orders.

use pos_server::db::DbService;
use pos_server::db::models::{
    DiningTableCreate, DishCategory, DishCreate, DishStatus, DishType, OrderItem, OrderStatus,
    OrderType, PaymentStatus, UserCreate,
};
use pos_server::db::repository::order::OrderCreate;
use pos_server::db::repository::{
    DiningTableRepository, DishRepository, OrderRepository, UserRepository,
};
use pos_server::services::{TableAssignment, TableDashboard};
use surrealdb::RecordId;

struct Ctx {
    tables: DiningTableRepository,
    users: UserRepository,
    dishes: DishRepository,
    orders: OrderRepository,
    assignment: TableAssignment,
    dashboard: TableDashboard,
}

async fn setup() -> Ctx {
    let db = DbService::memory().await.expect("in-memory db");
    let tables = DiningTableRepository::new(db.db.clone());
    let users = UserRepository::new(db.db.clone());
    let dishes = DishRepository::new(db.db.clone());
    let orders = OrderRepository::new(db.db.clone());
    let assignment = TableAssignment::new(tables.clone());
    let dashboard = TableDashboard::new(
        tables.clone(),
        users.clone(),
        orders.clone(),
        dishes.clone(),
    );
    Ctx {
        tables,
        users,
        dishes,
        orders,
        assignment,
        dashboard,
    }
}

async fn seed_customer(ctx: &Ctx, email: &str) -> RecordId {
    ctx.users
        .create(UserCreate {
            name: "Ana".to_string(),
            email: email.to_string(),
            contact_info: String::new(),
            hash_pass: None,
            profile_image: String::new(),
            profile_image_public_id: String::new(),
            total_person: 2,
            is_online: false,
        })
        .await
        .expect("create user")
        .id
        .expect("user id")
}

async fn seed_table(ctx: &Ctx, name: &str) -> RecordId {
    ctx.tables
        .create(DiningTableCreate {
            name: name.to_string(),
            capacity: 4,
        })
        .await
        .expect("create table")
        .id
        .expect("table id")
}

async fn seed_dish(ctx: &Ctx, name: &str, price: f64) -> RecordId {
    ctx.dishes
        .create(DishCreate {
            name: name.to_string(),
            dish_type: DishType::Dinner,
            category: DishCategory::Vegetarian,
            price,
            status: DishStatus::Available,
            dish_image: String::new(),
            spice_level: None,
            preparation_time: None,
            ingredients: vec!["paneer".to_string()],
            calories: None,
            chefs_note: None,
        })
        .await
        .expect("create dish")
        .id
        .expect("dish id")
}

async fn place_order(
    ctx: &Ctx,
    customer: &RecordId,
    table: &RecordId,
    dish: &RecordId,
    status: OrderStatus,
) -> RecordId {
    let order = ctx
        .orders
        .create(OrderCreate {
            customer: customer.clone(),
            table: table.clone(),
            items: vec![OrderItem {
                dish: dish.clone(),
                qty: 2,
                discount: 0.0,
            }],
            status,
            order_type: OrderType::DineIn,
            total_amount: 25.0,
            payment_status: PaymentStatus::Unpaid,
        })
        .await
        .expect("create order");
    let id = order.id.expect("order id");
    ctx.users.push_order(customer, &id).await.expect("history");
    id
}

#[tokio::test]
async fn placement_appends_to_order_history() {
    let ctx = setup().await;
    let customer = seed_customer(&ctx, "a@x.com").await;
    let table = seed_table(&ctx, "T1").await;
    let dish = seed_dish(&ctx, "paneer tikka", 12.5).await;

    let order_id = place_order(&ctx, &customer, &table, &dish, OrderStatus::Pending).await;

    let user = ctx
        .users
        .find_by_record(&customer)
        .await
        .expect("lookup")
        .expect("user");
    assert_eq!(user.order_history, vec![order_id]);
}

#[tokio::test]
async fn populated_order_replaces_raw_references() {
    let ctx = setup().await;
    let customer = seed_customer(&ctx, "a@x.com").await;
    let table = seed_table(&ctx, "T1").await;
    let dish = seed_dish(&ctx, "paneer tikka", 12.5).await;

    let order_id = place_order(&ctx, &customer, &table, &dish, OrderStatus::Placed).await;

    let detail = ctx
        .orders
        .find_detail(&order_id.to_string())
        .await
        .expect("detail query")
        .expect("order exists");

    let customer_info = detail.customer_info.expect("customer populated");
    assert_eq!(customer_info.name, "Ana");
    assert!(!customer_info.is_online);

    let table_info = detail.table_info.expect("table populated");
    assert_eq!(table_info.capacity, 4);

    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].dish.name, "paneer tikka");
    assert_eq!(detail.items[0].dish.price, 12.5);
    assert_eq!(detail.items[0].qty, 2);

    // The wire form carries the populated keys, not the raw references
    let json = serde_json::to_value(&detail).expect("serialize");
    assert!(json.get("customer").is_none());
    assert!(json.get("table").is_none());
    assert!(json.get("customer_info").is_some());
    assert!(json.get("table_info").is_some());
}

#[tokio::test]
async fn delete_pulls_history_but_leaves_the_table_occupied() {
    let ctx = setup().await;
    let customer = seed_customer(&ctx, "a@x.com").await;
    let table = seed_table(&ctx, "T1").await;
    let dish = seed_dish(&ctx, "paneer tikka", 12.5).await;

    ctx.assignment
        .assign(&customer, &table.to_string())
        .await
        .expect("check-in");

    let order_id = place_order(&ctx, &customer, &table, &dish, OrderStatus::Pending).await;

    let deleted = ctx
        .orders
        .delete(&order_id.to_string())
        .await
        .expect("delete")
        .expect("order existed");
    ctx.users
        .pull_order(&customer, &order_id)
        .await
        .expect("pull");

    assert_eq!(deleted.id, Some(order_id));

    let user = ctx
        .users
        .find_by_record(&customer)
        .await
        .expect("lookup")
        .expect("user");
    assert!(user.order_history.is_empty());

    // Occupancy is untouched by order deletion
    let stored_table = ctx
        .tables
        .find_by_id(&table.to_string())
        .await
        .expect("lookup")
        .expect("table");
    assert!(stored_table.is_occupied);
    assert_eq!(stored_table.current_customer, Some(customer));
}

#[tokio::test]
async fn update_item_changes_only_the_matching_line() {
    let ctx = setup().await;
    let customer = seed_customer(&ctx, "a@x.com").await;
    let table = seed_table(&ctx, "T1").await;
    let dish_a = seed_dish(&ctx, "paneer tikka", 12.5).await;
    let dish_b = seed_dish(&ctx, "dal makhani", 9.0).await;

    let order = ctx
        .orders
        .create(OrderCreate {
            customer: customer.clone(),
            table: table.clone(),
            items: vec![
                OrderItem {
                    dish: dish_a.clone(),
                    qty: 2,
                    discount: 0.0,
                },
                OrderItem {
                    dish: dish_b.clone(),
                    qty: 1,
                    discount: 0.0,
                },
            ],
            status: OrderStatus::Pending,
            order_type: OrderType::DineIn,
            total_amount: 34.0,
            payment_status: PaymentStatus::Unpaid,
        })
        .await
        .expect("create order");
    let order_id = order.id.expect("order id").to_string();

    let mut items = order.items.clone();
    items[0].qty = 5;
    items[0].discount = 2.0;
    let updated = ctx
        .orders
        .update_items(&order_id, items)
        .await
        .expect("update");

    assert_eq!(updated.items[0].qty, 5);
    assert_eq!(updated.items[0].discount, 2.0);
    assert_eq!(updated.items[1].qty, 1, "other lines stay put");
}

#[tokio::test]
async fn dashboard_shows_only_active_orders() {
    let ctx = setup().await;
    let customer = seed_customer(&ctx, "a@x.com").await;
    let table = seed_table(&ctx, "T1").await;
    let dish = seed_dish(&ctx, "paneer tikka", 12.5).await;

    ctx.assignment
        .assign(&customer, &table.to_string())
        .await
        .expect("check-in");
    ctx.users
        .set_current_table(&customer, Some(table.clone()))
        .await
        .expect("bind");

    // A completed order alone must not surface
    place_order(&ctx, &customer, &table, &dish, OrderStatus::Completed).await;

    let views = ctx
        .dashboard
        .list_with_active_order()
        .await
        .expect("dashboard");
    assert_eq!(views.len(), 1);
    let view = &views[0];
    assert!(view.is_occupied);
    let customer_view = view.current_customer.as_ref().expect("customer shown");
    assert_eq!(customer_view.total_person, 2);
    assert!(
        view.current_order_info.is_none(),
        "completed orders never populate the dashboard"
    );

    // A pending order does
    place_order(&ctx, &customer, &table, &dish, OrderStatus::Pending).await;

    let views = ctx
        .dashboard
        .list_with_active_order()
        .await
        .expect("dashboard");
    let info = views[0]
        .current_order_info
        .as_ref()
        .expect("pending order surfaces");
    assert_eq!(info.status, OrderStatus::Pending);
    assert_eq!(info.items.len(), 1);
    assert_eq!(info.items[0].dish.name, "paneer tikka");
    assert_eq!(info.items[0].qty, 2);
}

#[tokio::test]
async fn dashboard_picks_the_newest_active_order() {
    let ctx = setup().await;
    let customer = seed_customer(&ctx, "a@x.com").await;
    let table = seed_table(&ctx, "T1").await;
    let dish = seed_dish(&ctx, "paneer tikka", 12.5).await;

    ctx.assignment
        .assign(&customer, &table.to_string())
        .await
        .expect("check-in");

    let first = place_order(&ctx, &customer, &table, &dish, OrderStatus::Hold).await;
    // Later order wins the "current" slot
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = place_order(&ctx, &customer, &table, &dish, OrderStatus::Pending).await;
    assert_ne!(first, second);

    let latest = ctx
        .orders
        .find_latest_active_for_customer(&customer)
        .await
        .expect("query")
        .expect("active order");
    assert_eq!(latest.id, Some(second));
    assert_eq!(latest.status, OrderStatus::Pending);
}

#[tokio::test]
async fn canceled_orders_drop_off_the_dashboard() {
    let ctx = setup().await;
    let customer = seed_customer(&ctx, "a@x.com").await;
    let table = seed_table(&ctx, "T1").await;
    let dish = seed_dish(&ctx, "paneer tikka", 12.5).await;

    ctx.assignment
        .assign(&customer, &table.to_string())
        .await
        .expect("check-in");

    let order_id = place_order(&ctx, &customer, &table, &dish, OrderStatus::Pending).await;
    ctx.orders
        .set_status(&order_id.to_string(), OrderStatus::Canceled)
        .await
        .expect("cancel");

    let views = ctx
        .dashboard
        .list_with_active_order()
        .await
        .expect("dashboard");
    assert!(views[0].current_order_info.is_none());
}

#[tokio::test]
async fn todays_orders_are_newest_first() {
    let ctx = setup().await;
    let customer = seed_customer(&ctx, "a@x.com").await;
    let table = seed_table(&ctx, "T1").await;
    let dish = seed_dish(&ctx, "paneer tikka", 12.5).await;

    let first = place_order(&ctx, &customer, &table, &dish, OrderStatus::Pending).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = place_order(&ctx, &customer, &table, &dish, OrderStatus::Pending).await;

    let todays = ctx
        .orders
        .find_since(pos_server::utils::today_start_millis())
        .await
        .expect("query");
    assert_eq!(todays.len(), 2);
    assert_eq!(todays[0].id, Some(second));
    assert_eq!(todays[1].id, Some(first));
}
