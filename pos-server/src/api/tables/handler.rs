//! Dining Table API Handlers

use axum::{
    Json,
    extract::State,
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{DiningTable, DiningTableCreate};
use crate::services::TableView;
use crate::utils::{ApiResponse, AppError, AppResult, MissingFields, ok};

#[derive(Deserialize)]
pub struct TableCreateRequest {
    pub name: Option<String>,
    pub capacity: Option<i32>,
}

#[derive(Serialize)]
pub struct TableBody {
    pub table: DiningTable,
}

#[derive(Serialize)]
pub struct TablesBody {
    pub tables: Vec<TableView>,
}

/// POST /api/v1/table/ - create a table
pub async fn create(
    State(state): State<ServerState>,
    Json(req): Json<TableCreateRequest>,
) -> AppResult<Json<ApiResponse<TableBody>>> {
    let mut missing = MissingFields::new();
    missing.check("name", &req.name);
    missing.check_that("capacity", req.capacity.is_some());
    missing.into_result()?;

    let capacity = req.capacity.unwrap_or_default();
    if capacity <= 0 {
        return Err(AppError::validation("Capacity must be positive"));
    }

    let table = state
        .tables()
        .create(DiningTableCreate {
            name: req.name.unwrap_or_default(),
            capacity,
        })
        .await?;

    Ok(ok("Table created successfully", TableBody { table }))
}

/// GET /api/v1/table/ - floor dashboard
///
/// Every table plus its current customer and their active order.
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<TablesBody>>> {
    let tables = state.dashboard().list_with_active_order().await?;

    if tables.is_empty() {
        return Err(AppError::not_found("No tables found"));
    }

    Ok(ok("All tables", TablesBody { tables }))
}
