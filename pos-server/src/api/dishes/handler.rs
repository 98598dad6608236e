//! Dish API Handlers
//!
//! Menu management. Creation arrives as a multipart form (the dish
//! image rides along); updates are JSON patches with every field
//! optional.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::models::{Dish, DishCreate, DishStatus, DishUpdate, split_ingredients};
use crate::utils::{ApiResponse, AppError, AppResult, MissingFields, ok};

#[derive(Serialize)]
pub struct DishBody {
    pub dish: Dish,
}

#[derive(Serialize)]
pub struct DishesBody {
    pub dishes: Vec<Dish>,
}

/// POST /api/v1/dish/ - add a dish to the menu
pub async fn create(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<DishBody>>)> {
    let mut name = None;
    let mut dish_type = None;
    let mut category = None;
    let mut price = None;
    let mut status = None;
    let mut spice_level = None;
    let mut preparation_time = None;
    let mut ingredients = None;
    let mut calories = None;
    let mut chefs_note = None;
    let mut dish_image: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => name = Some(field.text().await?),
            "type" => dish_type = Some(field.text().await?),
            "category" => category = Some(field.text().await?),
            "price" => price = Some(field.text().await?),
            "status" => status = Some(field.text().await?),
            "spice_level" => spice_level = Some(field.text().await?),
            "preparation_time" => preparation_time = Some(field.text().await?),
            "ingredients" => ingredients = Some(field.text().await?),
            "calories" => calories = Some(field.text().await?),
            "chefs_note" => chefs_note = Some(field.text().await?),
            "dishImage" => dish_image = Some(field.bytes().await?.to_vec()),
            _ => {}
        }
    }

    let mut missing = MissingFields::new();
    missing.check("name", &name);
    missing.check("price", &price);
    missing.check("type", &dish_type);
    missing.check("category", &category);
    missing.into_result()?;

    let price: f64 = price
        .unwrap_or_default()
        .trim()
        .parse()
        .map_err(|_| AppError::validation("Invalid price"))?;
    let calories: Option<i32> = match calories {
        Some(raw) => Some(
            raw.trim()
                .parse()
                .map_err(|_| AppError::validation(format!("Invalid calories: {}", raw)))?,
        ),
        None => None,
    };

    let dish_type = dish_type
        .unwrap_or_default()
        .parse()
        .map_err(AppError::validation)?;
    let category = category
        .unwrap_or_default()
        .parse()
        .map_err(AppError::validation)?;
    let status = match status {
        Some(raw) => raw.parse().map_err(AppError::validation)?,
        None => DishStatus::Available,
    };
    let spice_level = spice_level
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(AppError::validation)?;

    // Media is best-effort: a failed upload leaves the URL empty
    let image = state.media.store_or_empty(dish_image.as_deref());

    let dish = state
        .dishes()
        .create(DishCreate {
            name: name.unwrap_or_default().trim().to_lowercase(),
            dish_type,
            category,
            price,
            status,
            dish_image: image.url,
            spice_level,
            preparation_time,
            ingredients: ingredients.as_deref().map(split_ingredients).unwrap_or_default(),
            calories,
            chefs_note,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        ok("Dish created successfully", DishBody { dish }),
    ))
}

/// GET /api/v1/dish/ - full menu
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<DishesBody>>> {
    let dishes = state.dishes().find_all().await?;
    Ok(ok("Dishes found", DishesBody { dishes }))
}

/// GET /api/v1/dish/{id} - fetch one dish
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DishBody>>> {
    let dish = state
        .dishes()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Dish not found"))?;
    Ok(ok("Dish found", DishBody { dish }))
}

/// PATCH /api/v1/dish/{id} - update a dish
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<DishUpdate>,
) -> AppResult<Json<ApiResponse<DishBody>>> {
    let patch = req.into_patch().map_err(AppError::validation)?;
    let dish = state.dishes().update(&id, patch).await?;
    Ok(ok("Dish updated successfully", DishBody { dish }))
}
