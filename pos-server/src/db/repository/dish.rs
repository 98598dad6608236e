//! Dish Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Dish, DishCreate, DishPatch};
use crate::utils::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const TABLE: &str = "dish";

#[derive(Clone)]
pub struct DishRepository {
    base: BaseRepository,
}

impl DishRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all dishes
    pub async fn find_all(&self) -> RepoResult<Vec<Dish>> {
        let dishes: Vec<Dish> = self
            .base
            .db()
            .query("SELECT * FROM dish ORDER BY name")
            .await?
            .take(0)?;
        Ok(dishes)
    }

    /// Find dish by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Dish>> {
        let record = parse_id(id, TABLE)?;
        let dish: Option<Dish> = self.base.db().select(record).await?;
        Ok(dish)
    }

    /// Create a new dish (name already lower-cased by the handler)
    pub async fn create(&self, data: DishCreate) -> RepoResult<Dish> {
        let now = now_millis();
        let label = format!("Dish '{}'", data.name);
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE dish SET
                    name = $name,
                    type = $dish_type,
                    category = $category,
                    price = $price,
                    status = $status,
                    dish_image = $dish_image,
                    spice_level = $spice_level,
                    preparation_time = $preparation_time,
                    ingredients = $ingredients,
                    calories = $calories,
                    chefs_note = $chefs_note,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("dish_type", data.dish_type))
            .bind(("category", data.category))
            .bind(("price", data.price))
            .bind(("status", data.status))
            .bind(("dish_image", data.dish_image))
            .bind(("spice_level", data.spice_level))
            .bind(("preparation_time", data.preparation_time))
            .bind(("ingredients", data.ingredients))
            .bind(("calories", data.calories))
            .bind(("chefs_note", data.chefs_note))
            .bind(("now", now))
            .await
            .map_err(|e| RepoError::from_write(e, &label))?;

        let created: Option<Dish> = result
            .take(0)
            .map_err(|e| RepoError::from_write(e, &label))?;
        created.ok_or_else(|| RepoError::Database("Failed to create dish".to_string()))
    }

    /// Update a dish from a typed patch.
    ///
    /// Merges in Rust and writes every field back; a renamed dish that
    /// collides with an existing name is rejected by the unique index.
    pub async fn update(&self, id: &str, patch: DishPatch) -> RepoResult<Dish> {
        let record = parse_id(id, TABLE)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Dish {} not found", id)))?;

        let name = patch.name.unwrap_or(existing.name);
        let label = format!("Dish '{}'", name);
        let dish_type = patch.dish_type.unwrap_or(existing.dish_type);
        let category = patch.category.unwrap_or(existing.category);
        let price = patch.price.unwrap_or(existing.price);
        let status = patch.status.unwrap_or(existing.status);
        let spice_level = patch.spice_level.or(existing.spice_level);
        let preparation_time = patch.preparation_time.or(existing.preparation_time);
        let ingredients = patch.ingredients.unwrap_or(existing.ingredients);
        let calories = patch.calories.or(existing.calories);
        let chefs_note = patch.chefs_note.or(existing.chefs_note);
        let dish_image = patch.dish_image.unwrap_or(existing.dish_image);

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name,
                    type = $dish_type,
                    category = $category,
                    price = $price,
                    status = $status,
                    dish_image = $dish_image,
                    spice_level = $spice_level,
                    preparation_time = $preparation_time,
                    ingredients = $ingredients,
                    calories = $calories,
                    chefs_note = $chefs_note,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", record))
            .bind(("name", name))
            .bind(("dish_type", dish_type))
            .bind(("category", category))
            .bind(("price", price))
            .bind(("status", status))
            .bind(("dish_image", dish_image))
            .bind(("spice_level", spice_level))
            .bind(("preparation_time", preparation_time))
            .bind(("ingredients", ingredients))
            .bind(("calories", calories))
            .bind(("chefs_note", chefs_note))
            .bind(("now", now_millis()))
            .await
            .map_err(|e| RepoError::from_write(e, &label))?;

        let updated: Option<Dish> = result
            .take(0)
            .map_err(|e| RepoError::from_write(e, &label))?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Dish {} not found", id)))
    }
}
