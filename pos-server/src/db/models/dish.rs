//! Dish Model
//!
//! Menu entries. Names are stored lower-cased and are unique; the enum
//! attributes are normalized to upper case on the way in.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Meal slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DishType {
    Starter,
    Breakfast,
    Lunch,
    Dinner,
    Dessert,
}

impl std::str::FromStr for DishType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STARTER" => Ok(Self::Starter),
            "BREAKFAST" => Ok(Self::Breakfast),
            "LUNCH" => Ok(Self::Lunch),
            "DINNER" => Ok(Self::Dinner),
            "DESSERT" => Ok(Self::Dessert),
            other => Err(format!("Invalid dish type: {}", other)),
        }
    }
}

/// Dietary category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DishCategory {
    #[serde(rename = "VEGETARIAN")]
    Vegetarian,
    #[serde(rename = "NON-VEGETARIAN")]
    NonVegetarian,
    #[serde(rename = "VEGAN")]
    Vegan,
}

impl std::str::FromStr for DishCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "VEGETARIAN" => Ok(Self::Vegetarian),
            "NON-VEGETARIAN" => Ok(Self::NonVegetarian),
            "VEGAN" => Ok(Self::Vegan),
            other => Err(format!("Invalid dish category: {}", other)),
        }
    }
}

/// Availability on the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DishStatus {
    Available,
    Unavailable,
}

impl Default for DishStatus {
    fn default() -> Self {
        Self::Available
    }
}

impl std::str::FromStr for DishStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AVAILABLE" => Ok(Self::Available),
            "UNAVAILABLE" => Ok(Self::Unavailable),
            other => Err(format!("Invalid dish status: {}", other)),
        }
    }
}

/// Spice level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SpiceLevel {
    High,
    Medium,
    Low,
}

impl std::str::FromStr for SpiceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "HIGH" => Ok(Self::High),
            "MEDIUM" => Ok(Self::Medium),
            "LOW" => Ok(Self::Low),
            other => Err(format!("Invalid spice level: {}", other)),
        }
    }
}

/// Dish entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dish {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Stored lower-cased, unique across the menu
    pub name: String,
    #[serde(rename = "type")]
    pub dish_type: DishType,
    pub category: DishCategory,
    pub price: f64,
    #[serde(default)]
    pub status: DishStatus,
    #[serde(default)]
    pub dish_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spice_level: Option<SpiceLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparation_time: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chefs_note: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Create dish payload (already normalized by the handler)
#[derive(Debug, Clone)]
pub struct DishCreate {
    pub name: String,
    pub dish_type: DishType,
    pub category: DishCategory,
    pub price: f64,
    pub status: DishStatus,
    pub dish_image: String,
    pub spice_level: Option<SpiceLevel>,
    pub preparation_time: Option<String>,
    pub ingredients: Vec<String>,
    pub calories: Option<i32>,
    pub chefs_note: Option<String>,
}

/// Update dish request (wire form)
///
/// Every field is optional and independently normalized; enum values are
/// accepted in any case.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DishUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub dish_type: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub status: Option<String>,
    pub spice_level: Option<String>,
    pub preparation_time: Option<String>,
    /// Comma-separated list, split on normalization
    pub ingredients: Option<String>,
    pub calories: Option<i32>,
    pub chefs_note: Option<String>,
    pub dish_image: Option<String>,
}

/// Normalized, typed dish patch applied by the repository
#[derive(Debug, Clone, Default)]
pub struct DishPatch {
    pub name: Option<String>,
    pub dish_type: Option<DishType>,
    pub category: Option<DishCategory>,
    pub price: Option<f64>,
    pub status: Option<DishStatus>,
    pub spice_level: Option<SpiceLevel>,
    pub preparation_time: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub calories: Option<i32>,
    pub chefs_note: Option<String>,
    pub dish_image: Option<String>,
}

impl DishUpdate {
    /// Validate and normalize each provided field.
    pub fn into_patch(self) -> Result<DishPatch, String> {
        Ok(DishPatch {
            name: self.name.map(|n| n.trim().to_lowercase()),
            dish_type: self.dish_type.as_deref().map(str::parse).transpose()?,
            category: self.category.as_deref().map(str::parse).transpose()?,
            price: self.price,
            status: self.status.as_deref().map(str::parse).transpose()?,
            spice_level: self.spice_level.as_deref().map(str::parse).transpose()?,
            preparation_time: self.preparation_time,
            ingredients: self.ingredients.map(|i| split_ingredients(&i)),
            calories: self.calories,
            chefs_note: self.chefs_note,
            dish_image: self.dish_image,
        })
    }
}

/// Split a comma-separated ingredient list, dropping empty entries.
pub fn split_ingredients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!("starter".parse::<DishType>().unwrap(), DishType::Starter);
        assert_eq!(
            "non-vegetarian".parse::<DishCategory>().unwrap(),
            DishCategory::NonVegetarian
        );
        assert_eq!("Medium".parse::<SpiceLevel>().unwrap(), SpiceLevel::Medium);
        assert!("extra-hot".parse::<SpiceLevel>().is_err());
    }

    #[test]
    fn category_wire_format_keeps_the_hyphen() {
        let json = serde_json::to_string(&DishCategory::NonVegetarian).unwrap();
        assert_eq!(json, "\"NON-VEGETARIAN\"");
    }

    #[test]
    fn update_normalizes_each_field() {
        let update = DishUpdate {
            name: Some("  Paneer Tikka ".to_string()),
            dish_type: Some("dinner".to_string()),
            ingredients: Some("paneer, yogurt , ,spices".to_string()),
            ..Default::default()
        };

        let patch = update.into_patch().unwrap();
        assert_eq!(patch.name.as_deref(), Some("paneer tikka"));
        assert_eq!(patch.dish_type, Some(DishType::Dinner));
        assert_eq!(
            patch.ingredients.unwrap(),
            vec!["paneer", "yogurt", "spices"]
        );
    }

    #[test]
    fn update_rejects_unknown_enum_values() {
        let update = DishUpdate {
            category: Some("pescatarian".to_string()),
            ..Default::default()
        };
        assert!(update.into_patch().is_err());
    }
}
