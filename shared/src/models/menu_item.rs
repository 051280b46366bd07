//! Menu Item Model

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MAX_SPICE_LEVEL: i64 = 5;

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub is_vegetarian: bool,
    pub is_vegan: bool,
    pub is_gluten_free: bool,
    /// 0..=5
    pub spice_level: i64,
    pub calories: Option<i64>,
    /// Minutes
    pub prep_time: i64,
    pub category: String,
    pub sort_order: i64,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub customization_options: Value,
    pub created_at: i64,
    pub updated_at: i64,
    /// Soft delete marker
    #[serde(skip)]
    pub deleted_at: Option<i64>,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_gluten_free: bool,
    #[serde(default)]
    pub spice_level: i64,
    pub calories: Option<i64>,
    #[serde(default = "default_prep_time")]
    pub prep_time: i64,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub customization_options: Value,
}

fn default_true() -> bool {
    true
}

fn default_prep_time() -> i64 {
    15
}

fn default_category() -> String {
    "mains".to_string()
}

/// Update menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
    pub is_vegetarian: Option<bool>,
    pub is_vegan: Option<bool>,
    pub is_gluten_free: Option<bool>,
    pub spice_level: Option<i64>,
    pub calories: Option<i64>,
    pub prep_time: Option<i64>,
    pub category: Option<String>,
    pub sort_order: Option<i64>,
    pub customization_options: Option<Value>,
}

impl MenuItemUpdate {
    /// Merge the supplied fields into `item`
    pub fn apply(self, item: &mut MenuItem) {
        let MenuItemUpdate {
            name,
            description,
            price,
            image_url,
            is_available,
            is_vegetarian,
            is_vegan,
            is_gluten_free,
            spice_level,
            calories,
            prep_time,
            category,
            sort_order,
            customization_options,
        } = self;

        if let Some(v) = name {
            item.name = v;
        }
        if let Some(v) = description {
            item.description = Some(v);
        }
        if let Some(v) = price {
            item.price = v;
        }
        if let Some(v) = image_url {
            item.image_url = Some(v);
        }
        if let Some(v) = is_available {
            item.is_available = v;
        }
        if let Some(v) = is_vegetarian {
            item.is_vegetarian = v;
        }
        if let Some(v) = is_vegan {
            item.is_vegan = v;
        }
        if let Some(v) = is_gluten_free {
            item.is_gluten_free = v;
        }
        if let Some(v) = spice_level {
            item.spice_level = v;
        }
        if let Some(v) = calories {
            item.calories = Some(v);
        }
        if let Some(v) = prep_time {
            item.prep_time = v;
        }
        if let Some(v) = category {
            item.category = v;
        }
        if let Some(v) = sort_order {
            item.sort_order = v;
        }
        if let Some(v) = customization_options {
            item.customization_options = v;
        }
    }
}
