//! Restaurant Model

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_DELIVERY_FEE: f64 = 2.99;
pub const DEFAULT_DELIVERY_MINUTES: i64 = 30;

/// Restaurant entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub cuisine_type: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub street_address: String,
    pub apartment: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub cover_image_url: Option<String>,
    pub logo_url: Option<String>,
    pub is_active: bool,
    /// Informational only, not checked at checkout
    pub is_open: bool,
    pub average_rating: f64,
    pub total_reviews: i64,
    pub total_orders: i64,
    pub delivery_fee: f64,
    pub minimum_order: f64,
    /// Minutes
    pub estimated_delivery_time: i64,
    /// Free-form opening hours
    #[cfg_attr(feature = "db", sqlx(json))]
    pub business_hours: Value,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    pub description: Option<String>,
    pub cuisine_type: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub street_address: String,
    pub apartment: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub cover_image_url: Option<String>,
    pub logo_url: Option<String>,
    #[serde(default = "default_delivery_fee")]
    pub delivery_fee: f64,
    #[serde(default)]
    pub minimum_order: f64,
    #[serde(default = "default_delivery_minutes")]
    pub estimated_delivery_time: i64,
    #[serde(default)]
    pub business_hours: Value,
}

fn default_delivery_fee() -> f64 {
    DEFAULT_DELIVERY_FEE
}

fn default_delivery_minutes() -> i64 {
    DEFAULT_DELIVERY_MINUTES
}

/// Update restaurant payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cuisine_type: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub street_address: Option<String>,
    pub apartment: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub cover_image_url: Option<String>,
    pub logo_url: Option<String>,
    pub is_active: Option<bool>,
    pub is_open: Option<bool>,
    pub delivery_fee: Option<f64>,
    pub minimum_order: Option<f64>,
    pub estimated_delivery_time: Option<i64>,
    pub business_hours: Option<Value>,
}

impl RestaurantUpdate {
    /// Merge the supplied fields into `restaurant`
    pub fn apply(self, restaurant: &mut Restaurant) {
        let RestaurantUpdate {
            name,
            description,
            cuisine_type,
            phone,
            email,
            street_address,
            apartment,
            city,
            state,
            postal_code,
            latitude,
            longitude,
            cover_image_url,
            logo_url,
            is_active,
            is_open,
            delivery_fee,
            minimum_order,
            estimated_delivery_time,
            business_hours,
        } = self;

        if let Some(v) = name {
            restaurant.name = v;
        }
        if let Some(v) = description {
            restaurant.description = Some(v);
        }
        if let Some(v) = cuisine_type {
            restaurant.cuisine_type = v;
        }
        if let Some(v) = phone {
            restaurant.phone = Some(v);
        }
        if let Some(v) = email {
            restaurant.email = Some(v);
        }
        if let Some(v) = street_address {
            restaurant.street_address = v;
        }
        if let Some(v) = apartment {
            restaurant.apartment = Some(v);
        }
        if let Some(v) = city {
            restaurant.city = v;
        }
        if let Some(v) = state {
            restaurant.state = v;
        }
        if let Some(v) = postal_code {
            restaurant.postal_code = v;
        }
        if let Some(v) = latitude {
            restaurant.latitude = Some(v);
        }
        if let Some(v) = longitude {
            restaurant.longitude = Some(v);
        }
        if let Some(v) = cover_image_url {
            restaurant.cover_image_url = Some(v);
        }
        if let Some(v) = logo_url {
            restaurant.logo_url = Some(v);
        }
        if let Some(v) = is_active {
            restaurant.is_active = v;
        }
        if let Some(v) = is_open {
            restaurant.is_open = v;
        }
        if let Some(v) = delivery_fee {
            restaurant.delivery_fee = v;
        }
        if let Some(v) = minimum_order {
            restaurant.minimum_order = v;
        }
        if let Some(v) = estimated_delivery_time {
            restaurant.estimated_delivery_time = v;
        }
        if let Some(v) = business_hours {
            restaurant.business_hours = v;
        }
    }
}
