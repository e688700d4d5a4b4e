//! Product Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type ProductId = RecordId;

/// Product model
///
/// `quantity` 永不为负，只有库存服务的条件更新可以扣减。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<ProductId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Image URL returned by the upload endpoint (empty if none)
    #[serde(default)]
    pub image: String,
    pub price: f64,
    #[serde(default)]
    pub quantity: i64,
    pub brand: String,
    /// Percentage in [0, 100]
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    pub brand: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub quantity: Option<i64>,
    pub discount_percentage: Option<f64>,
}

/// Update product payload (partial)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
}

impl ProductUpdate {
    /// True when no field is set (nothing to write)
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.brand.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.quantity.is_none()
            && self.discount_percentage.is_none()
    }
}
