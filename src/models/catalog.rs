use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CuisineStyle {
    Andhra,
    NorthIndian,
    Mixed,
    Fusion,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DietType {
    Veg,
    NonVeg,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Category {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub sort_order: i32,
    pub active: bool,
}

/// A single dish. `price` is the per-person incremental cost in whole rupees.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MenuItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: String,
    pub category_id: ObjectId,
    pub style: CuisineStyle,
    pub item_type: DietType,
    pub price: i64,
    pub active: bool,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

/// Guest-count band embedded in a package. `max_guests` is display-only;
/// resolution goes purely by `min_guests`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PricingTier {
    pub min_guests: u32,
    pub max_guests: Option<u32>,
    pub price_per_person: i64,
}

/// How many items a guest must/may pick from one category of this package.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CategoryRule {
    pub rule_id: ObjectId,
    pub category_id: ObjectId,
    pub label: String,
    pub min_choices: u32,
    pub max_choices: u32,
    pub extra_item_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_items: Option<Vec<ObjectId>>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MenuPackage {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub event_type: String,
    pub style: CuisineStyle,
    pub package_type: DietType,
    pub serves_min: u32,
    pub base_price: i64,
    pub description: String,
    pub pricing_tiers: Vec<PricingTier>,
    pub category_rules: Vec<CategoryRule>,
    /// Pool of menu items selectable under this package.
    pub item_pool: Vec<ObjectId>,
    pub active: bool,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}
