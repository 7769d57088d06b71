use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    Flat,
    Percentage,
}

/// Discount code. `code` is stored upper-cased; lookups upper-case the input.
/// `used_count` is only ever bumped inside the booking transaction.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Coupon {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub code: String,
    pub discount_type: DiscountType,
    /// Rupees for FLAT, percentage points for PERCENTAGE.
    pub value: i64,
    pub min_order_value: i64,
    pub expiry_date: Option<DateTime>,
    pub usage_limit: Option<i64>,
    pub used_count: i64,
    pub active: bool,
    pub created_at: Option<DateTime>,
}
