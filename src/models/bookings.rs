use chrono::NaiveDate;
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

/// Snapshot of an ordered item taken inside the booking transaction.
/// `price` is what was actually charged; later catalog edits never touch it.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingMenuItem {
    pub menu_item_id: ObjectId,
    pub name: String,
    pub price: i64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: Option<ObjectId>,
    pub package_id: Option<ObjectId>,
    pub booking_ref: String,
    pub event_type: String,
    pub event_date: NaiveDate,
    pub guest_count: u32,
    pub veg_count: u32,
    pub non_veg_count: u32,
    pub venue_address: String,
    pub serving_style: String,
    pub delivery_type: String,
    pub delivery_charge: i64,
    pub staff_count: u32,
    pub staff_charge: i64,
    pub addon_charge: i64,
    pub diet_preference: String,
    pub spice_level: String,
    pub time_slot: String,
    pub payment_plan: String,
    pub special_instructions: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub coupon_id: Option<ObjectId>,
    pub menu_items: Vec<BookingMenuItem>,
    pub base_total: i64,
    pub discount: i64,
    pub gst: i64,
    pub total: i64,
    pub status: BookingStatus,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

/// Which of the two booking flows priced this submission.
/// Preset packages carry an explicit (or tier-resolved) per-person price;
/// the custom builder sums the live prices of the picked items instead.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "flow", rename_all = "snake_case")]
pub enum PricingFlow {
    Package {
        package_id: String,
        price_per_person: Option<i64>,
    },
    Custom,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingRequest {
    pub pricing: PricingFlow,
    pub event_type: String,
    pub event_date: NaiveDate,
    pub guest_count: u32,
    #[serde(default)]
    pub veg_count: u32,
    #[serde(default)]
    pub non_veg_count: u32,
    pub venue_address: String,
    pub serving_style: String,
    pub delivery_type: String,
    #[serde(default)]
    pub delivery_charge: i64,
    #[serde(default)]
    pub staff_count: u32,
    #[serde(default)]
    pub addon_charge: i64,
    pub diet_preference: String,
    pub spice_level: String,
    pub time_slot: String,
    pub payment_plan: String,
    pub special_instructions: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub coupon_code: Option<String>,
    pub menu_item_ids: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BookingStatusUpdate {
    pub status: BookingStatus,
}
