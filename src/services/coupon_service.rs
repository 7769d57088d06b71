use std::sync::OnceLock;

use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::Client;
use regex::Regex;
use serde::Serialize;

use crate::db::mongo::DATABASE;
use crate::models::coupon::{Coupon, DiscountType};
use crate::services::pricing_service::PricingService;

// Compiled once; resolution sits on the booking hot path
fn code_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| Regex::new(r"^[A-Z0-9]{3,20}$").unwrap())
}

/// Result of checking a coupon that exists. A code that resolves to no
/// document at all is reported separately (None from `resolve_coupon`) so
/// the booking flow can treat it as a silent no-discount.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CouponOutcome {
    Valid { coupon_id: ObjectId, discount: i64 },
    Rejected { reason: String },
}

pub struct CouponService;

impl CouponService {
    /// Ordered short-circuit checks; the first failing check wins and its
    /// reason is what the customer sees. Checking never touches
    /// `used_count` -- that only moves inside the booking transaction.
    pub fn check_coupon(coupon: &Coupon, order_value: i64, now: DateTime) -> CouponOutcome {
        if !coupon.active {
            return CouponOutcome::Rejected {
                reason: "Invalid or expired coupon".to_string(),
            };
        }

        if let Some(expiry) = coupon.expiry_date {
            if now > expiry {
                return CouponOutcome::Rejected {
                    reason: "Coupon has expired".to_string(),
                };
            }
        }

        if let Some(limit) = coupon.usage_limit {
            if coupon.used_count >= limit {
                return CouponOutcome::Rejected {
                    reason: "Coupon usage limit reached".to_string(),
                };
            }
        }

        if coupon.min_order_value > order_value {
            return CouponOutcome::Rejected {
                reason: format!("Minimum order ₹{} required", coupon.min_order_value),
            };
        }

        let discount = match coupon.discount_type {
            DiscountType::Flat => coupon.value,
            // Deliberately uncapped against order_value; the composer clamps
            // the post-discount subtotal at zero
            DiscountType::Percentage => {
                PricingService::round_half_up(order_value as f64 * coupon.value as f64 / 100.0)
            }
        };

        CouponOutcome::Valid {
            coupon_id: coupon.id.unwrap_or_default(),
            discount,
        }
    }

    /// Case-insensitive lookup (codes are stored upper-cased) followed by
    /// `check_coupon`. Ok(None) means no such code.
    pub async fn resolve_coupon(
        client: &Client,
        code: &str,
        order_value: i64,
    ) -> Result<Option<CouponOutcome>, mongodb::error::Error> {
        let normalized = code.trim().to_uppercase();

        if !code_shape().is_match(&normalized) {
            return Ok(None);
        }

        let collection: mongodb::Collection<Coupon> =
            client.database(DATABASE).collection("Coupons");

        match collection.find_one(doc! { "code": &normalized }).await? {
            Some(coupon) => Ok(Some(Self::check_coupon(
                &coupon,
                order_value,
                DateTime::now(),
            ))),
            None => Ok(None),
        }
    }
}
