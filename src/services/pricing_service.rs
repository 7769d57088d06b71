use serde::{Deserialize, Serialize};

use crate::models::catalog::PricingTier;

/// Flat per-head serving staff charge in rupees.
pub const STAFF_UNIT_COST: i64 = 650;
/// Packing surcharge on the food cost.
pub const PACKING_RATE: f64 = 0.10;
/// GST applied to the post-discount subtotal.
pub const GST_RATE: f64 = 0.05;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceInput {
    pub price_per_person: i64,
    pub guest_count: u32,
    pub addon_cost: i64,
    pub delivery_charge: i64,
    pub staff_count: u32,
    pub staff_unit_cost: i64,
    pub discount: i64,
    pub tax_rate: f64,
}

/// Itemized quote. Every component is present even when zero so the
/// front-end can decide what to display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub base_food_cost: i64,
    pub packing_cost: i64,
    pub addon_cost: i64,
    pub delivery_charge: i64,
    pub staff_cost: i64,
    pub subtotal: i64,
    pub discount: i64,
    pub gst: i64,
    pub total: i64,
}

pub struct PricingService;

impl PricingService {
    /// Pick the tier with the largest `min_guests` not exceeding the guest
    /// count. A guest count below every band still resolves to the lowest
    /// tier (the system always quotes some price); `max_guests` never gates
    /// resolution. Returns None only when the package carries no tiers at
    /// all, which callers surface as "no pricing available" rather than an
    /// error.
    pub fn resolve_tier(tiers: &[PricingTier], guest_count: u32) -> Option<&PricingTier> {
        let mut sorted: Vec<&PricingTier> = tiers.iter().collect();
        sorted.sort_by(|a, b| b.min_guests.cmp(&a.min_guests));

        for tier in &sorted {
            if guest_count >= tier.min_guests {
                return Some(tier);
            }
        }

        // Floor fallback: smallest band after the descending sort
        sorted.last().copied()
    }

    /// Standard half-up rounding to whole rupees. Inputs are never negative.
    pub fn round_half_up(value: f64) -> i64 {
        (value + 0.5).floor() as i64
    }

    /// Compose the itemized breakdown. Rounding happens at exactly two
    /// points, packing cost and GST, so each displayed line matches what
    /// the customer sees. The post-discount subtotal is clamped at zero;
    /// capping the discount itself is the coupon resolver's job.
    pub fn compose_price(input: &PriceInput) -> PriceBreakdown {
        let guests = input.guest_count as i64;

        let base_food_cost = input.price_per_person * guests;
        let packing_cost =
            Self::round_half_up(input.price_per_person as f64 * PACKING_RATE * guests as f64);
        let staff_cost = input.staff_count as i64 * input.staff_unit_cost;

        let subtotal =
            base_food_cost + packing_cost + input.addon_cost + input.delivery_charge + staff_cost;

        let taxed_base = (subtotal - input.discount).max(0);
        let gst = Self::round_half_up(taxed_base as f64 * input.tax_rate);
        let total = taxed_base + gst;

        PriceBreakdown {
            base_food_cost,
            packing_cost,
            addon_cost: input.addon_cost,
            delivery_charge: input.delivery_charge,
            staff_cost,
            subtotal,
            discount: input.discount,
            gst,
            total,
        }
    }
}
