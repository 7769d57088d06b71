use serde_json::json;

use catering_api::models::bookings::{BookingRequest, PricingFlow};
use catering_api::services::pricing_service::{PriceInput, PricingService, GST_RATE, STAFF_UNIT_COST};

fn payload(pricing: serde_json::Value) -> serde_json::Value {
    json!({
        "pricing": pricing,
        "event_type": "Wedding",
        "event_date": "2026-11-14",
        "guest_count": 120,
        "veg_count": 80,
        "non_veg_count": 40,
        "venue_address": "Jubilee Hills, Hyderabad",
        "serving_style": "Buffet",
        "delivery_type": "Delivery & Setup",
        "diet_preference": "MIXED",
        "spice_level": "Medium",
        "time_slot": "Dinner",
        "payment_plan": "Full",
        "customer_name": "Test Customer",
        "customer_email": "test.booking@example.com",
        "customer_phone": "9999999999",
        "menu_item_ids": ["507f1f77bcf86cd799439021", "507f1f77bcf86cd799439022"]
    })
}

#[test]
fn test_package_flow_payload_parses() {
    let value = payload(json!({
        "flow": "package",
        "package_id": "507f1f77bcf86cd799439031",
        "price_per_person": 250
    }));

    let request: BookingRequest = serde_json::from_value(value).expect("payload should parse");
    match request.pricing {
        PricingFlow::Package {
            package_id,
            price_per_person,
        } => {
            assert_eq!(package_id, "507f1f77bcf86cd799439031");
            assert_eq!(price_per_person, Some(250));
        }
        PricingFlow::Custom => panic!("expected package flow"),
    }
    // Unsent optional charges default to zero
    assert_eq!(request.delivery_charge, 0);
    assert_eq!(request.staff_count, 0);
}

#[test]
fn test_custom_flow_payload_parses() {
    let value = payload(json!({"flow": "custom"}));

    let request: BookingRequest = serde_json::from_value(value).expect("payload should parse");
    assert!(matches!(request.pricing, PricingFlow::Custom));
    assert_eq!(request.menu_item_ids.len(), 2);
}

#[test]
fn test_untagged_pricing_is_rejected() {
    // The duck-typed body of old clients must not slip through
    let value = payload(json!({"package_id": "507f1f77bcf86cd799439031"}));
    assert!(serde_json::from_value::<BookingRequest>(value).is_err());
}

#[test]
fn test_breakdown_serializes_every_line_item() {
    let breakdown = PricingService::compose_price(&PriceInput {
        price_per_person: 200,
        guest_count: 100,
        addon_cost: 0,
        delivery_charge: 0,
        staff_count: 0,
        staff_unit_cost: STAFF_UNIT_COST,
        discount: 0,
        tax_rate: GST_RATE,
    });

    let value = serde_json::to_value(&breakdown).unwrap();
    // Zero components stay present so the front-end decides what to show
    for key in [
        "base_food_cost",
        "packing_cost",
        "addon_cost",
        "delivery_charge",
        "staff_cost",
        "subtotal",
        "discount",
        "gst",
        "total",
    ] {
        assert!(value.get(key).is_some(), "missing line item {}", key);
    }
    assert_eq!(value["total"], 23100);
}
