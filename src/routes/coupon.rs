use actix_web::{web, HttpResponse, Responder};
use mongodb::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::services::coupon_service::{CouponOutcome, CouponService};

#[derive(Debug, Deserialize)]
pub struct CouponValidateInput {
    pub code: String,
    pub order_value: i64,
}

/*
    /api/coupons/validate

    An invalid coupon is a normal answer, not an error, so the route only
    ever hard-fails on a database problem.
*/
pub async fn validate(
    data: web::Data<Arc<Client>>,
    input: web::Json<CouponValidateInput>,
) -> impl Responder {
    let client = data.into_inner();
    let input = input.into_inner();

    match CouponService::resolve_coupon(&client, &input.code, input.order_value).await {
        Ok(Some(CouponOutcome::Valid {
            coupon_id,
            discount,
        })) => HttpResponse::Ok().json(json!({
            "valid": true,
            "coupon_id": coupon_id.to_hex(),
            "discount": discount,
            "message": "Coupon applied",
        })),
        Ok(Some(CouponOutcome::Rejected { reason })) => HttpResponse::Ok().json(json!({
            "valid": false,
            "message": reason,
        })),
        Ok(None) => HttpResponse::Ok().json(json!({
            "valid": false,
            "message": "Invalid or expired coupon",
        })),
        Err(err) => {
            eprintln!("Failed to validate coupon: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to validate coupon")
        }
    }
}
