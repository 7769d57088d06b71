use actix_web::{web, HttpResponse, Responder};
use bson::doc;
use futures::TryStreamExt;
use mongodb::{bson::oid::ObjectId, Client};
use std::sync::Arc;

use crate::db::mongo::DATABASE;
use crate::middleware::auth::Claims;
use crate::models::bookings::{Booking, BookingRequest, BookingStatusUpdate};
use crate::services::booking_service::{BookingError, BookingService};

fn error_response(err: BookingError) -> HttpResponse {
    match err {
        BookingError::Validation(reason) => {
            HttpResponse::BadRequest().json(serde_json::json!({ "error": reason }))
        }
        BookingError::State(reason) => {
            HttpResponse::Conflict().json(serde_json::json!({ "error": reason }))
        }
        BookingError::NotFound(reason) => {
            HttpResponse::NotFound().json(serde_json::json!({ "error": reason }))
        }
        BookingError::Forbidden(reason) => {
            HttpResponse::Forbidden().json(serde_json::json!({ "error": reason }))
        }
        BookingError::Database(err) => {
            eprintln!("Booking database error: {:?}", err);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "error": "Failed to process booking" }))
        }
    }
}

/*
    POST /api/bookings

    Open to guests; when the request arrives through the authenticated
    surface the claims tie the booking to the user.
*/
pub async fn create_booking(
    data: web::Data<Arc<Client>>,
    input: web::Json<BookingRequest>,
    claims: Option<web::ReqData<Claims>>,
) -> impl Responder {
    let client = data.into_inner();

    let user_id = claims
        .as_ref()
        .and_then(|c| ObjectId::parse_str(&c.user_id).ok());

    match BookingService::create_booking(&client, input.into_inner(), user_id).await {
        Ok(confirmation) => HttpResponse::Created().json(confirmation),
        Err(err) => error_response(err),
    }
}

/*
    GET /api/account/{user_id}/bookings
*/
pub async fn get_all_bookings(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    claims: web::ReqData<Claims>,
) -> impl Responder {
    let client = data.into_inner();

    let user_id = path.into_inner();
    if user_id != claims.user_id {
        return HttpResponse::Forbidden().body("Forbidden");
    }

    let user_oid = match ObjectId::parse_str(&user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };

    let collection: mongodb::Collection<Booking> =
        client.database(DATABASE).collection("Bookings");

    match collection.find(doc! { "user_id": user_oid }).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Booking>>().await {
            Ok(bookings) => HttpResponse::Ok().json(bookings),
            Err(err) => {
                eprintln!("Error retrieving bookings: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to retrieve bookings")
            }
        },
        Err(err) => {
            eprintln!("Error fetching bookings: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to fetch bookings")
        }
    }
}

/*
    GET /api/account/{user_id}/bookings/{booking_id}
*/
pub async fn get_booking_by_id(
    data: web::Data<Arc<Client>>,
    path: web::Path<(String, String)>,
    claims: web::ReqData<Claims>,
) -> impl Responder {
    let client = data.into_inner();

    let (user_id, booking_id) = path.into_inner();
    if user_id != claims.user_id {
        return HttpResponse::Forbidden().body("Forbidden");
    }

    let booking_oid = match ObjectId::parse_str(&booking_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid booking ID format"),
    };
    let user_oid = match ObjectId::parse_str(&user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };

    let collection: mongodb::Collection<Booking> =
        client.database(DATABASE).collection("Bookings");

    match collection
        .find_one(doc! { "_id": booking_oid, "user_id": user_oid })
        .await
    {
        Ok(Some(booking)) => HttpResponse::Ok().json(booking),
        Ok(None) => HttpResponse::NotFound().body("Booking not found"),
        Err(err) => {
            eprintln!("Error fetching booking: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to fetch booking")
        }
    }
}

/*
    PATCH /api/bookings/{id}/cancel
*/
pub async fn cancel_booking(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    claims: web::ReqData<Claims>,
) -> impl Responder {
    let client = data.into_inner();

    let booking_id = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid booking ID format"),
    };
    let requester_id = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };

    match BookingService::cancel_booking(&client, booking_id, requester_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "CANCELLED" })),
        Err(err) => error_response(err),
    }
}

/*
    PATCH /api/admin/bookings/{id}/status
*/
pub async fn update_booking_status(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    input: web::Json<BookingStatusUpdate>,
) -> impl Responder {
    let client = data.into_inner();

    let booking_id = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid booking ID format"),
    };

    let status = input.into_inner().status;

    match BookingService::update_status(&client, booking_id, status).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": status })),
        Err(err) => error_response(err),
    }
}
