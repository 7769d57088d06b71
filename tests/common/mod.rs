use actix_cors::Cors;
use actix_web::dev::Service;
use actix_web::{middleware::Logger, web, App, HttpResponse, Responder};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::sync::Arc;

use catering_api::db::mongo::create_mongo_client;
use catering_api::middleware::auth::{AuthMiddleware, Claims};
use catering_api::middleware::role_auth::RequireRole;
use catering_api::models::account::UserRole;

pub const TEST_JWT_SECRET: &str = "default_secret";

pub struct TestApp {
    pub client: Arc<mongodb::Client>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mongo_uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let client = create_mongo_client(&mongo_uri).await;

        Self { client }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.client.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            // call_service panics on service-level errors; render them into
            // responses here the way the real HTTP server would.
            .wrap_fn(|req, srv| {
                let fut = srv.call(req);
                async move {
                    match fut.await {
                        Ok(res) => Ok(res.map_into_boxed_body()),
                        // The original request was consumed by the failed call;
                        // a placeholder carries the status/body the server
                        // would have sent.
                        Err(err) => Ok(actix_web::dev::ServiceResponse::new(
                            actix_web::test::TestRequest::default().to_http_request(),
                            actix_web::HttpResponse::from_error(err),
                        )),
                    }
                }
            })
            .route("/", web::get().to(|| async { "Catering API is running" }))
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/catalog")
                            .route("/categories", web::get().to(get_categories))
                            .route("/items", web::get().to(get_menu_items))
                            .route("/packages", web::get().to(get_packages))
                            .route("/packages/{id}", web::get().to(not_found))
                            .route("/packages/{id}/validate-selection", web::post().to(not_found)),
                    )
                    .service(
                        web::scope("/coupons")
                            .route("/validate", web::post().to(validate_coupon_miss)),
                    )
                    .service(
                        web::scope("/bookings")
                            .route("", web::post().to(bad_request))
                            // Real middleware so auth failures are the genuine article
                            .service(
                                web::scope("")
                                    .wrap(AuthMiddleware)
                                    .route("/{id}/cancel", web::patch().to(cancel_ok)),
                            ),
                    )
                    .service(
                        web::scope("/account")
                            .wrap(AuthMiddleware)
                            .route("/{user_id}/bookings", web::get().to(empty_list))
                            .route("/{user_id}/bookings/{booking_id}", web::get().to(not_found)),
                    )
                    .service(
                        web::scope("/admin")
                            .wrap(RequireRole::new(UserRole::Admin))
                            .wrap(AuthMiddleware)
                            .route("/bookings/{id}/status", web::patch().to(status_updated)),
                    ),
            )
    }
}

// Mock handler functions for testing
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"status": "OK"}))
}

async fn get_categories() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!([]))
}

async fn get_menu_items() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!([]))
}

async fn get_packages() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!([]))
}

async fn validate_coupon_miss() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "valid": false,
        "message": "Invalid or expired coupon"
    }))
}

async fn cancel_ok() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"status": "CANCELLED"}))
}

async fn status_updated() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"status": "CONFIRMED"}))
}

async fn empty_list() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!([]))
}

async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(serde_json::json!({"error": "Not found"}))
}

async fn bad_request() -> impl Responder {
    HttpResponse::BadRequest().json(serde_json::json!({"error": "Bad request"}))
}

pub fn get_test_user_id() -> String {
    "507f1f77bcf86cd799439011".to_string()
}

/// Mint a token the real AuthMiddleware accepts (HS256 with the fallback
/// secret used when JWT_SECRET is unset).
pub fn make_token(user_id: &str, role: Option<&str>) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: "test@example.com".to_string(),
        iat: now.timestamp() as usize,
        exp: (now + ChronoDuration::hours(1)).timestamp() as usize,
        user_id: user_id.to_string(),
        role: role.map(String::from),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode test token");

    format!("Bearer {}", token)
}

pub async fn cleanup_test_data(client: &mongodb::Client) {
    let db = client.database("Catering");

    let collections = ["Bookings", "Coupons", "MenuItems", "Packages"];
    for collection_name in collections {
        let collection = db.collection::<mongodb::bson::Document>(collection_name);
        let _ = collection
            .delete_many(mongodb::bson::doc! {
                "$or": [
                    {"customer_email": {"$regex": "test.*@example.com"}},
                    {"code": {"$regex": "^TESTCOUPON"}},
                    {"name": {"$regex": "^Test "}},
                ]
            })
            .await;
    }
}
