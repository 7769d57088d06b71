use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use catering_api::models::account::UserRole;
use catering_api::{db, middleware, routes};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    let mongo_uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    let client = db::mongo::create_mongo_client(&mongo_uri).await;

    println!("Starting HTTP server...");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .route("/health", web::get().to(|| async { "OK" }))
            .app_data(web::Data::new(client.clone()))
            .service(
                web::scope("/api")
                    // Public catalog and quote routes
                    .service(
                        web::scope("/catalog")
                            .route("/categories", web::get().to(routes::catalog::get_categories))
                            .route("/items", web::get().to(routes::catalog::get_menu_items))
                            .route("/packages", web::get().to(routes::catalog::get_packages))
                            .route(
                                "/packages/{id}",
                                web::get().to(routes::catalog::get_package_by_id),
                            )
                            .route(
                                "/packages/{id}/validate-selection",
                                web::post().to(routes::catalog::validate_selection),
                            ),
                    )
                    .service(
                        web::scope("/coupons")
                            .route("/validate", web::post().to(routes::coupon::validate)),
                    )
                    .service(
                        web::scope("/bookings")
                            .route("", web::post().to(routes::bookings::create_booking))
                            // Protected routes
                            .service(
                                web::scope("")
                                    .wrap(middleware::auth::AuthMiddleware)
                                    .route(
                                        "/{id}/cancel",
                                        web::patch().to(routes::bookings::cancel_booking),
                                    ),
                            ),
                    )
                    .service(
                        web::scope("/account")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(
                                "/{user_id}/bookings",
                                web::get().to(routes::bookings::get_all_bookings),
                            )
                            .route(
                                "/{user_id}/bookings/{booking_id}",
                                web::get().to(routes::bookings::get_booking_by_id),
                            ),
                    )
                    .service(
                        web::scope("/admin")
                            .wrap(middleware::role_auth::RequireRole::new(UserRole::Admin))
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(
                                "/bookings/{id}/status",
                                web::patch().to(routes::bookings::update_booking_status),
                            ),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
