use actix_web::{web, HttpResponse, Responder};
use bson::doc;
use futures::TryStreamExt;
use mongodb::{bson::oid::ObjectId, Client};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::mongo::DATABASE;
use crate::models::catalog::{Category, MenuItem, MenuPackage};
use crate::services::pricing_service::PricingService;
use crate::services::selection_service::{SelectionDraft, SelectionService};

/*
    /api/catalog/categories
*/
pub async fn get_categories(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Category> =
        client.database(DATABASE).collection("Categories");

    let cursor = collection
        .find(doc! { "active": true })
        .sort(doc! { "sort_order": 1 })
        .await;

    match cursor {
        Ok(cursor) => match cursor.try_collect::<Vec<Category>>().await {
            Ok(categories) => HttpResponse::Ok().json(categories),
            Err(err) => {
                eprintln!("Failed to collect categories: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to retrieve categories")
            }
        },
        Err(err) => {
            eprintln!("Failed to retrieve categories: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve categories")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MenuItemQuery {
    pub category_id: Option<String>,
    pub style: Option<String>,
    pub item_type: Option<String>,
}

/*
    /api/catalog/items?category_id=&style=&item_type=
*/
pub async fn get_menu_items(
    data: web::Data<Arc<Client>>,
    query: web::Query<MenuItemQuery>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<MenuItem> =
        client.database(DATABASE).collection("MenuItems");

    let mut filter = doc! { "active": true };

    if let Some(category_id) = &query.category_id {
        match ObjectId::parse_str(category_id) {
            Ok(id) => {
                filter.insert("category_id", id);
            }
            Err(_) => return HttpResponse::BadRequest().body("Invalid category ID"),
        }
    }
    if let Some(style) = &query.style {
        filter.insert("style", style.to_uppercase());
    }
    if let Some(item_type) = &query.item_type {
        filter.insert("item_type", item_type.to_uppercase());
    }

    match collection.find(filter).await {
        Ok(cursor) => match cursor.try_collect::<Vec<MenuItem>>().await {
            Ok(items) => HttpResponse::Ok().json(items),
            Err(err) => {
                eprintln!("Failed to collect menu items: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to retrieve menu items")
            }
        },
        Err(err) => {
            eprintln!("Failed to retrieve menu items: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve menu items")
        }
    }
}

/*
    /api/catalog/packages
*/
pub async fn get_packages(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<MenuPackage> =
        client.database(DATABASE).collection("Packages");

    match collection.find(doc! { "active": true }).await {
        Ok(cursor) => match cursor.try_collect::<Vec<MenuPackage>>().await {
            Ok(packages) => HttpResponse::Ok().json(packages),
            Err(err) => {
                eprintln!("Failed to collect packages: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to retrieve packages")
            }
        },
        Err(err) => {
            eprintln!("Failed to retrieve packages: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve packages")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PackageQuery {
    pub guests: Option<u32>,
}

/*
    /api/catalog/packages/{id}?guests=N

    With ?guests the response carries the resolved tier alongside the
    package; a package without tiers resolves to null (a valid business
    state, not an error).
*/
pub async fn get_package_by_id(
    path: web::Path<String>,
    query: web::Query<PackageQuery>,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<MenuPackage> =
        client.database(DATABASE).collection("Packages");

    let id: ObjectId = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };

    match collection.find_one(doc! { "_id": id }).await {
        Ok(Some(package)) => match query.guests {
            Some(guests) => {
                let resolved = PricingService::resolve_tier(&package.pricing_tiers, guests);
                HttpResponse::Ok().json(serde_json::json!({
                    "package": &package,
                    "resolved_tier": resolved,
                }))
            }
            None => HttpResponse::Ok().json(package),
        },
        Ok(None) => HttpResponse::NotFound().body("Package not found"),
        Err(err) => {
            eprintln!("Failed to retrieve package: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve package")
        }
    }
}

/*
    /api/catalog/packages/{id}/validate-selection

    Violations are data for the wizard to surface, so the report always
    comes back 200.
*/
pub async fn validate_selection(
    path: web::Path<String>,
    input: web::Json<SelectionDraft>,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<MenuPackage> =
        client.database(DATABASE).collection("Packages");

    let id: ObjectId = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };

    match collection.find_one(doc! { "_id": id }).await {
        Ok(Some(package)) => {
            let report =
                SelectionService::validate_selection(&package.category_rules, &input.into_inner());
            HttpResponse::Ok().json(report)
        }
        Ok(None) => HttpResponse::NotFound().body("Package not found"),
        Err(err) => {
            eprintln!("Failed to retrieve package: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve package")
        }
    }
}
