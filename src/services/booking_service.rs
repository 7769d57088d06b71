use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::Client;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::db::mongo::DATABASE;
use crate::models::bookings::{
    Booking, BookingMenuItem, BookingRequest, BookingStatus, PricingFlow,
};
use crate::models::catalog::{MenuItem, MenuPackage};
use crate::services::coupon_service::{CouponOutcome, CouponService};
use crate::services::notification_service::NotificationService;
use crate::services::pricing_service::{PriceBreakdown, PriceInput, PricingService, GST_RATE, STAFF_UNIT_COST};

/// Business floor: catering orders below this head count are not accepted.
pub const MIN_GUESTS: u32 = 10;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    State(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

#[derive(Debug, Serialize)]
pub struct BookingConfirmation {
    pub booking_id: String,
    pub booking_ref: String,
    pub total: i64,
    pub breakdown: PriceBreakdown,
}

pub struct BookingService;

impl BookingService {
    /// Validate, re-price against live catalog data, resolve the coupon and
    /// persist everything in one transaction. The confirmation email is
    /// dispatched after commit and can never roll the booking back.
    pub async fn create_booking(
        client: &Client,
        payload: BookingRequest,
        user_id: Option<ObjectId>,
    ) -> Result<BookingConfirmation, BookingError> {
        Self::validate_request(&payload)?;

        let item_ids = Self::parse_item_ids(&payload.menu_item_ids)?;

        // Authoritative re-pricing: client-supplied item prices are never
        // trusted, the live active documents are what gets charged
        let items = Self::fetch_live_items(client, &item_ids).await?;

        let (package_id, price_per_person) = match &payload.pricing {
            PricingFlow::Package {
                package_id,
                price_per_person,
            } => {
                let package_oid = ObjectId::parse_str(package_id).map_err(|_| {
                    BookingError::Validation("Invalid package ID".to_string())
                })?;
                // An explicit price skips tier resolution but never the
                // existence check; a dead package id must not be persisted
                let package = Self::fetch_live_package(client, &package_oid).await?;
                let price = match price_per_person {
                    Some(price) => *price,
                    None => {
                        match PricingService::resolve_tier(&package.pricing_tiers, payload.guest_count)
                        {
                            Some(tier) => tier.price_per_person,
                            None => {
                                return Err(BookingError::Validation(
                                    "No pricing available for this package".to_string(),
                                ))
                            }
                        }
                    }
                };
                (Some(package_oid), price)
            }
            PricingFlow::Custom => {
                let summed: i64 = items.iter().map(|item| item.price).sum();
                (None, summed)
            }
        };

        let staff_charge = payload.staff_count as i64 * STAFF_UNIT_COST;

        let mut input = PriceInput {
            price_per_person,
            guest_count: payload.guest_count,
            addon_cost: payload.addon_charge,
            delivery_charge: payload.delivery_charge,
            staff_count: payload.staff_count,
            staff_unit_cost: STAFF_UNIT_COST,
            discount: 0,
            tax_rate: GST_RATE,
        };
        let undiscounted = PricingService::compose_price(&input);

        // Coupon checks run against the pre-discount subtotal. A code that
        // simply doesn't resolve is a silent no-discount; a coupon that
        // resolves and then fails its checks is a validation error, since
        // the customer was quoted a discount that no longer applies.
        let mut coupon_id = None;
        if let Some(code) = payload.coupon_code.as_deref() {
            if !code.trim().is_empty() {
                match CouponService::resolve_coupon(client, code, undiscounted.subtotal).await? {
                    Some(CouponOutcome::Valid {
                        coupon_id: id,
                        discount,
                    }) => {
                        coupon_id = Some(id);
                        input.discount = discount;
                    }
                    Some(CouponOutcome::Rejected { reason }) => {
                        return Err(BookingError::Validation(reason));
                    }
                    None => {
                        println!("Coupon code {} did not resolve, proceeding without discount", code);
                    }
                }
            }
        }

        let breakdown = PricingService::compose_price(&input);

        let now = DateTime::now();
        let booking = Booking {
            id: None,
            user_id,
            package_id,
            booking_ref: Self::generate_booking_ref(),
            event_type: payload.event_type,
            event_date: payload.event_date,
            guest_count: payload.guest_count,
            veg_count: payload.veg_count,
            non_veg_count: payload.non_veg_count,
            venue_address: payload.venue_address,
            serving_style: payload.serving_style,
            delivery_type: payload.delivery_type,
            delivery_charge: breakdown.delivery_charge,
            staff_count: payload.staff_count,
            staff_charge,
            addon_charge: breakdown.addon_cost,
            diet_preference: payload.diet_preference,
            spice_level: payload.spice_level,
            time_slot: payload.time_slot,
            payment_plan: payload.payment_plan,
            special_instructions: payload.special_instructions,
            customer_name: payload.customer_name,
            customer_email: payload.customer_email.clone(),
            customer_phone: payload.customer_phone,
            coupon_id,
            menu_items: items
                .iter()
                .map(|item| BookingMenuItem {
                    menu_item_id: item.id.unwrap_or_default(),
                    name: item.name.clone(),
                    price: item.price,
                })
                .collect(),
            base_total: breakdown.subtotal,
            discount: breakdown.discount,
            gst: breakdown.gst,
            total: breakdown.total,
            status: BookingStatus::Pending,
            created_at: Some(now),
            updated_at: Some(now),
        };

        let booking_id = Self::persist_booking(client, &booking).await?;

        NotificationService::booking_created(
            booking.booking_ref.clone(),
            payload.customer_email,
            breakdown.total,
        );

        Ok(BookingConfirmation {
            booking_id,
            booking_ref: booking.booking_ref,
            total: breakdown.total,
            breakdown,
        })
    }

    /// Booking insert and coupon usage increment land together or not at
    /// all. The increment is filtered on `used_count < usage_limit` so two
    /// concurrent submissions cannot jointly overshoot the limit.
    async fn persist_booking(client: &Client, booking: &Booking) -> Result<String, BookingError> {
        let bookings: mongodb::Collection<Booking> =
            client.database(DATABASE).collection("Bookings");

        let mut session = client.start_session().await?;
        session.start_transaction().await?;

        let insert_result = match bookings.insert_one(booking).session(&mut session).await {
            Ok(result) => result,
            Err(err) => {
                let _ = session.abort_transaction().await;
                return Err(BookingError::Database(err));
            }
        };

        if let Some(coupon_id) = booking.coupon_id {
            let coupons: mongodb::Collection<crate::models::coupon::Coupon> =
                client.database(DATABASE).collection("Coupons");

            let guard = doc! {
                "_id": coupon_id,
                "$or": [
                    { "usage_limit": null },
                    { "$expr": { "$lt": ["$used_count", "$usage_limit"] } },
                ],
            };

            match coupons
                .update_one(guard, doc! { "$inc": { "used_count": 1 } })
                .session(&mut session)
                .await
            {
                Ok(result) if result.matched_count == 0 => {
                    // Lost the race for the last redemption
                    let _ = session.abort_transaction().await;
                    return Err(BookingError::Validation(
                        "Coupon usage limit reached".to_string(),
                    ));
                }
                Ok(_) => {}
                Err(err) => {
                    let _ = session.abort_transaction().await;
                    return Err(BookingError::Database(err));
                }
            }
        }

        session.commit_transaction().await?;

        Ok(insert_result
            .inserted_id
            .as_object_id()
            .map(|id| id.to_hex())
            .unwrap_or_default())
    }

    pub async fn cancel_booking(
        client: &Client,
        booking_id: ObjectId,
        requester_id: ObjectId,
    ) -> Result<(), BookingError> {
        let bookings: mongodb::Collection<Booking> =
            client.database(DATABASE).collection("Bookings");

        let booking = bookings
            .find_one(doc! { "_id": booking_id })
            .await?
            .ok_or_else(|| BookingError::NotFound("Booking not found".to_string()))?;

        if booking.user_id != Some(requester_id) {
            return Err(BookingError::Forbidden(
                "Bookings can only be cancelled by their owner".to_string(),
            ));
        }

        Self::check_cancellable(booking.status)?;

        // Filter on status again so a concurrent transition can't be
        // overwritten; zero matches means we lost that race
        let result = bookings
            .update_one(
                doc! { "_id": booking_id, "status": "PENDING" },
                doc! { "$set": { "status": "CANCELLED", "updated_at": DateTime::now() } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(BookingError::State(
                "Only PENDING bookings can be cancelled".to_string(),
            ));
        }

        Ok(())
    }

    pub fn check_cancellable(status: BookingStatus) -> Result<(), BookingError> {
        match status {
            BookingStatus::Pending => Ok(()),
            _ => Err(BookingError::State(
                "Only PENDING bookings can be cancelled".to_string(),
            )),
        }
    }

    pub async fn update_status(
        client: &Client,
        booking_id: ObjectId,
        status: BookingStatus,
    ) -> Result<(), BookingError> {
        let bookings: mongodb::Collection<Booking> =
            client.database(DATABASE).collection("Bookings");

        let status_bson = mongodb::bson::to_bson(&status)
            .map_err(|err| BookingError::Validation(format!("Invalid status: {}", err)))?;

        let result = bookings
            .update_one(
                doc! { "_id": booking_id },
                doc! { "$set": { "status": status_bson, "updated_at": DateTime::now() } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(BookingError::NotFound("Booking not found".to_string()));
        }

        Ok(())
    }

    fn validate_request(payload: &BookingRequest) -> Result<(), BookingError> {
        if payload.event_type.trim().is_empty() {
            return Err(BookingError::Validation(
                "Event type is required".to_string(),
            ));
        }
        if payload.guest_count < MIN_GUESTS {
            return Err(BookingError::Validation(format!(
                "Minimum {} guests required",
                MIN_GUESTS
            )));
        }
        if payload.menu_item_ids.is_empty() {
            return Err(BookingError::Validation(
                "At least one menu item must be selected".to_string(),
            ));
        }
        Ok(())
    }

    fn parse_item_ids(raw: &[String]) -> Result<Vec<ObjectId>, BookingError> {
        raw.iter()
            .map(|id| {
                ObjectId::parse_str(id)
                    .map_err(|_| BookingError::Validation(format!("Invalid menu item ID: {}", id)))
            })
            .collect()
    }

    async fn fetch_live_items(
        client: &Client,
        item_ids: &[ObjectId],
    ) -> Result<Vec<MenuItem>, BookingError> {
        use futures::TryStreamExt;

        let collection: mongodb::Collection<MenuItem> =
            client.database(DATABASE).collection("MenuItems");

        let cursor = collection
            .find(doc! { "_id": { "$in": item_ids.to_vec() }, "active": true })
            .await?;
        let items: Vec<MenuItem> = cursor.try_collect().await?;

        if items.len() != item_ids.len() {
            return Err(BookingError::Validation(
                "One or more selected menu items are unavailable".to_string(),
            ));
        }

        Ok(items)
    }

    async fn fetch_live_package(
        client: &Client,
        package_id: &ObjectId,
    ) -> Result<MenuPackage, BookingError> {
        let collection: mongodb::Collection<MenuPackage> =
            client.database(DATABASE).collection("Packages");

        collection
            .find_one(doc! { "_id": package_id, "active": true })
            .await?
            .ok_or_else(|| BookingError::NotFound("Package not found".to_string()))
    }

    fn generate_booking_ref() -> String {
        // Unambiguous alphabet, no 0/O or 1/I/L
        const ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
        let mut rng = rand::thread_rng();
        let suffix: String = (0..6)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        format!("CTR-{}", suffix)
    }
}
