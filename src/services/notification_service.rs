use serde_json::json;

pub struct NotificationService;

impl NotificationService {
    /// Fire-and-forget booking confirmation. Dispatch failures are logged
    /// and never affect the booking that triggered them.
    pub fn booking_created(booking_ref: String, customer_email: String, total: i64) {
        tokio::spawn(async move {
            if let Err(err) = Self::dispatch(&booking_ref, &customer_email, total).await {
                eprintln!(
                    "Failed to dispatch confirmation for booking {}: {:?}",
                    booking_ref, err
                );
            }
        });
    }

    async fn dispatch(
        booking_ref: &str,
        customer_email: &str,
        total: i64,
    ) -> Result<(), reqwest::Error> {
        let url = match std::env::var("NOTIFY_WEBHOOK_URL") {
            Ok(url) => url,
            Err(_) => {
                println!(
                    "NOTIFY_WEBHOOK_URL not set, skipping notification for {}",
                    booking_ref
                );
                return Ok(());
            }
        };

        let payload = json!({
            "event": "booking.created",
            "booking_ref": booking_ref,
            "customer_email": customer_email,
            "total": total,
        });

        reqwest::Client::new()
            .post(&url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        println!("Confirmation dispatched for booking {}", booking_ref);
        Ok(())
    }
}
