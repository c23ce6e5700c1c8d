use actix_web::{HttpResponse, web};
use validator::Validate;

use auth_services::middleware::MaybePrincipal;
use booking_services::{BookingError, BookingService, CheckoutRequest};
use notification_services::EmailSender;

fn app_url() -> String {
    std::env::var("APP_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// POST /api/checkout
///
/// Creates a pending booking. Works with or without a customer session; a
/// logged-in customer gets the booking attached to their account.
pub async fn checkout(
    pool: web::Data<sqlx::PgPool>,
    mailer: web::Data<dyn EmailSender>,
    principal: MaybePrincipal,
    request: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, BookingError> {
    request
        .validate()
        .map_err(|e| BookingError::Validation(e.to_string()))?;

    let booking_service = BookingService::new(pool.get_ref().clone(), mailer.clone().into_inner());
    let customer_id = principal.0.map(|p| p.id);
    let booking = booking_service.create_booking(&request, customer_id).await?;

    let url = format!("{}/booking/confirmation?bookingId={}", app_url(), booking.id);

    Ok(HttpResponse::Created().json(serde_json::json!({ "url": url })))
}
