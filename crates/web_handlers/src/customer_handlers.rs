use actix_web::{HttpResponse, web};
use uuid::Uuid;

use auth_services::middleware::AuthenticatedPrincipal;
use booking_services::{BookingError, BookingService};
use catalog_services::InquiryService;
use notification_services::EmailSender;

/// GET /api/customer/my-data
///
/// Everything the logged-in customer has on file: their bookings and the
/// inquiries they submitted while signed in.
pub async fn my_data(
    pool: web::Data<sqlx::PgPool>,
    mailer: web::Data<dyn EmailSender>,
    principal: AuthenticatedPrincipal,
) -> Result<HttpResponse, actix_web::Error> {
    let booking_service = BookingService::new(pool.get_ref().clone(), mailer.clone().into_inner());
    let inquiry_service = InquiryService::new(pool.get_ref().clone());

    let bookings = booking_service.customer_bookings(&principal.0.id).await?;
    let inquiries = inquiry_service.list_for_customer(&principal.0.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "bookings": bookings,
        "inquiries": inquiries
    })))
}

/// GET /api/customer/bookings/{id}
///
/// One booking, visible only to its owner. Ownership follows either the
/// customer id stamped at checkout or the caller's e-mail appearing in the
/// traveller roster.
pub async fn customer_booking(
    pool: web::Data<sqlx::PgPool>,
    mailer: web::Data<dyn EmailSender>,
    principal: AuthenticatedPrincipal,
    booking_id: web::Path<Uuid>,
) -> Result<HttpResponse, BookingError> {
    let booking_service = BookingService::new(pool.get_ref().clone(), mailer.clone().into_inner());
    let booking = booking_service
        .customer_booking(&booking_id, &principal.0.id, &principal.0.email)
        .await?;

    Ok(HttpResponse::Ok().json(booking))
}
