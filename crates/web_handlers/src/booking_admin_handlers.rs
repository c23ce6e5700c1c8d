use actix_web::{HttpResponse, web};
use uuid::Uuid;
use validator::Validate;

use booking_services::{BookingError, BookingService, UpdateBookingStatusRequest};
use notification_services::EmailSender;

/// GET /api/admin/bookings
///
/// All bookings, newest first, for the staff console.
pub async fn list_bookings(
    pool: web::Data<sqlx::PgPool>,
    mailer: web::Data<dyn EmailSender>,
) -> Result<HttpResponse, BookingError> {
    let booking_service = BookingService::new(pool.get_ref().clone(), mailer.clone().into_inner());

    let bookings = booking_service.list_bookings().await?;
    Ok(HttpResponse::Ok().json(bookings))
}

/// PATCH /api/admin/bookings/{id}
///
/// Moves a booking through its lifecycle. Re-submitting the current status
/// is a no-op and triggers no customer e-mail.
pub async fn update_booking_status(
    pool: web::Data<sqlx::PgPool>,
    mailer: web::Data<dyn EmailSender>,
    booking_id: web::Path<Uuid>,
    request: web::Json<UpdateBookingStatusRequest>,
) -> Result<HttpResponse, BookingError> {
    request
        .validate()
        .map_err(|e| BookingError::Validation(e.to_string()))?;

    let booking_service = BookingService::new(pool.get_ref().clone(), mailer.clone().into_inner());

    let booking = booking_service
        .update_status(&booking_id, &request.status)
        .await?;

    Ok(HttpResponse::Ok().json(booking))
}
