use actix_web::{HttpResponse, web};
use validator::Validate;

use auth_services::middleware::AuthenticatedPrincipal;
use booking_services::{BookingError, ReviewService, SubmitReviewRequest};

/// GET /api/reviews
///
/// The most recent approved reviews, for public display.
pub async fn list_reviews(
    pool: web::Data<sqlx::PgPool>,
) -> Result<HttpResponse, BookingError> {
    let review_service = ReviewService::new(pool.get_ref().clone());
    let reviews = review_service.approved_reviews(20).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

/// POST /api/reviews
///
/// Customer review submission. The booking must belong to the caller and
/// the trip must already be over; the review then awaits staff approval.
pub async fn submit_review(
    pool: web::Data<sqlx::PgPool>,
    principal: AuthenticatedPrincipal,
    request: web::Json<SubmitReviewRequest>,
) -> Result<HttpResponse, BookingError> {
    request
        .validate()
        .map_err(|e| BookingError::Validation(e.to_string()))?;

    let review_service = ReviewService::new(pool.get_ref().clone());
    let review = review_service
        .submit_review(
            &request,
            &principal.0.id,
            &principal.0.name,
            &principal.0.email,
        )
        .await?;

    Ok(HttpResponse::Created().json(review))
}
