use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One person travelling on a booking. The first traveller is the lead and
/// receives status e-mails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Traveller {
    /// Full name.
    pub name: String,
    /// E-mail address, if collected.
    pub email: Option<String>,
    /// Phone number, if collected.
    pub phone: Option<String>,
    /// Age, if collected.
    pub age: Option<i32>,
    /// ISO country code; defaults to the agency's home market.
    #[serde(default = "default_nationality")]
    pub nationality: String,
}

fn default_nationality() -> String {
    "IN".to_string()
}

/// A booking as stored in the database.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Booking {
    /// Unique identifier for the booking.
    pub id: Uuid,
    /// Customer account that placed the booking, if authenticated.
    pub customer_id: Option<Uuid>,
    /// Package the booking is against.
    pub package_id: Uuid,
    /// Title snapshot taken at booking time.
    pub package_title: String,
    /// First day of travel.
    pub start_date: NaiveDate,
    /// Last day of travel.
    pub end_date: NaiveDate,
    /// Traveller roster, stored as JSON.
    pub travellers: serde_json::Value,
    /// Total amount frozen at creation time.
    pub total_amount: i64,
    /// Currency of the total.
    pub currency: String,
    /// Lifecycle status (`pending`, `confirmed`, `cancelled` or `completed`).
    pub status: String,
    /// Payment reference, if any.
    pub payment_ref: Option<String>,
    /// Free-text requests from the customer.
    pub special_requests: Option<String>,
    /// Reminder kinds already sent for this booking.
    pub reminders_sent: Vec<String>,
    /// Timestamp when the booking was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the booking was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Converts the stored traveller JSON into a structured roster.
    pub fn to_travellers(&self) -> Result<Vec<Traveller>, BookingError> {
        serde_json::from_value(self.travellers.clone())
            .map_err(|e| BookingError::Validation(format!("Invalid travellers in database: {}", e)))
    }

    /// The lead traveller, when the roster is non-empty and well-formed.
    pub fn lead_traveller(&self) -> Option<Traveller> {
        self.to_travellers().ok().and_then(|mut t| {
            if t.is_empty() {
                None
            } else {
                Some(t.remove(0))
            }
        })
    }
}

/// Request structure for checkout.
#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutRequest {
    /// Package to book, identified by UUID or slug.
    #[validate(length(min = 1, message = "Package is required"))]
    pub package_id: String,

    /// First day of travel.
    pub start_date: NaiveDate,

    /// Last day of travel; computed from the package duration when omitted.
    pub end_date: Option<NaiveDate>,

    /// Traveller roster; the first entry is the lead.
    #[validate(length(
        min = 1,
        max = 8,
        message = "Bookings must have between 1 and 8 travellers"
    ))]
    pub travellers: Vec<Traveller>,

    /// Name of the contact person for this booking.
    #[validate(length(min = 3, message = "Contact name must be at least 3 characters"))]
    pub contact_name: String,

    /// E-mail of the contact person.
    #[validate(email(message = "Please enter a valid email"))]
    pub contact_email: String,

    /// Phone of the contact person.
    #[validate(length(min = 5, message = "Contact phone must be at least 5 characters"))]
    pub contact_phone: String,

    /// Free-text requests, if any.
    pub special_requests: Option<String>,
}

/// Request structure for a staff status change.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBookingStatusRequest {
    /// New lifecycle status.
    #[validate(custom(function = "validate_booking_status"))]
    pub status: String,
}

/// Request structure for submitting a review.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitReviewRequest {
    /// Booking the review is about.
    pub booking_id: Uuid,

    /// Star rating.
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    /// Short headline.
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,

    /// Review body.
    #[validate(length(min = 10, message = "Comment must be at least 10 characters"))]
    pub comment: String,
}

/// A customer review as stored in the database.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Review {
    /// Unique identifier for the review.
    pub id: Uuid,
    /// Customer account that wrote the review.
    pub customer_id: Uuid,
    /// Booking the review is about.
    pub booking_id: Uuid,
    /// Package the booking was for.
    pub package_id: Uuid,
    /// Display name of the reviewer.
    pub user_name: String,
    /// E-mail of the reviewer.
    pub user_email: String,
    /// Star rating from 1 to 5.
    pub rating: i32,
    /// Short headline.
    pub title: String,
    /// Review body.
    pub comment: String,
    /// Whether staff have approved the review for public display.
    pub is_approved: bool,
    /// Timestamp when the review was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the review was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Result of one reminder sweep run.
#[derive(Debug, Default, Serialize)]
pub struct SweepOutcome {
    /// Pending bookings examined.
    pub processed: usize,
    /// Reminder e-mails actually sent.
    pub emails_sent: usize,
}

/// Custom error type for booking operations.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The requested package does not exist.
    #[error("Package not found")]
    PackageNotFound,

    /// The requested booking does not exist.
    #[error("Booking not found")]
    NotFound,

    /// The caller does not own the booking.
    #[error("Not authorized for this booking")]
    Unauthorized,

    /// The booking is not eligible for the requested operation.
    #[error("Booking not eligible: {0}")]
    NotEligible(String),

    /// The booking already has a review.
    #[error("A review already exists for this booking")]
    DuplicateReview,
}

impl actix_web::ResponseError for BookingError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            BookingError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "message": msg
            })),
            BookingError::PackageNotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "package_not_found",
                "message": "Package not found"
            })),
            BookingError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "booking_not_found",
                "message": "Booking not found"
            })),
            BookingError::Unauthorized => HttpResponse::Forbidden().json(serde_json::json!({
                "error": "not_your_booking",
                "message": "You are not authorized for this booking"
            })),
            BookingError::NotEligible(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "not_eligible",
                "message": msg
            })),
            BookingError::DuplicateReview => HttpResponse::Conflict().json(serde_json::json!({
                "error": "duplicate_review",
                "message": "A review already exists for this booking"
            })),
            BookingError::Database(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "internal_error",
                    "message": "An internal error occurred"
                }))
            }
        }
    }
}

/// Custom validation function for booking status.
pub fn validate_booking_status(status: &str) -> Result<(), validator::ValidationError> {
    match status {
        "pending" | "confirmed" | "cancelled" | "completed" => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_booking_status")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_status_accepts_only_known_values() {
        assert!(validate_booking_status("pending").is_ok());
        assert!(validate_booking_status("confirmed").is_ok());
        assert!(validate_booking_status("cancelled").is_ok());
        assert!(validate_booking_status("completed").is_ok());
        assert!(validate_booking_status("approved").is_err());
        assert!(validate_booking_status("").is_err());
    }

    #[test]
    fn traveller_nationality_defaults_on_deserialize() {
        let traveller: Traveller =
            serde_json::from_str(r#"{"name": "Priya Nair"}"#).unwrap();
        assert_eq!(traveller.nationality, "IN");
        assert!(traveller.email.is_none());
    }

    #[test]
    fn lead_traveller_is_first_in_roster() {
        let booking = Booking {
            id: Uuid::new_v4(),
            customer_id: None,
            package_id: Uuid::new_v4(),
            package_title: "Kerala Backwaters".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 6).unwrap(),
            travellers: serde_json::json!([
                {"name": "Priya Nair", "email": "priya@example.com"},
                {"name": "Arjun Nair"}
            ]),
            total_amount: 370000,
            currency: "INR".to_string(),
            status: "pending".to_string(),
            payment_ref: None,
            special_requests: None,
            reminders_sent: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let lead = booking.lead_traveller().unwrap();
        assert_eq!(lead.name, "Priya Nair");
    }
}
