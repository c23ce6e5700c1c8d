use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::booking_service::{BOOKING_COLUMNS, booking_from_row, booking_owned_by};
use crate::types::{BookingError, Review, SubmitReviewRequest};

const REVIEW_COLUMNS: &str = "id, customer_id, booking_id, package_id, user_name, user_email, \
     rating, title, comment, is_approved, created_at, updated_at";

fn review_from_row(row: &PgRow) -> Review {
    Review {
        id: row.get("id"),
        customer_id: row.get("customer_id"),
        booking_id: row.get("booking_id"),
        package_id: row.get("package_id"),
        user_name: row.get("user_name"),
        user_email: row.get("user_email"),
        rating: row.get("rating"),
        title: row.get("title"),
        comment: row.get("comment"),
        is_approved: row.get("is_approved"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// True once the trip is over. A booking ending today is not reviewable yet.
fn trip_ended(end_date: NaiveDate, today: NaiveDate) -> bool {
    end_date < today
}

/// Service for post-trip review operations.
pub struct ReviewService {
    pool: PgPool,
}

impl ReviewService {
    /// Creates a new instance of `ReviewService` with the provided database
    /// connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Submits a review for a finished booking. The caller must own the
    /// booking, the trip must be over, and each booking takes one review.
    /// New reviews await staff approval before appearing publicly.
    pub async fn submit_review(
        &self,
        request: &SubmitReviewRequest,
        customer_id: &Uuid,
        customer_name: &str,
        customer_email: &str,
    ) -> Result<Review, BookingError> {
        let row = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1",
        ))
        .bind(request.booking_id)
        .fetch_optional(&self.pool)
        .await?;

        let booking = match row {
            Some(row) => booking_from_row(&row),
            None => return Err(BookingError::NotFound),
        };

        if !booking_owned_by(&booking, customer_id, customer_email) {
            return Err(BookingError::Unauthorized);
        }

        if !trip_ended(booking.end_date, Utc::now().date_naive()) {
            return Err(BookingError::NotEligible(
                "You can review a trip only after it has ended".to_string(),
            ));
        }

        let existing = sqlx::query("SELECT id FROM reviews WHERE booking_id = $1")
            .bind(request.booking_id)
            .fetch_optional(&self.pool)
            .await?;

        if existing.is_some() {
            return Err(BookingError::DuplicateReview);
        }

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO reviews (
                customer_id, booking_id, package_id, user_name, user_email,
                rating, title, comment
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {REVIEW_COLUMNS}
            "#,
        ))
        .bind(customer_id)
        .bind(booking.id)
        .bind(booking.package_id)
        .bind(customer_name)
        .bind(customer_email)
        .bind(request.rating)
        .bind(&request.title)
        .bind(&request.comment)
        .fetch_one(&self.pool)
        .await?;

        Ok(review_from_row(&row))
    }

    /// The most recent approved reviews for public display.
    pub async fn approved_reviews(&self, limit: i64) -> Result<Vec<Review>, BookingError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {REVIEW_COLUMNS} FROM reviews
            WHERE is_approved
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(review_from_row).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trips_are_reviewable_only_after_the_end_date() {
        let today = NaiveDate::from_ymd_opt(2026, 9, 10).unwrap();

        assert!(trip_ended(
            NaiveDate::from_ymd_opt(2026, 9, 9).unwrap(),
            today
        ));
        // Ending today or later is not enough.
        assert!(!trip_ended(today, today));
        assert!(!trip_ended(
            NaiveDate::from_ymd_opt(2026, 9, 11).unwrap(),
            today
        ));
    }
}
