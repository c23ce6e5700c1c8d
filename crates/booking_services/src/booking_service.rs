use std::sync::Arc;

use chrono::{Duration, Utc};
use notification_services::{EmailSender, NewBookingAlert, new_booking_alert, booking_status_update};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::types::{Booking, BookingError, CheckoutRequest, Traveller};

pub(crate) const BOOKING_COLUMNS: &str = "id, customer_id, package_id, package_title, start_date, \
     end_date, travellers, total_amount, currency, status, payment_ref, special_requests, \
     reminders_sent, created_at, updated_at";

pub(crate) fn booking_from_row(row: &PgRow) -> Booking {
    Booking {
        id: row.get("id"),
        customer_id: row.get("customer_id"),
        package_id: row.get("package_id"),
        package_title: row.get("package_title"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        travellers: row.get("travellers"),
        total_amount: row.get("total_amount"),
        currency: row.get("currency"),
        status: row.get("status"),
        payment_ref: row.get("payment_ref"),
        special_requests: row.get("special_requests"),
        reminders_sent: row.get("reminders_sent"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// E-mail addresses of all admin staff, for fan-out alerts.
pub(crate) async fn admin_emails(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query("SELECT email FROM agency_users WHERE role = 'admin'")
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(|row| row.get("email")).collect())
}

/// The total for a booking: the package's starting price times the headcount.
/// Frozen at checkout; later package edits never rewrite it.
pub(crate) fn booking_total(price_from: i64, travellers: usize) -> i64 {
    price_from * travellers as i64
}

/// Whether a requested departure date is already behind us. Departing today
/// is still bookable.
pub(crate) fn departure_in_past(start_date: chrono::NaiveDate, today: chrono::NaiveDate) -> bool {
    start_date < today
}

/// True when the caller owns the booking, either through the customer id
/// recorded at checkout or by appearing in the traveller roster by e-mail.
pub fn booking_owned_by(booking: &Booking, caller_id: &Uuid, caller_email: &str) -> bool {
    if booking.customer_id.as_ref() == Some(caller_id) {
        return true;
    }

    booking
        .to_travellers()
        .map(|roster| {
            roster.iter().any(|t| {
                t.email
                    .as_deref()
                    .is_some_and(|e| e.eq_ignore_ascii_case(caller_email))
            })
        })
        .unwrap_or(false)
}

/// Service for booking lifecycle operations.
pub struct BookingService {
    pool: PgPool,
    mailer: Arc<dyn EmailSender>,
}

impl BookingService {
    /// Creates a new instance of `BookingService` with the provided database
    /// connection pool and e-mail sender.
    pub fn new(pool: PgPool, mailer: Arc<dyn EmailSender>) -> Self {
        Self { pool, mailer }
    }

    /// Creates a pending booking from a checkout request. The package may be
    /// identified by UUID or slug. Admin staff are alerted best-effort; a
    /// delivery failure never fails the checkout.
    pub async fn create_booking(
        &self,
        request: &CheckoutRequest,
        customer_id: Option<Uuid>,
    ) -> Result<Booking, BookingError> {
        let today = Utc::now().date_naive();
        if departure_in_past(request.start_date, today) {
            return Err(BookingError::Validation(
                "Start date cannot be in the past".to_string(),
            ));
        }

        let package = self.resolve_package(&request.package_id).await?;

        let end_date = request
            .end_date
            .unwrap_or(request.start_date + Duration::days(i64::from(package.duration_days) - 1));
        let total_amount = booking_total(package.price_from, request.travellers.len());

        // The lead traveller carries the contact details so later status and
        // reminder e-mails have somewhere to go.
        let mut roster = request.travellers.clone();
        if let Some(lead) = roster.first_mut() {
            if lead.email.is_none() {
                lead.email = Some(request.contact_email.clone());
            }
            if lead.phone.is_none() {
                lead.phone = Some(request.contact_phone.clone());
            }
        }

        let travellers_json = serde_json::to_value(&roster)
            .map_err(|e| BookingError::Validation(format!("Invalid travellers: {}", e)))?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO bookings (
                customer_id, package_id, package_title, start_date, end_date,
                travellers, total_amount, special_requests
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {BOOKING_COLUMNS}
            "#,
        ))
        .bind(customer_id)
        .bind(package.id)
        .bind(&package.title)
        .bind(request.start_date)
        .bind(end_date)
        .bind(&travellers_json)
        .bind(total_amount)
        .bind(&request.special_requests)
        .fetch_one(&self.pool)
        .await?;

        let booking = booking_from_row(&row);

        self.send_new_booking_alert(&booking, request).await;

        Ok(booking)
    }

    async fn send_new_booking_alert(&self, booking: &Booking, request: &CheckoutRequest) {
        let recipients = match admin_emails(&self.pool).await {
            Ok(emails) if !emails.is_empty() => emails,
            Ok(_) => {
                log::warn!("No admin accounts configured; skipping new-booking alert");
                return;
            }
            Err(e) => {
                log::error!("Failed to load admin emails for booking alert: {}", e);
                return;
            }
        };

        let (subject, body) = new_booking_alert(&NewBookingAlert {
            package_title: &booking.package_title,
            contact_name: &request.contact_name,
            contact_email: &request.contact_email,
            contact_phone: &request.contact_phone,
            start_date: booking.start_date,
            end_date: booking.end_date,
            travellers: request.travellers.len() as i64,
            total_amount: booking.total_amount,
            currency: &booking.currency,
            special_requests: booking.special_requests.as_deref(),
        });

        if let Err(e) = self.mailer.send(&recipients, &subject, &body).await {
            log::error!("Failed to send new-booking alert for {}: {}", booking.id, e);
        }
    }

    /// Changes a booking's status. Setting the status it already has is a
    /// no-op that sends no e-mail; a real change notifies the lead traveller
    /// best-effort.
    pub async fn update_status(
        &self,
        booking_id: &Uuid,
        status: &str,
    ) -> Result<Booking, BookingError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE bookings SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status IS DISTINCT FROM $2
            RETURNING {BOOKING_COLUMNS}
            "#,
        ))
        .bind(booking_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        let booking = match row {
            Some(row) => booking_from_row(&row),
            // Nothing matched: either the booking already has this status or
            // it does not exist.
            None => return self.get_booking(booking_id).await,
        };

        if let Some(lead) = booking.lead_traveller() {
            if let Some(email) = lead.email.clone() {
                let (subject, body) =
                    booking_status_update(&lead.name, &booking.package_title, &booking.status);
                if let Err(e) = self.mailer.send(&[email], &subject, &body).await {
                    log::error!("Failed to send status update for {}: {}", booking.id, e);
                }
            }
        }

        Ok(booking)
    }

    /// Fetches one booking by id.
    pub async fn get_booking(&self, booking_id: &Uuid) -> Result<Booking, BookingError> {
        let row = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1",
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(booking_from_row(&row)),
            None => Err(BookingError::NotFound),
        }
    }

    /// Lists all bookings, newest first. Staff console view.
    pub async fn list_bookings(&self) -> Result<Vec<Booking>, BookingError> {
        let rows = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at DESC",
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(booking_from_row).collect())
    }

    /// Lists a customer's bookings, newest first.
    pub async fn customer_bookings(&self, customer_id: &Uuid) -> Result<Vec<Booking>, BookingError> {
        let rows = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE customer_id = $1 ORDER BY created_at DESC",
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(booking_from_row).collect())
    }

    /// Fetches one booking on behalf of a customer, enforcing ownership.
    pub async fn customer_booking(
        &self,
        booking_id: &Uuid,
        customer_id: &Uuid,
        customer_email: &str,
    ) -> Result<Booking, BookingError> {
        let booking = self.get_booking(booking_id).await?;

        if !booking_owned_by(&booking, customer_id, customer_email) {
            return Err(BookingError::Unauthorized);
        }

        Ok(booking)
    }

    async fn resolve_package(&self, identifier: &str) -> Result<ResolvedPackage, BookingError> {
        let row = match Uuid::parse_str(identifier) {
            Ok(id) => {
                sqlx::query("SELECT id, title, duration_days, price_from FROM packages WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            Err(_) => {
                sqlx::query(
                    "SELECT id, title, duration_days, price_from FROM packages WHERE slug = $1",
                )
                .bind(identifier)
                .fetch_optional(&self.pool)
                .await?
            }
        };

        match row {
            Some(row) => Ok(ResolvedPackage {
                id: row.get("id"),
                title: row.get("title"),
                duration_days: row.get("duration_days"),
                price_from: row.get("price_from"),
            }),
            None => Err(BookingError::PackageNotFound),
        }
    }
}

struct ResolvedPackage {
    id: Uuid,
    title: String,
    duration_days: i32,
    price_from: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate};

    #[test]
    fn total_is_price_times_headcount() {
        assert_eq!(booking_total(185000, 2), 370000);
        assert_eq!(booking_total(185000, 1), 185000);
        assert_eq!(booking_total(99000, 8), 792000);
    }

    #[test]
    fn departures_before_today_are_rejected() {
        let today = NaiveDate::from_ymd_opt(2026, 9, 10).unwrap();

        let yesterday = NaiveDate::from_ymd_opt(2026, 9, 9).unwrap();
        assert!(departure_in_past(yesterday, today));

        // Same-day and future departures are allowed.
        assert!(!departure_in_past(today, today));
        let tomorrow = NaiveDate::from_ymd_opt(2026, 9, 11).unwrap();
        assert!(!departure_in_past(tomorrow, today));
    }

    fn booking_with(customer_id: Option<Uuid>, travellers: serde_json::Value) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            customer_id,
            package_id: Uuid::new_v4(),
            package_title: "Kerala Backwaters".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 6).unwrap(),
            travellers,
            total_amount: 370000,
            currency: "INR".to_string(),
            status: "pending".to_string(),
            payment_ref: None,
            special_requests: None,
            reminders_sent: vec![],
            created_at: DateTime::from_timestamp(0, 0).unwrap(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap(),
        }
    }

    #[test]
    fn ownership_by_customer_id() {
        let id = Uuid::new_v4();
        let booking = booking_with(Some(id), serde_json::json!([]));

        assert!(booking_owned_by(&booking, &id, "someone@example.com"));
        assert!(!booking_owned_by(
            &booking,
            &Uuid::new_v4(),
            "someone@example.com"
        ));
    }

    #[test]
    fn ownership_by_traveller_email_is_case_insensitive() {
        let booking = booking_with(
            None,
            serde_json::json!([
                {"name": "Priya Nair", "email": "Priya@Example.com"}
            ]),
        );

        assert!(booking_owned_by(
            &booking,
            &Uuid::new_v4(),
            "priya@example.com"
        ));
        assert!(!booking_owned_by(
            &booking,
            &Uuid::new_v4(),
            "other@example.com"
        ));
    }
}
