use std::sync::Arc;

use chrono::{DateTime, Utc};
use notification_services::{EmailSender, pending_booking_reminder};
use sqlx::PgPool;

use crate::booking_service::{BOOKING_COLUMNS, admin_emails, booking_from_row};
use crate::types::{Booking, BookingError, SweepOutcome};

/// Picks the reminder kind due for a pending booking, or `None` when no
/// reminder is due. The urgency windows nest: a booking 2 days out that never
/// got its week-out reminder gets the 3-day one, not both.
pub(crate) fn classify_reminder(days_left: i64, already_sent: &[String]) -> Option<&'static str> {
    if days_left <= 0 {
        return None;
    }

    let kind = if days_left <= 1 {
        "1_day"
    } else if days_left <= 3 {
        "3_days"
    } else if days_left <= 7 {
        "7_days"
    } else {
        return None;
    };

    if already_sent.iter().any(|sent| sent == kind) {
        return None;
    }

    Some(kind)
}

/// Sweeps pending bookings and nags admin staff about the ones starting soon.
pub struct ReminderService {
    pool: PgPool,
    mailer: Arc<dyn EmailSender>,
}

impl ReminderService {
    /// Creates a new instance of `ReminderService` with the provided database
    /// connection pool and e-mail sender.
    pub fn new(pool: PgPool, mailer: Arc<dyn EmailSender>) -> Self {
        Self { pool, mailer }
    }

    /// Runs one sweep over all pending bookings with a future start date.
    ///
    /// Each due reminder is claimed in the database before the e-mail goes
    /// out, so a reminder kind is delivered at most once per booking even if
    /// two sweeps overlap. One broken booking never aborts the rest of the
    /// sweep.
    pub async fn run_sweep(&self, now: DateTime<Utc>) -> Result<SweepOutcome, BookingError> {
        let recipients = admin_emails(&self.pool).await?;
        if recipients.is_empty() {
            log::warn!("No admin accounts configured; skipping reminder sweep");
            return Ok(SweepOutcome::default());
        }

        let today = now.date_naive();

        let rows = sqlx::query(&format!(
            r#"
            SELECT {BOOKING_COLUMNS} FROM bookings
            WHERE status = 'pending' AND start_date > $1
            ORDER BY start_date
            "#,
        ))
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        let mut outcome = SweepOutcome {
            processed: rows.len(),
            emails_sent: 0,
        };

        for row in &rows {
            let booking = booking_from_row(row);

            let days_left = (booking.start_date - today).num_days();
            let kind = match classify_reminder(days_left, &booking.reminders_sent) {
                Some(kind) => kind,
                None => continue,
            };

            if !self.claim_reminder(&booking, kind).await? {
                continue;
            }

            match self.send_reminder(&booking, days_left, &recipients).await {
                Ok(()) => outcome.emails_sent += 1,
                Err(e) => {
                    // The claim stands: better a missed nag than a duplicate.
                    log::error!(
                        "Failed to send {} reminder for booking {}: {}",
                        kind,
                        booking.id,
                        e
                    );
                }
            }
        }

        log::info!(
            "Reminder sweep complete: {} pending booking(s), {} email(s) sent",
            outcome.processed,
            outcome.emails_sent
        );

        Ok(outcome)
    }

    /// Atomically records the reminder kind on the booking. Returns false when
    /// another sweep got there first or the booking left the pending state.
    async fn claim_reminder(&self, booking: &Booking, kind: &str) -> Result<bool, BookingError> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET reminders_sent = array_append(reminders_sent, $1), updated_at = NOW()
            WHERE id = $2 AND status = 'pending' AND NOT ($1 = ANY(reminders_sent))
            "#,
        )
        .bind(kind)
        .bind(booking.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn send_reminder(
        &self,
        booking: &Booking,
        days_left: i64,
        recipients: &[String],
    ) -> Result<(), notification_services::NotificationError> {
        let lead = booking.lead_traveller();

        let (subject, body) = pending_booking_reminder(
            &booking.package_title,
            booking.start_date,
            days_left,
            lead.as_ref().map(|t| t.name.as_str()),
            lead.as_ref().and_then(|t| t.email.as_deref()),
            lead.as_ref().and_then(|t| t.phone.as_deref()),
        );

        self.mailer.send(recipients, &subject, &body).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sent(kinds: &[&str]) -> Vec<String> {
        kinds.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn windows_map_to_reminder_kinds() {
        assert_eq!(classify_reminder(1, &[]), Some("1_day"));
        assert_eq!(classify_reminder(2, &[]), Some("3_days"));
        assert_eq!(classify_reminder(3, &[]), Some("3_days"));
        assert_eq!(classify_reminder(5, &[]), Some("7_days"));
        assert_eq!(classify_reminder(7, &[]), Some("7_days"));
    }

    #[test]
    fn out_of_window_days_get_no_reminder() {
        assert_eq!(classify_reminder(8, &[]), None);
        assert_eq!(classify_reminder(30, &[]), None);
        assert_eq!(classify_reminder(0, &[]), None);
        assert_eq!(classify_reminder(-2, &[]), None);
    }

    #[test]
    fn already_sent_kinds_are_not_repeated() {
        assert_eq!(classify_reminder(3, &sent(&["3_days"])), None);
        assert_eq!(classify_reminder(1, &sent(&["7_days", "3_days"])), Some("1_day"));
        assert_eq!(
            classify_reminder(1, &sent(&["7_days", "3_days", "1_day"])),
            None
        );
    }

    #[test]
    fn earlier_kinds_do_not_block_later_ones() {
        // A booking that got its week-out nag still gets the 3-day one.
        assert_eq!(classify_reminder(2, &sent(&["7_days"])), Some("3_days"));
    }
}
