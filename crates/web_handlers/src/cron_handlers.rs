use actix_web::{HttpRequest, HttpResponse, http::header, web};
use chrono::Utc;

use booking_services::{BookingError, ReminderService};
use notification_services::EmailSender;

fn caller_is_authorized(req: &HttpRequest) -> bool {
    let secret = match std::env::var("CRON_SECRET") {
        Ok(secret) if !secret.is_empty() => secret,
        _ => {
            log::warn!("CRON_SECRET is not set; reminder endpoint is unauthenticated");
            return true;
        }
    };

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .is_some_and(|token| token == secret)
}

/// GET /api/cron/reminders
///
/// Entry point for the scheduler. Guarded by `CRON_SECRET` when that is
/// configured.
pub async fn run_reminder_sweep(
    req: HttpRequest,
    pool: web::Data<sqlx::PgPool>,
    mailer: web::Data<dyn EmailSender>,
) -> Result<HttpResponse, BookingError> {
    if !caller_is_authorized(&req) {
        return Ok(HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "unauthorized",
            "message": "Invalid cron secret"
        })));
    }

    let reminder_service =
        ReminderService::new(pool.get_ref().clone(), mailer.clone().into_inner());
    let outcome = reminder_service.run_sweep(Utc::now()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "processed": outcome.processed,
        "emails_sent": outcome.emails_sent
    })))
}
