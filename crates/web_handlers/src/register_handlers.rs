use actix_web::{HttpResponse, web};
use chrono::{Duration, Utc};
use serde::Deserialize;
use validator::Validate;

use auth_services::service::AuthService;
use auth_services::types::AuthError;
use notification_services::{EmailSender, admin_registration_otp, generate_otp_code};

/// How long a registration passcode stays valid.
const OTP_TTL_MINUTES: i64 = 10;

fn oversight_email() -> String {
    std::env::var("OVERSIGHT_EMAIL").unwrap_or_else(|_| "oversight@southerntrails.travel".to_string())
}

/// Request structure for starting an admin registration.
#[derive(Debug, Deserialize, Validate)]
pub struct InitiateAdminRegistration {
    /// Name of the would-be admin.
    #[validate(length(min = 2, max = 255, message = "Name is required"))]
    pub name: String,

    /// E-mail for the new staff account.
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
}

/// Request structure for completing an admin registration.
#[derive(Debug, Deserialize, Validate)]
pub struct CompleteAdminRegistration {
    /// Name of the would-be admin.
    #[validate(length(min = 2, max = 255, message = "Name is required"))]
    pub name: String,

    /// E-mail for the new staff account.
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    /// Password for the new staff account.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// The passcode forwarded by the oversight address.
    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub code: String,
}

/// POST /api/admin/register/initiate
///
/// Starts the OTP gate for staff registration. The passcode goes to the
/// fixed oversight address, never to the registrant, so an existing admin
/// has to hand it over. Delivery failure fails the whole request; there is
/// nothing the registrant could do with a code that was never delivered.
pub async fn initiate_admin_registration(
    pool: web::Data<sqlx::PgPool>,
    mailer: web::Data<dyn EmailSender>,
    request: web::Json<InitiateAdminRegistration>,
) -> Result<HttpResponse, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let auth_service = AuthService::new(pool.get_ref().clone());

    if auth_service.get_staff_by_email(&request.email).await?.is_some() {
        return Err(AuthError::EmailExists);
    }

    let code = generate_otp_code();
    let expires_at = Utc::now() + Duration::minutes(OTP_TTL_MINUTES);

    auth_service
        .upsert_otp(&request.email, &code, expires_at)
        .await?;

    let (subject, body) = admin_registration_otp(&request.name, &request.email, &code);

    if let Err(e) = mailer.send(&[oversight_email()], &subject, &body).await {
        log::error!("Failed to deliver registration OTP for {}: {}", request.email, e);
        return Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "otp_delivery_failed",
            "message": "Could not deliver the verification code"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Verification code sent for approval"
    })))
}

/// POST /api/admin/register/complete
///
/// Exchanges a valid passcode for a new admin account. Codes are single-use
/// and expire after ten minutes.
pub async fn complete_admin_registration(
    pool: web::Data<sqlx::PgPool>,
    request: web::Json<CompleteAdminRegistration>,
) -> Result<HttpResponse, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let auth_service = AuthService::new(pool.get_ref().clone());

    let record = auth_service
        .find_otp(&request.email, &request.code)
        .await?
        .ok_or(AuthError::InvalidCode)?;

    if record.is_expired(Utc::now()) {
        auth_service.delete_otp(&request.email).await?;
        return Err(AuthError::CodeExpired);
    }

    // Re-check under the code: someone may have registered this e-mail
    // between initiate and complete.
    if auth_service.get_staff_by_email(&request.email).await?.is_some() {
        return Err(AuthError::EmailExists);
    }

    let account = auth_service
        .create_staff(&request.name, &request.email, &request.password, "admin")
        .await?;

    auth_service.delete_otp(&request.email).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "user": {
            "id": account.id,
            "name": account.name,
            "email": account.email,
            "role": account.role
        }
    })))
}
