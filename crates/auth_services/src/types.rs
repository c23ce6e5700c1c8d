use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Discriminator between the two credential tables.
///
/// Every login request names its kind explicitly; nothing is inferred from
/// the e-mail address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserKind {
    /// Internal operator account (`agency_users`).
    Staff,
    /// Public-facing account used to book and review trips (`customer_users`).
    Customer,
}

impl UserKind {
    /// String form used inside JWT claims.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserKind::Staff => "staff",
            UserKind::Customer => "customer",
        }
    }

    /// Parses the claim string back into a kind.
    pub fn parse(value: &str) -> Option<UserKind> {
        match value {
            "staff" => Some(UserKind::Staff),
            "customer" => Some(UserKind::Customer),
            _ => None,
        }
    }
}

/// An authenticated identity, shared by both credential flows.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    /// Unique identifier of the account.
    pub id: Uuid,
    /// Display name of the account holder.
    pub name: String,
    /// E-mail address of the account holder.
    pub email: String,
    /// Which credential table this principal came from.
    pub user_type: UserKind,
    /// Staff role (`admin` or `editor`); `None` for customers.
    pub role: Option<String>,
}

/// Agency (staff) account as stored in the database.
#[derive(Debug, sqlx::FromRow)]
pub struct AgencyUser {
    /// Unique identifier for the staff account.
    pub id: Uuid,
    /// Name of the staff member.
    pub name: String,
    /// E-mail address, unique per staff account.
    pub email: String,
    /// Salted bcrypt hash of the password.
    pub password_hash: String,
    /// Role of the staff member (`admin` or `editor`).
    pub role: String,
    /// Timestamp when the account was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Customer account as stored in the database.
#[derive(Debug, sqlx::FromRow)]
pub struct CustomerAccount {
    /// Unique identifier for the customer account.
    pub id: Uuid,
    /// Name of the customer.
    pub name: String,
    /// E-mail address, unique per customer.
    pub email: String,
    /// Salted bcrypt hash of the password.
    pub password_hash: String,
    /// Phone number of the customer (nullable).
    pub phone: Option<String>,
    /// Timestamp when the account was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// One-time passcode record for staff registration.
#[derive(Debug, sqlx::FromRow)]
pub struct OtpRecord {
    /// E-mail the code was issued for.
    pub email: String,
    /// The 6-digit code itself.
    pub code: String,
    /// Moment after which the code is no longer valid.
    pub expires_at: DateTime<Utc>,
}

impl OtpRecord {
    /// Whether this code has passed its expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Request structure for logging in (either kind).
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// E-mail address of the account.
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    /// Password for the account.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Which credential table to authenticate against.
    pub user_type: UserKind,
}

/// Request structure for customer self-registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Name of the customer.
    #[validate(length(min = 2, max = 255, message = "Name is required"))]
    pub name: String,

    /// E-mail address of the customer.
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    /// Password for the new account.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// Phone number of the customer.
    pub phone: Option<String>,
}

/// Session payload returned to callers after a successful login.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Signed session token.
    pub token: String,
    /// The authenticated principal.
    pub user: Principal,
}

/// JWT claims structure carried by session tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject of the token, the account ID.
    pub sub: String,
    /// Display name of the account holder.
    pub name: String,
    /// E-mail address of the account holder.
    pub email: String,
    /// Principal kind (`staff` or `customer`).
    pub user_type: String,
    /// Staff role, absent for customers.
    pub role: Option<String>,
    /// Expiration timestamp of the token.
    pub exp: usize,
    /// Issued-at timestamp of the token.
    pub iat: usize,
}

/// Custom error type for authentication-related errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The e-mail address already exists in the system.
    #[error("Email already exists")]
    EmailExists,

    /// The provided credentials are invalid.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No valid session was presented.
    #[error("Unauthorized")]
    Unauthorized,

    /// The user was not found in the system.
    #[error("User not found")]
    UserNotFound,

    /// The one-time passcode did not match any record.
    #[error("Invalid OTP")]
    InvalidCode,

    /// The one-time passcode has expired.
    #[error("OTP expired")]
    CodeExpired,

    /// An internal database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An error occurred while hashing the password.
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// An error occurred while signing or verifying a session token.
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// An error occurred while validating input data.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl actix_web::ResponseError for AuthError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            AuthError::EmailExists => HttpResponse::Conflict().json(serde_json::json!({
                "error": "email_exists",
                "message": "An account with this email already exists"
            })),
            AuthError::InvalidCredentials => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "invalid_credentials",
                "message": "Invalid email or password"
            })),
            AuthError::Unauthorized => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "unauthorized",
                "message": "A valid session is required"
            })),
            AuthError::UserNotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "user_not_found",
                "message": "User not found"
            })),
            AuthError::InvalidCode => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "invalid_otp",
                "message": "Invalid OTP"
            })),
            AuthError::CodeExpired => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "otp_expired",
                "message": "OTP expired"
            })),
            AuthError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "message": msg
            })),
            _ => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "internal_error",
                "message": "An internal error occurred"
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_kind_round_trips_through_claim_strings() {
        assert_eq!(UserKind::parse(UserKind::Staff.as_str()), Some(UserKind::Staff));
        assert_eq!(
            UserKind::parse(UserKind::Customer.as_str()),
            Some(UserKind::Customer)
        );
        assert_eq!(UserKind::parse("root"), None);
    }

    #[test]
    fn otp_expiry_is_strictly_after_deadline() {
        let now = Utc::now();
        let record = OtpRecord {
            email: "staff@example.com".to_string(),
            code: "123456".to_string(),
            expires_at: now,
        };

        assert!(!record.is_expired(now));
        assert!(record.is_expired(now + chrono::Duration::seconds(1)));
        assert!(!record.is_expired(now - chrono::Duration::minutes(5)));
    }
}
