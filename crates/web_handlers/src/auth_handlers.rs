use actix_web::{
    HttpResponse,
    cookie::{Cookie, SameSite, time},
    web,
};
use validator::Validate;

use auth_services::jwt::JwtService;
use auth_services::middleware::SESSION_COOKIE;
use auth_services::service::AuthService;
use auth_services::types::{
    AuthError, LoginRequest, Principal, RegisterRequest, SessionResponse, UserKind,
};

fn session_cookie(token: &str) -> Cookie<'_> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(24))
        .finish()
}

/// POST /api/auth/login
///
/// Authenticates either principal kind; the request names which credential
/// table to check. The token is returned in the body and also set as a
/// cookie for browser navigation.
pub async fn login(
    pool: web::Data<sqlx::PgPool>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let auth_service = AuthService::new(pool.get_ref().clone());
    let jwt_service = JwtService::new();

    let principal = auth_service
        .verify_credentials(request.user_type, &request.email, &request.password)
        .await?;

    let token = jwt_service.issue_session(&principal)?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&token))
        .json(SessionResponse {
            token,
            user: principal,
        }))
}

/// POST /api/auth/register
///
/// Customer self-registration. The new customer is logged in immediately.
pub async fn register(
    pool: web::Data<sqlx::PgPool>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let auth_service = AuthService::new(pool.get_ref().clone());
    let jwt_service = JwtService::new();

    let account = auth_service.register_customer(&request).await?;

    let principal = Principal {
        id: account.id,
        name: account.name,
        email: account.email,
        user_type: UserKind::Customer,
        role: None,
    };

    let token = jwt_service.issue_session(&principal)?;

    Ok(HttpResponse::Created()
        .cookie(session_cookie(&token))
        .json(SessionResponse {
            token,
            user: principal,
        }))
}

/// POST /api/auth/logout
///
/// Clears the session cookie. Tokens themselves stay valid until expiry.
pub async fn logout() -> HttpResponse {
    let mut cookie = session_cookie("");
    cookie.make_removal();

    HttpResponse::Ok()
        .cookie(cookie)
        .json(serde_json::json!({ "success": true }))
}
