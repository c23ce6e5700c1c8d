use actix_web::{
    Error, HttpMessage, HttpResponse, Result,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{Ready, ready},
    rc::Rc,
};

use crate::jwt::JwtService;
use crate::types::{Principal, UserKind};

/// Name of the session cookie set on login for browser navigation.
pub const SESSION_COOKIE: &str = "session";

fn token_from_request(req: &ServiceRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    bearer.or_else(|| req.cookie(SESSION_COOKIE).map(|c| c.value().to_string()))
}

/// Middleware for API scopes: verifies the session token and requires the
/// principal to be of the given kind. Failures answer with 401 JSON.
pub struct RequireAuth {
    required: UserKind,
}

impl RequireAuth {
    /// Gate for staff-only API scopes.
    pub fn staff() -> Self {
        Self {
            required: UserKind::Staff,
        }
    }

    /// Gate for customer-only API scopes.
    pub fn customer() -> Self {
        Self {
            required: UserKind::Customer,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthService {
            service: Rc::new(service),
            jwt_service: JwtService::new(),
            required: self.required,
        }))
    }
}

/// Service that implements the API authentication logic.
pub struct RequireAuthService<S> {
    service: Rc<S>,
    jwt_service: JwtService,
    required: UserKind,
}

impl<S, B> Service<ServiceRequest> for RequireAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let jwt_service = self.jwt_service.clone();
        let required = self.required;

        Box::pin(async move {
            let token = match token_from_request(&req) {
                Some(token) => token,
                None => {
                    let response = HttpResponse::Unauthorized().json(serde_json::json!({
                        "error": "missing_token",
                        "message": "Authorization token is required"
                    }));
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            let principal = match jwt_service.principal_from_token(&token) {
                Ok(principal) => principal,
                Err(_) => {
                    let response = HttpResponse::Unauthorized().json(serde_json::json!({
                        "error": "invalid_token",
                        "message": "Invalid or expired token"
                    }));
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            if principal.user_type != required {
                let response = HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "wrong_principal",
                    "message": "This endpoint requires a different account type"
                }));
                return Ok(req.into_response(response).map_into_right_body());
            }

            req.extensions_mut().insert(principal);

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Middleware for the staff console pages. Requests to `/dashboard…` without
/// a valid staff session are redirected to the login page with the original
/// URL preserved as `callbackUrl`; a logged-in staff member landing on
/// `/login` is bounced back to the console.
pub struct ConsoleGate;

impl<S, B> Transform<S, ServiceRequest> for ConsoleGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ConsoleGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ConsoleGateService {
            service: Rc::new(service),
            jwt_service: JwtService::new(),
        }))
    }
}

/// Service that implements the console gate logic.
pub struct ConsoleGateService<S> {
    service: Rc<S>,
    jwt_service: JwtService,
}

impl<S, B> Service<ServiceRequest> for ConsoleGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let jwt_service = self.jwt_service.clone();

        Box::pin(async move {
            let path = req.path().to_string();
            let is_dashboard = path.starts_with("/dashboard");
            let is_login = path == "/login";

            if !is_dashboard && !is_login {
                let res = service.call(req).await?;
                return Ok(res.map_into_left_body());
            }

            let staff_session = token_from_request(&req)
                .and_then(|token| jwt_service.principal_from_token(&token).ok())
                .filter(|principal| principal.user_type == UserKind::Staff);

            if is_dashboard && staff_session.is_none() {
                let callback = req.uri().to_string();
                let location = format!("/login?callbackUrl={}", callback);
                let response = HttpResponse::Found()
                    .insert_header((header::LOCATION, location))
                    .finish();
                return Ok(req.into_response(response).map_into_right_body());
            }

            if is_login && staff_session.is_some() {
                let response = HttpResponse::Found()
                    .insert_header((header::LOCATION, "/dashboard"))
                    .finish();
                return Ok(req.into_response(response).map_into_right_body());
            }

            if let Some(principal) = staff_session {
                req.extensions_mut().insert(principal);
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Extractor for the authenticated principal placed in request extensions by
/// [`RequireAuth`].
pub struct AuthenticatedPrincipal(pub Principal);

impl actix_web::FromRequest for AuthenticatedPrincipal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let principal = req.extensions().get::<Principal>().cloned();

        ready(match principal {
            Some(principal) => Ok(AuthenticatedPrincipal(principal)),
            None => Err(actix_web::error::ErrorUnauthorized(
                "User not authenticated",
            )),
        })
    }
}

/// Extractor for endpoints where a customer session is optional (checkout,
/// inquiries). Verifies the token when present and yields the principal only
/// for customer sessions; a staff session on a public endpoint counts as
/// anonymous, so a staff id is never recorded as a customer reference.
pub struct MaybePrincipal(pub Option<Principal>);

impl actix_web::FromRequest for MaybePrincipal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let bearer = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::to_string);

        let token = bearer.or_else(|| req.cookie(SESSION_COOKIE).map(|c| c.value().to_string()));

        let principal = token
            .and_then(|token| JwtService::new().principal_from_token(&token).ok())
            .filter(|principal| principal.user_type == UserKind::Customer);

        ready(Ok(MaybePrincipal(principal)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::FromRequest;
    use actix_web::test::TestRequest;
    use uuid::Uuid;

    fn principal(user_type: UserKind, role: Option<&str>) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            name: "Asha Varma".to_string(),
            email: "asha@example.com".to_string(),
            user_type,
            role: role.map(str::to_string),
        }
    }

    #[actix_web::test]
    async fn optional_session_yields_customer_principal() {
        let token = JwtService::new()
            .issue_session(&principal(UserKind::Customer, None))
            .unwrap();

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        let extracted = MaybePrincipal::from_request(&req, &mut actix_web::dev::Payload::None)
            .await
            .unwrap();

        let restored = extracted.0.expect("customer session should be recognized");
        assert_eq!(restored.user_type, UserKind::Customer);
    }

    #[actix_web::test]
    async fn staff_session_is_anonymous_on_public_endpoints() {
        let token = JwtService::new()
            .issue_session(&principal(UserKind::Staff, Some("admin")))
            .unwrap();

        let req = TestRequest::default()
            .cookie(actix_web::cookie::Cookie::new(SESSION_COOKIE, token))
            .to_http_request();

        let extracted = MaybePrincipal::from_request(&req, &mut actix_web::dev::Payload::None)
            .await
            .unwrap();

        assert!(extracted.0.is_none());
    }

    #[actix_web::test]
    async fn missing_or_garbage_token_yields_no_principal() {
        let req = TestRequest::default().to_http_request();
        let extracted = MaybePrincipal::from_request(&req, &mut actix_web::dev::Payload::None)
            .await
            .unwrap();
        assert!(extracted.0.is_none());

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
            .to_http_request();
        let extracted = MaybePrincipal::from_request(&req, &mut actix_web::dev::Payload::None)
            .await
            .unwrap();
        assert!(extracted.0.is_none());
    }
}
