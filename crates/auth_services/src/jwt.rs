use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::types::{AuthError, Claims, Principal, UserKind};

/// Signs and verifies session tokens for both principal kinds.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Creates a service from the `JWT_SECRET` environment variable.
    pub fn new() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "your-secret-key-change-this-in-production".to_string());

        Self::from_secret(&secret)
    }

    /// Creates a service with an explicit secret.
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        }
    }

    /// Issues a 24-hour session token carrying the principal's identity.
    pub fn issue_session(&self, principal: &Principal) -> Result<String, AuthError> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::hours(24))
            .expect("valid timestamp")
            .timestamp() as usize;

        let claims = Claims {
            sub: principal.id.to_string(),
            name: principal.name.clone(),
            email: principal.email.clone(),
            user_type: principal.user_type.as_str().to_string(),
            role: principal.role.clone(),
            exp: expiration,
            iat: Utc::now().timestamp() as usize,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verifies a token's signature and expiry and returns its claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(token_data.claims)
    }

    /// Verifies a token and reconstructs the principal it was issued for.
    pub fn principal_from_token(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.verify_token(token)?;

        let id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::Unauthorized)?;
        let user_type = UserKind::parse(&claims.user_type).ok_or(AuthError::Unauthorized)?;

        Ok(Principal {
            id,
            name: claims.name,
            email: claims.email,
            user_type,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff_principal() -> Principal {
        Principal {
            id: Uuid::new_v4(),
            name: "Asha Varma".to_string(),
            email: "asha@agency.example".to_string(),
            user_type: UserKind::Staff,
            role: Some("admin".to_string()),
        }
    }

    #[test]
    fn session_token_round_trips_staff_principal() {
        let jwt = JwtService::from_secret("test-secret");
        let principal = staff_principal();

        let token = jwt.issue_session(&principal).unwrap();
        let restored = jwt.principal_from_token(&token).unwrap();

        assert_eq!(restored.id, principal.id);
        assert_eq!(restored.email, principal.email);
        assert_eq!(restored.user_type, UserKind::Staff);
        assert_eq!(restored.role.as_deref(), Some("admin"));
    }

    #[test]
    fn customer_token_carries_no_role() {
        let jwt = JwtService::from_secret("test-secret");
        let principal = Principal {
            id: Uuid::new_v4(),
            name: "Rahul".to_string(),
            email: "rahul@example.com".to_string(),
            user_type: UserKind::Customer,
            role: None,
        };

        let token = jwt.issue_session(&principal).unwrap();
        let restored = jwt.principal_from_token(&token).unwrap();

        assert_eq!(restored.user_type, UserKind::Customer);
        assert!(restored.role.is_none());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let jwt = JwtService::from_secret("test-secret");
        let other = JwtService::from_secret("another-secret");

        let token = jwt.issue_session(&staff_principal()).unwrap();
        assert!(other.principal_from_token(&token).is_err());
    }
}
