use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::types::{
    AgencyUser, AuthError, CustomerAccount, OtpRecord, Principal, RegisterRequest, UserKind,
};

/// A service for credential verification and account management across both
/// principal kinds.
pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    /// Creates a new instance of `AuthService` with the provided database
    /// connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Verifies credentials against the table selected by `kind` and returns
    /// the authenticated principal. Both flows share this single code path;
    /// only the lookup differs.
    pub async fn verify_credentials(
        &self,
        kind: UserKind,
        email: &str,
        password: &str,
    ) -> Result<Principal, AuthError> {
        let (principal, password_hash) = match kind {
            UserKind::Staff => {
                let user = self
                    .get_staff_by_email(email)
                    .await?
                    .ok_or(AuthError::InvalidCredentials)?;
                (
                    Principal {
                        id: user.id,
                        name: user.name,
                        email: user.email,
                        user_type: UserKind::Staff,
                        role: Some(user.role),
                    },
                    user.password_hash,
                )
            }
            UserKind::Customer => {
                let user = self
                    .get_customer_by_email(email)
                    .await?
                    .ok_or(AuthError::InvalidCredentials)?;
                (
                    Principal {
                        id: user.id,
                        name: user.name,
                        email: user.email,
                        user_type: UserKind::Customer,
                        role: None,
                    },
                    user.password_hash,
                )
            }
        };

        if !verify(password, &password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(principal)
    }

    /// Registers a new customer account.
    pub async fn register_customer(
        &self,
        request: &RegisterRequest,
    ) -> Result<CustomerAccount, AuthError> {
        if self.get_customer_by_email(&request.email).await?.is_some() {
            return Err(AuthError::EmailExists);
        }

        let password_hash = hash(&request.password, DEFAULT_COST)?;

        let row = sqlx::query(
            r#"
            INSERT INTO customer_users (name, email, password_hash, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, phone, created_at, updated_at
            "#,
        )
        .bind(request.name.trim())
        .bind(request.email.to_lowercase().trim())
        .bind(&password_hash)
        .bind(&request.phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(CustomerAccount {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            phone: row.get("phone"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    /// Creates a staff account with an already-verified registration.
    /// The password is hashed here; the OTP gate happens in the caller.
    pub async fn create_staff(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<AgencyUser, AuthError> {
        let password_hash = hash(password, DEFAULT_COST)?;

        let row = sqlx::query(
            r#"
            INSERT INTO agency_users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(name.trim())
        .bind(email.to_lowercase().trim())
        .bind(&password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(AgencyUser {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            role: row.get("role"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    /// Retrieves a staff account by e-mail, returning `None` if absent.
    pub async fn get_staff_by_email(&self, email: &str) -> Result<Option<AgencyUser>, AuthError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM agency_users
            WHERE email = $1
            "#,
        )
        .bind(email.to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| AgencyUser {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            role: row.get("role"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }))
    }

    /// Retrieves a customer account by e-mail, returning `None` if absent.
    pub async fn get_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CustomerAccount>, AuthError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, phone, created_at, updated_at
            FROM customer_users
            WHERE email = $1
            "#,
        )
        .bind(email.to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| CustomerAccount {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            phone: row.get("phone"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }))
    }

    /// Retrieves a customer account by ID.
    pub async fn get_customer_by_id(
        &self,
        customer_id: &Uuid,
    ) -> Result<Option<CustomerAccount>, AuthError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, phone, created_at, updated_at
            FROM customer_users
            WHERE id = $1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| CustomerAccount {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            phone: row.get("phone"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }))
    }

    /// Returns the e-mail addresses of every staff account with the `admin`
    /// role. Used for booking and inquiry notification fan-out.
    pub async fn admin_emails(&self) -> Result<Vec<String>, AuthError> {
        let rows = sqlx::query("SELECT email FROM agency_users WHERE role = 'admin'")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|row| row.get("email")).collect())
    }

    /// Stores a one-time passcode for staff registration, replacing any
    /// prior code for the same e-mail.
    pub async fn upsert_otp(
        &self,
        email: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        sqlx::query(
            r#"
            INSERT INTO otps (email, code, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE SET
                code = EXCLUDED.code,
                expires_at = EXCLUDED.expires_at,
                created_at = NOW()
            "#,
        )
        .bind(email.to_lowercase())
        .bind(code)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Looks up the OTP record matching an e-mail/code pair.
    pub async fn find_otp(&self, email: &str, code: &str) -> Result<Option<OtpRecord>, AuthError> {
        let row = sqlx::query(
            "SELECT email, code, expires_at FROM otps WHERE email = $1 AND code = $2",
        )
        .bind(email.to_lowercase())
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| OtpRecord {
            email: row.get("email"),
            code: row.get("code"),
            expires_at: row.get("expires_at"),
        }))
    }

    /// Deletes the OTP record for an e-mail. Codes are single-use.
    pub async fn delete_otp(&self, email: &str) -> Result<(), AuthError> {
        sqlx::query("DELETE FROM otps WHERE email = $1")
            .bind(email.to_lowercase())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
