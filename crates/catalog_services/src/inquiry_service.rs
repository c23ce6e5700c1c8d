use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::types::{CatalogError, CreateInquiryRequest, Inquiry};

const INQUIRY_COLUMNS: &str = "id, customer_id, package_id, package_title, full_name, email, \
     phone, message, status, created_at, updated_at";

fn inquiry_from_row(row: &PgRow) -> Inquiry {
    Inquiry {
        id: row.get("id"),
        customer_id: row.get("customer_id"),
        package_id: row.get("package_id"),
        package_title: row.get("package_title"),
        full_name: row.get("full_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        message: row.get("message"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Service for inquiry (lead) operations.
pub struct InquiryService {
    pool: PgPool,
}

impl InquiryService {
    /// Creates a new instance of `InquiryService` with the provided database
    /// connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records a new inquiry with status `new`. The customer id is attached
    /// when the visitor was logged in.
    pub async fn create_inquiry(
        &self,
        request: &CreateInquiryRequest,
        customer_id: Option<Uuid>,
    ) -> Result<Inquiry, CatalogError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO inquiries (
                customer_id, package_id, package_title, full_name, email, phone, message
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {INQUIRY_COLUMNS}
            "#,
        ))
        .bind(customer_id)
        .bind(request.package_id)
        .bind(&request.package_title)
        .bind(request.full_name.trim())
        .bind(request.email.trim().to_lowercase())
        .bind(&request.phone)
        .bind(&request.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(inquiry_from_row(&row))
    }

    /// Lists all inquiries, newest first. Staff console view.
    pub async fn list_inquiries(&self) -> Result<Vec<Inquiry>, CatalogError> {
        let rows = sqlx::query(&format!(
            "SELECT {INQUIRY_COLUMNS} FROM inquiries ORDER BY created_at DESC",
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(inquiry_from_row).collect())
    }

    /// Lists the inquiries a customer has submitted, newest first.
    pub async fn list_for_customer(&self, customer_id: &Uuid) -> Result<Vec<Inquiry>, CatalogError> {
        let rows = sqlx::query(&format!(
            "SELECT {INQUIRY_COLUMNS} FROM inquiries WHERE customer_id = $1 ORDER BY created_at DESC",
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(inquiry_from_row).collect())
    }

    /// Moves an inquiry through the lead pipeline (`new` -> `contacted` ->
    /// `converted`).
    pub async fn update_status(
        &self,
        inquiry_id: &Uuid,
        status: &str,
    ) -> Result<Inquiry, CatalogError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE inquiries SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {INQUIRY_COLUMNS}
            "#,
        ))
        .bind(inquiry_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(inquiry_from_row(&row)),
            None => Err(CatalogError::NotFound),
        }
    }
}
