use actix_web::{HttpResponse, web};
use uuid::Uuid;
use validator::Validate;

use auth_services::middleware::MaybePrincipal;
use auth_services::service::AuthService;
use catalog_services::{
    CatalogError, CreateInquiryRequest, InquiryService, UpdateInquiryStatusRequest,
};
use notification_services::{EmailSender, new_inquiry_alert};

/// POST /api/inquiries
///
/// Public inquiry intake. Admin staff are alerted best-effort; a delivery
/// failure never loses the lead.
pub async fn create_inquiry(
    pool: web::Data<sqlx::PgPool>,
    mailer: web::Data<dyn EmailSender>,
    principal: MaybePrincipal,
    request: web::Json<CreateInquiryRequest>,
) -> Result<HttpResponse, CatalogError> {
    request
        .validate()
        .map_err(|e| CatalogError::Validation(e.to_string()))?;

    let inquiry_service = InquiryService::new(pool.get_ref().clone());
    let auth_service = AuthService::new(pool.get_ref().clone());

    let customer_id = principal.0.map(|p| p.id);
    let inquiry = inquiry_service.create_inquiry(&request, customer_id).await?;

    match auth_service.admin_emails().await {
        Ok(recipients) if !recipients.is_empty() => {
            let (subject, body) = new_inquiry_alert(
                &inquiry.full_name,
                &inquiry.email,
                inquiry.phone.as_deref(),
                inquiry.package_title.as_deref(),
                &inquiry.message,
            );
            if let Err(e) = mailer.send(&recipients, &subject, &body).await {
                log::error!("Failed to send inquiry alert for {}: {}", inquiry.id, e);
            }
        }
        Ok(_) => log::warn!("No admin accounts configured; skipping inquiry alert"),
        Err(e) => log::error!("Failed to load admin emails for inquiry alert: {}", e),
    }

    Ok(HttpResponse::Created().json(inquiry))
}

/// GET /api/admin/inquiries
pub async fn list_inquiries(
    pool: web::Data<sqlx::PgPool>,
) -> Result<HttpResponse, CatalogError> {
    let inquiry_service = InquiryService::new(pool.get_ref().clone());
    let inquiries = inquiry_service.list_inquiries().await?;
    Ok(HttpResponse::Ok().json(inquiries))
}

/// PATCH /api/admin/inquiries/{id}
pub async fn update_inquiry_status(
    pool: web::Data<sqlx::PgPool>,
    inquiry_id: web::Path<Uuid>,
    request: web::Json<UpdateInquiryStatusRequest>,
) -> Result<HttpResponse, CatalogError> {
    request
        .validate()
        .map_err(|e| CatalogError::Validation(e.to_string()))?;

    let inquiry_service = InquiryService::new(pool.get_ref().clone());
    let inquiry = inquiry_service
        .update_status(&inquiry_id, &request.status)
        .await?;

    Ok(HttpResponse::Ok().json(inquiry))
}
