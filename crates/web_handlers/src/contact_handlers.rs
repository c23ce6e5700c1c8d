use actix_web::{HttpResponse, web};
use serde::Deserialize;
use validator::Validate;

use notification_services::{EmailSender, contact_message};

/// Request structure for the public contact form.
#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    /// Name of the sender.
    #[validate(length(min = 2, max = 255, message = "Name is required"))]
    pub name: String,

    /// Reply address for the sender.
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    /// Subject line.
    #[validate(length(min = 5, max = 255, message = "Subject must be at least 5 characters"))]
    pub subject: String,

    /// The message body.
    #[validate(length(min = 10, max = 5000, message = "Message must be at least 10 characters"))]
    pub message: String,
}

/// POST /api/contact
///
/// Relays a contact-form message to the support address. Nothing is stored;
/// if delivery fails the sender gets a 500 and can retry.
pub async fn submit_contact(
    mailer: web::Data<dyn EmailSender>,
    request: web::Json<ContactRequest>,
) -> HttpResponse {
    if let Err(e) = request.validate() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "validation_error",
            "message": e.to_string()
        }));
    }

    let support_email = match std::env::var("SUPPORT_EMAIL") {
        Ok(address) if !address.is_empty() => address,
        _ => {
            log::error!("SUPPORT_EMAIL is not configured; dropping contact message");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "support_not_configured",
                "message": "Support email is not configured"
            }));
        }
    };

    let (subject, body) = contact_message(
        &request.name,
        &request.email,
        &request.subject,
        &request.message,
    );

    if let Err(e) = mailer.send(&[support_email], &subject, &body).await {
        log::error!("Failed to relay contact message from {}: {}", request.email, e);
        return HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "delivery_failed",
            "message": "Could not send your message, please try again"
        }));
    }

    HttpResponse::Ok().json(serde_json::json!({ "success": true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_request_enforces_field_lengths() {
        let request = ContactRequest {
            name: "A".to_string(),
            email: "not-an-email".to_string(),
            subject: "Hi".to_string(),
            message: "Too short".to_string(),
        };
        assert!(request.validate().is_err());

        let request = ContactRequest {
            name: "Asha Varma".to_string(),
            email: "asha@example.com".to_string(),
            subject: "Group booking".to_string(),
            message: "We are a group of twelve planning a trip in October.".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
