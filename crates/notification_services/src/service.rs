use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ses::Client as SesClient;

use crate::types::NotificationError;

/// Trait for e-mail delivery implementations.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Sends one message to the given recipients and returns the provider's
    /// message id.
    async fn send(
        &self,
        to: &[String],
        subject: &str,
        body: &str,
    ) -> Result<String, NotificationError>;
}

/// AWS SES e-mail sender.
#[derive(Debug, Clone)]
pub struct SesEmailSender {
    ses_client: SesClient,
    from_email: String,
}

impl SesEmailSender {
    /// Creates a sender with AWS clients initialized from the environment.
    pub async fn new() -> Result<Self, NotificationError> {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        let ses_client = SesClient::new(&config);

        let from_email = std::env::var("FROM_EMAIL")
            .unwrap_or_else(|_| "notifications@southerntrails.travel".to_string());

        Ok(Self {
            ses_client,
            from_email,
        })
    }
}

#[async_trait]
impl EmailSender for SesEmailSender {
    async fn send(
        &self,
        to: &[String],
        subject: &str,
        body: &str,
    ) -> Result<String, NotificationError> {
        let subject_content = aws_sdk_ses::types::Content::builder()
            .data(subject)
            .build()
            .map_err(|e| NotificationError::SesError(format!("Failed to build subject: {}", e)))?;

        let text_content = aws_sdk_ses::types::Content::builder()
            .data(body)
            .build()
            .map_err(|e| NotificationError::SesError(format!("Failed to build body: {}", e)))?;

        let message = aws_sdk_ses::types::Message::builder()
            .subject(subject_content)
            .body(aws_sdk_ses::types::Body::builder().text(text_content).build())
            .build();

        let mut destination = aws_sdk_ses::types::Destination::builder();
        for address in to {
            destination = destination.to_addresses(address);
        }

        let result = self
            .ses_client
            .send_email()
            .source(&self.from_email)
            .destination(destination.build())
            .message(message)
            .send()
            .await;

        match result {
            Ok(output) => {
                let message_id = output.message_id().to_string();
                log::info!("Email sent to {} recipient(s), SES id {}", to.len(), message_id);
                Ok(message_id)
            }
            Err(e) => {
                let error_msg = if let Some(service_error) = e.as_service_error() {
                    format!("AWS SES service error: {:?}", service_error)
                } else {
                    format!("AWS SES error: {}", e)
                };
                Err(NotificationError::SesError(error_msg))
            }
        }
    }
}

/// Mock e-mail sender for development and tests. Logs the message and
/// returns a generated id.
pub struct MockEmailSender;

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send(
        &self,
        to: &[String],
        subject: &str,
        body: &str,
    ) -> Result<String, NotificationError> {
        log::info!("[MOCK EMAIL] To: {}", to.join(", "));
        log::info!("[MOCK EMAIL] Subject: {}", subject);
        log::info!("[MOCK EMAIL] Body:\n{}", body);

        Ok(format!("mock-email-{}", uuid::Uuid::new_v4()))
    }
}

/// Generates a random 6-digit one-time passcode.
pub fn generate_otp_code() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    format!("{:06}", rng.random_range(100000..=999999))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_code_is_six_digits() {
        for _ in 0..100 {
            let code = generate_otp_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn mock_sender_returns_a_message_id() {
        let sender = MockEmailSender;
        let id = sender
            .send(
                &["ops@southerntrails.travel".to_string()],
                "subject",
                "body",
            )
            .await
            .unwrap();

        assert!(id.starts_with("mock-email-"));
    }
}
