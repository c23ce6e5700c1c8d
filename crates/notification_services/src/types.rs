/// Custom error type for notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// Simple email service (SES) errors.
    #[error("AWS SES error: {0}")]
    SesError(String),

    /// The configured sender address is missing or malformed.
    #[error("Sender misconfigured: {0}")]
    Misconfigured(String),
}
