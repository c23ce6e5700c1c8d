//! # Notification Services
//!
//! This crate provides outbound e-mail for the booking platform: a sender
//! abstraction with SES and mock implementations, the message templates used
//! by the booking and inquiry flows, and OTP code generation.

/// Sender trait and its SES / mock implementations.
pub mod service;
/// Message template builders.
pub mod templates;
/// Types and structures used by the notification services.
pub mod types;

pub use service::{EmailSender, MockEmailSender, SesEmailSender, generate_otp_code};
pub use templates::{
    NewBookingAlert, admin_registration_otp, booking_status_update, contact_message,
    new_booking_alert, new_inquiry_alert, pending_booking_reminder,
};
pub use types::NotificationError;
