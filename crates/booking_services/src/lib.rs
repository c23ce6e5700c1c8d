//! # Booking Services
//!
//! This crate owns the booking lifecycle: checkout, staff status changes,
//! the pending-booking reminder sweep and post-trip reviews.

/// Service for booking database operations and notifications.
mod booking_service;
pub use booking_service::*;

/// Reminder sweep over pending bookings.
mod reminders;
pub use reminders::*;

/// Service for review submission and moderation.
mod review_service;
pub use review_service::*;

/// Types for bookings and reviews.
mod types;
pub use types::*;
