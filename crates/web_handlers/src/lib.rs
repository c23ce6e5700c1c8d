//! # Web Handlers
//!
//! HTTP request handlers for the booking platform API. Route wiring lives in
//! the `web_server` crate; everything here takes validated input, calls the
//! service crates and shapes the JSON responses.

/// Login, customer registration and session handling.
mod auth_handlers;
pub use auth_handlers::*;

/// Staff console booking management.
mod booking_admin_handlers;
pub use booking_admin_handlers::*;

/// Public checkout.
mod checkout_handlers;
pub use checkout_handlers::*;

/// Contact-form relay.
mod contact_handlers;
pub use contact_handlers::*;

/// Scheduled reminder sweep endpoint.
mod cron_handlers;
pub use cron_handlers::*;

/// Customer self-service views.
mod customer_handlers;
pub use customer_handlers::*;

/// Public inquiry intake and staff lead management.
mod inquiry_handlers;
pub use inquiry_handlers::*;

/// Package catalog, public and staff.
mod package_handlers;
pub use package_handlers::*;

/// OTP-gated admin registration.
mod register_handlers;
pub use register_handlers::*;

/// Post-trip reviews.
mod review_handlers;
pub use review_handlers::*;
