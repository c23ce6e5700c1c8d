//! # Catalog Services
//!
//! This crate manages the sellable side of the platform: travel packages
//! (the itinerary templates customers book against) and the inquiries that
//! come in about them.

/// Service for inquiry (lead) database operations.
mod inquiry_service;
pub use inquiry_service::*;

/// Service for package database operations.
mod package_service;
pub use package_service::*;

/// Types for packages and inquiries.
mod types;
pub use types::*;
