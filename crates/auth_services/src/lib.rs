//! # Auth Services
//!
//! This crate provides authentication services for the booking platform.
//! It covers both principal kinds (agency staff and customers), JWT session
//! tokens, route-protection middleware, and credential management.

/// JWT session token handling.
pub mod jwt;
/// Middleware for request authentication and the staff console gate.
pub mod middleware;
/// Service definitions for credential verification and account management.
pub mod service;
/// Types and structures used in authentication services.
pub mod types;
