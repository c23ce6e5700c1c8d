//! # Postgres
//!
//! This crate provides a client for the Southern Trails booking platform to
//! interact with a PostgreSQL database.

/// Database client for the booking platform.
pub mod database;
