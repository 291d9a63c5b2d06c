//! Domain layer for the Go Slides backend.
//!
//! This crate contains:
//! - Domain models (Year, Activity, Registrant, ...)
//! - Business logic services (notification, activity logging)
//! - Domain error types

pub mod models;
pub mod services;
