//! Shared utilities and common types for the Go Slides backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT token generation and validation
//! - Password hashing with Argon2id
//! - Cryptographic helpers (hashing)
//! - Cursor pagination
//! - Common validation and normalization logic

pub mod crypto;
pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
