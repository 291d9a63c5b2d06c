//! HTTP route handlers.

pub mod about;
pub mod activities;
pub mod auth;
pub mod checkin;
pub mod contact;
pub mod dashboard;
pub mod gallery;
pub mod health;
pub mod logs;
pub mod registrants;
pub mod sponsors;
pub mod uploads;
pub mod users;
pub mod years;
