//! Users API - Library exports for the server binary and tests

pub mod api;
pub mod config;
pub mod core;
pub mod infrastructure;
