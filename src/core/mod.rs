//! Application services

pub mod services;
pub mod traits;
