//! The module contains the errors the engine can return.
//!
//! Validation failures carry a human readable message that the server
//! forwards to clients as-is. Database failures are wrapped transparently
//! and never shown to end users.
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid goal: {0}")]
    InvalidGoal(String),
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),
    #[error("Password hashing failed: {0}")]
    Password(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::InvalidGoal(a), Self::InvalidGoal(b)) => a == b,
            (Self::InvalidCursor(a), Self::InvalidCursor(b)) => a == b,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::Unauthorized(a), Self::Unauthorized(b)) => a == b,
            (Self::UnsupportedCurrency(a), Self::UnsupportedCurrency(b)) => a == b,
            (Self::Password(a), Self::Password(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
