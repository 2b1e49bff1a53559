//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when a referenced item is missing or a filtered
//!   listing is empty.
//! - [`ExistingKey`] thrown when a unique name is already taken.
//! - [`NotAcceptable`] thrown when a request is well formed but refused
//!   (self-gift, non-positive ingredient quantity, unknown product).
//! - [`CapacityExceeded`] thrown when a deposit does not fit in a fridge.
//! - [`InvalidAmount`] thrown for non-positive amounts or sizes.
//! - [`InvalidName`] thrown for blank names or an unknown product kind.
//! - [`Internal`] thrown when a write that had to touch a row touched none.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`NotAcceptable`]: EngineError::NotAcceptable
//!  [`CapacityExceeded`]: EngineError::CapacityExceeded
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidName`]: EngineError::InvalidName
//!  [`Internal`]: EngineError::Internal
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Not acceptable: {0}")]
    NotAcceptable(String),
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::NotAcceptable(a), Self::NotAcceptable(b)) => a == b,
            (Self::CapacityExceeded(a), Self::CapacityExceeded(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
