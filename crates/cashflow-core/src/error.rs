use cashflow_domain::{CadenceError, DateWindowError, MoneyError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Profile not loaded")]
    ProfileNotLoaded,
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),
    #[error("Series not found: {0}")]
    SeriesNotFound(String),
    #[error("One-off not found: {0}")]
    OneOffNotFound(String),
    #[error("Budget not found: {0}")]
    BudgetNotFound(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid window: {0}")]
    Window(#[from] DateWindowError),
    #[error("Invalid amount: {0}")]
    Money(#[from] MoneyError),
    #[error("Invalid cadence: {0}")]
    Cadence(#[from] CadenceError),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
