use thiserror::Error;

use budget_config::ConfigError;
use budget_core::{CoreError, StorageError};

/// Error type for application wiring and the operations it forwards to the engine.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<StorageError> for BudgetError {
    fn from(err: StorageError) -> Self {
        BudgetError::Core(CoreError::Storage(err))
    }
}

impl BudgetError {
    /// See [`CoreError::is_fatal`].
    pub fn is_fatal(&self) -> bool {
        matches!(self, BudgetError::Core(err) if err.is_fatal())
    }
}
