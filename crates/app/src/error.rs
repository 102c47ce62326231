use formcheck_core::error::CoreError;

use crate::loader::LoadError;

/// Application-level error type.
///
/// Wraps [`CoreError`] for setup and validation-flow errors and
/// [`LoadError`] for failures of the host data provider.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for fallible application calls.
pub type AppResult<T> = Result<T, AppError>;
