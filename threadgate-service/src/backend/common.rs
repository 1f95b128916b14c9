use std::fmt::Debug;

use thiserror::Error;

/// A type-erased [`Backend`] instance.
pub type BoxedBackend = Box<dyn Backend>;

/// A key-value storage area holding string values, similar to browser web storage.
#[async_trait::async_trait]
pub trait Backend: Debug + Send + Sync + 'static {
    /// The backend name, used for diagnostics.
    fn name(&self) -> &'static str;

    /// Returns the value stored under `key`, if any.
    async fn get_item(&self, key: &str) -> BackendResult<Option<String>>;

    /// Stores or overwrites the value under `key`.
    async fn set_item(&self, key: &str, value: &str) -> BackendResult<()>;

    /// Removes the value under `key`. Removing a missing key is not an error.
    async fn remove_item(&self, key: &str) -> BackendResult<()>;
}

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum BackendError {
    /// IO errors related to file operations.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The key cannot be used as a storage location.
    #[error("invalid storage key `{0}`")]
    InvalidKey(String),
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
