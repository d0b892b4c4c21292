use std::error::Error as StdError;

use rosunity_core::error::CoreError;

pub type Result<T, E> = std::result::Result<T, Error<E>>;

/// Adapter error: either the client library's own error, passed through
/// untouched, or an adapter-level `CoreError`.
#[derive(Debug, thiserror::Error)]
pub enum Error<E>
where
    E: StdError + 'static,
{
    #[error("runtime error: {0}")]
    Runtime(#[source] E),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

impl<E> Error<E>
where
    E: StdError + 'static,
{
    pub fn as_runtime(&self) -> Option<&E> {
        match self {
            Error::Runtime(e) => Some(e),
            Error::Core(_) => None,
        }
    }

    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            Error::Core(e) => Some(e),
            Error::Runtime(_) => None,
        }
    }
}
