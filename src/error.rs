use thiserror::Error;

use crate::DocumentError;

/// Unified error type covering document loading and I/O.
///
/// Returned by convenience methods like [`Acl::from_file()`](crate::Acl::from_file).
#[derive(Debug, Error)]
pub enum WafGraphError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
