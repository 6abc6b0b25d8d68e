use clrname_diagnostics::TypeNameError;
use thiserror::Error;

/// Failure to resolve a type name.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Parse(#[from] TypeNameError),

    #[error("Type '{0}' cannot be found")]
    TypeNotFound(String),
}

pub type ResolveResult<T> = Result<T, ResolveError>;
