use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// A required construction argument was missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// An operation was called in a state that does not allow it.
    #[error("invariant violated: {0}")]
    Invariant(String),
    #[error("could not parse location: {0}")]
    InvalidLocation(#[from] url::ParseError),
}
