use thiserror::Error;

/// Fatal failures. Data-quality problems are reported as
/// [`Diagnostic`](crate::Diagnostic)s instead and never reach this type.
#[derive(Error, Debug)]
pub enum FinboardError {
    /// Input that is unreadable or has the wrong shape entirely.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FinboardError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

pub type Result<T> = std::result::Result<T, FinboardError>;
