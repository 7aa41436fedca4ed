use thiserror::Error;

/// Core error type shared across rdpbench crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A metadata provider could not deliver a record.
    #[error("metadata provider error: {0}")]
    Provider(String),
}

/// Convenience alias for results returned by rdpbench crates.
pub type Result<T> = std::result::Result<T, Error>;
