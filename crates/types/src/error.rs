/// Error type for record decoding errors.
///
/// Erases the underlying error type to a string message, or reports the
/// shape problem that stopped decoding.
#[derive(thiserror::Error, Debug)]
pub enum DeserError {
    /// String error message.
    #[error("{0}")]
    String(String),

    /// Deserialization ended with extra bytes remaining.
    #[error("inexact deserialization: {extra_bytes} extra bytes remaining")]
    InexactDeser {
        /// Number of extra bytes remaining after deserialization.
        extra_bytes: usize,
    },

    /// Not enough data to complete deserialization.
    #[error("insufficient data: needed {needed} bytes, but only {available} available")]
    InsufficientData {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },
}

impl From<&str> for DeserError {
    fn from(err: &str) -> Self {
        Self::String(err.to_string())
    }
}
