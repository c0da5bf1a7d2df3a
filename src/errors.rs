use thiserror::Error;

/// Result type for extraction operations
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Errors raised when a caller breaks the cumulative-text contract
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Cumulative text must extend what was already seen: consumed {consumed} bytes, received {received}")]
    NonMonotonicInput { consumed: usize, received: usize },

    #[error("Stream already finalized")]
    AlreadyFinalized,
}

impl ExtractError {
    /// Check that `text` can be the continuation of a stream that has already seen
    /// `consumed` bytes.
    ///
    /// Only the length and the char boundary are checked; a caller that rewrites
    /// earlier content without shrinking it is not detected.
    pub fn ensure_cumulative(text: &str, consumed: usize) -> ExtractResult<()> {
        if text.len() < consumed || !text.is_char_boundary(consumed) {
            return Err(ExtractError::NonMonotonicInput {
                consumed,
                received: text.len(),
            });
        }
        Ok(())
    }
}
