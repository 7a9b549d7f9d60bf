use thiserror::Error;

/// Errors reported by heap operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// `decrease_key` was asked to raise a key
    #[error("new key is greater than the current key")]
    KeyIncreased,
}
