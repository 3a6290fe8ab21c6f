use thiserror::Error;

/// Errors returned when the host passes arguments that violate the list contract.
///
/// A call that returns an error never mutates any state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("splice of {remove_count} items at {index} exceeds length {len}")]
    SpliceOutOfRange {
        index: usize,
        remove_count: usize,
        len: usize,
    },

    #[error("columns_per_row must be at least 1")]
    ColumnsPerRowZero,
}
