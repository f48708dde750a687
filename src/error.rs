//! Error type shared by every fallible table operation.

use thiserror::Error;

/// Failure of a table operation. A failed operation leaves the table
/// exactly as it was before the call.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum TableError {
    /// An allocation (slot array or key copy) could not be satisfied.
    #[error("out of memory")]
    OutOfMemory,
    /// The slot count cannot grow to the next power of two without
    /// overflowing `usize`.
    #[error("table capacity overflow")]
    CapacityOverflow,
}

impl From<std::collections::TryReserveError> for TableError {
    fn from(_: std::collections::TryReserveError) -> Self {
        TableError::OutOfMemory
    }
}

#[cfg(test)]
mod tests {
    use super::TableError;

    #[test]
    fn display_messages() {
        assert_eq!(TableError::OutOfMemory.to_string(), "out of memory");
        assert_eq!(
            TableError::CapacityOverflow.to_string(),
            "table capacity overflow"
        );
    }

    #[test]
    fn try_reserve_failure_maps_to_out_of_memory() {
        let mut v: Vec<u64> = Vec::new();
        let err = v.try_reserve_exact(usize::MAX).unwrap_err();
        assert_eq!(TableError::from(err), TableError::OutOfMemory);
    }
}
