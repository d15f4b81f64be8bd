use thiserror::Error;

/// The error type for fallible reservations on [`HashTable`] and
/// [`HashMap`].
///
/// [`HashTable`]: crate::HashTable
/// [`HashMap`]: crate::HashMap
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TryReserveError {
    /// The requested slot count does not fit in `usize`, or its byte size
    /// exceeds `isize::MAX`.
    #[error("capacity overflow")]
    CapacityOverflow,
    /// The allocator refused to provide storage for `slots` slots.
    #[error("memory allocation of {slots} slots failed")]
    AllocError {
        /// Number of slots that were requested.
        slots: usize,
    },
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            TryReserveError::CapacityOverflow.to_string(),
            "capacity overflow"
        );
        assert_eq!(
            TryReserveError::AllocError { slots: 64 }.to_string(),
            "memory allocation of 64 slots failed"
        );
    }
}
