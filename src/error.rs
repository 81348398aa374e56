//! The error type shared by every container in this crate.

use thiserror::Error;

/// Failures reported by allocators and bounds-checked accessors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The allocator could not satisfy a request.
    #[error("memory allocation failed: requested {size} bytes (align {align})")]
    AllocationFailure {
        /// Number of bytes requested
        size: usize,
        /// Requested alignment
        align: usize,
    },

    /// The requested capacity does not fit in `isize::MAX` bytes.
    #[error("capacity overflow")]
    CapacityOverflow,

    /// An index past the live elements was used.
    #[error("index out of bounds: the len is {len} but the index is {index}")]
    OutOfBounds {
        /// The invalid index
        index: usize,
        /// The number of live elements
        len: usize,
    },
}

/// Shorthand for results carrying this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

impl Error {
    #[inline]
    pub(crate) fn alloc_failure(layout: core::alloc::Layout) -> Self {
        Error::AllocationFailure {
            size: layout.size(),
            align: layout.align(),
        }
    }

    /// Terminates the program the way the standard collections do on
    /// allocation failure.
    #[cold]
    #[inline(never)]
    #[track_caller]
    pub(crate) fn abort(self) -> ! {
        match self {
            Error::AllocationFailure { size, align } => {
                match core::alloc::Layout::from_size_align(size, align) {
                    Ok(layout) => alloc::alloc::handle_alloc_error(layout),
                    Err(_) => panic!("{}", self),
                }
            }
            other => panic!("{}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages_name_the_failing_values() {
        let e = Error::OutOfBounds { index: 7, len: 3 };
        assert_eq!(
            e.to_string(),
            "index out of bounds: the len is 3 but the index is 7"
        );

        let e = Error::alloc_failure(core::alloc::Layout::new::<u64>());
        assert_eq!(
            e,
            Error::AllocationFailure {
                size: 8,
                align: core::mem::align_of::<u64>()
            }
        );
    }
}
