//! Placement and sizing failures.

use std::fmt;

/// Failure to place a child into a [`Space`](crate::Space) or to size it.
///
/// Errors carry raw addresses only. The owner of the space knows what the
/// children are and attaches names when it reports the error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpaceError {
    /// An explicitly placed child collides with an already placed one.
    Overlap {
        start: u64,
        size: u64,
        blocker_start: u64,
        blocker_size: u64,
    },
    /// An explicit extent is smaller than the occupied range.
    Undersized { declared: u64, required: u64 },
    /// A child has no offset and the placer does not assign one.
    UnresolvableOffset { size: u64 },
    /// A range would extend past the end of the address type.
    AddressOverflow { start: u64, size: u64 },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpaceError::Overlap {
                start,
                size,
                blocker_start,
                blocker_size,
            } => write!(
                f,
                "range {start}..{} overlaps the child at {blocker_start}..{}",
                start + size,
                blocker_start + blocker_size
            ),
            SpaceError::Undersized { declared, required } => write!(
                f,
                "declared size {declared} is smaller than the {required} units occupied"
            ),
            SpaceError::UnresolvableOffset { size } => write!(
                f,
                "no offset given for a child of size {size} and automatic placement is not allowed"
            ),
            SpaceError::AddressOverflow { start, size } => {
                write!(f, "range of size {size} at {start} overflows the address space")
            }
        }
    }
}

impl std::error::Error for SpaceError {}
