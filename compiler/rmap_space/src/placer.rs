//! Placement strategies for children without an explicit offset.

use std::fmt;

use crate::SpaceError;

/// A free range of a space, `start..end`.
///
/// The gap above the last placed child is unbounded and ends at `u64::MAX`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Gap {
    pub start: u64,
    pub end: u64,
}

impl Gap {
    #[inline]
    pub const fn new(start: u64, end: u64) -> Self {
        Gap { start, end }
    }

    /// Number of free units in the gap.
    #[inline]
    pub const fn len(self) -> u64 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.start >= self.end
    }
}

/// Strategy deciding where in a gap a deferred child goes.
///
/// Gaps are offered in address order; the first `Some` wins.
pub trait Placer: fmt::Debug + Send + Sync {
    /// Try to position a child of `size` inside `gap`.
    ///
    /// Returns `Ok(None)` if the child does not fit in this gap.
    fn place(&self, size: u64, gap: Gap) -> Result<Option<u64>, SpaceError>;
}

/// Refuses every deferred child: all offsets must be explicit.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoPlacer;

impl Placer for NoPlacer {
    fn place(&self, size: u64, _gap: Gap) -> Result<Option<u64>, SpaceError> {
        Err(SpaceError::UnresolvableOffset { size })
    }
}

/// First fit: the lowest address where the child fits.
#[derive(Copy, Clone, Debug, Default)]
pub struct LinearPlacer;

impl Placer for LinearPlacer {
    fn place(&self, size: u64, gap: Gap) -> Result<Option<u64>, SpaceError> {
        Ok((gap.len() >= size).then_some(gap.start))
    }
}

/// First fit on a power-of-two boundary.
///
/// The alignment is the next power of two greater than or equal to the size,
/// so indexing into the child reduces to masking the address.
#[derive(Copy, Clone, Debug, Default)]
pub struct BinaryPlacer;

impl BinaryPlacer {
    /// Alignment used for a child of `size`.
    pub fn alignment(size: u64) -> Option<u64> {
        size.max(1).checked_next_power_of_two()
    }
}

impl Placer for BinaryPlacer {
    fn place(&self, size: u64, gap: Gap) -> Result<Option<u64>, SpaceError> {
        let overflow = SpaceError::AddressOverflow {
            start: gap.start,
            size,
        };
        let alignment = Self::alignment(size).ok_or(overflow)?;
        let mask = alignment - 1;
        let Some(start) = gap.start.checked_add(mask).map(|s| s & !mask) else {
            return Ok(None);
        };
        let fits = start
            .checked_add(size)
            .is_some_and(|end| end <= gap.end);
        Ok(fits.then_some(start))
    }
}
