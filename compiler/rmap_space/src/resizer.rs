//! Sizing strategies for spaces without an explicit extent.

use std::fmt;

use crate::SpaceError;

/// Strategy computing the extent of a space from its occupied end.
pub trait Resizer: fmt::Debug + Send + Sync {
    /// Extent for a space whose highest occupied address is `end - 1`.
    fn resize(&self, end: u64) -> Result<u64, SpaceError>;
}

/// No padding: the extent is the occupied end.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoResizer;

impl Resizer for NoResizer {
    fn resize(&self, end: u64) -> Result<u64, SpaceError> {
        Ok(end)
    }
}

/// Tight fit: the extent is the occupied end.
#[derive(Copy, Clone, Debug, Default)]
pub struct LinearResizer;

impl Resizer for LinearResizer {
    fn resize(&self, end: u64) -> Result<u64, SpaceError> {
        Ok(end)
    }
}

/// Rounds the extent up to a power of two.
///
/// An empty space stays empty.
#[derive(Copy, Clone, Debug, Default)]
pub struct BinaryResizer;

impl Resizer for BinaryResizer {
    fn resize(&self, end: u64) -> Result<u64, SpaceError> {
        if end == 0 {
            return Ok(0);
        }
        end.checked_next_power_of_two()
            .ok_or(SpaceError::AddressOverflow { start: 0, size: end })
    }
}
