//! rmap Space - Finite One-Dimensional Allocation
//!
//! A [`Space`] is a one-dimensional extent, such as the words of a component,
//! the bits of a register or the bytes of a memory map. It holds
//! non-overlapping children, each occupying a contiguous range. The children
//! are not necessarily packed; the space may contain gaps between them or at
//! its end.
//!
//! ```text
//!     0123456789
//!     ....AAA...      A placed explicitly at 4, size 3
//!     BBB.AAA...      B (size 3) auto-placed into the first gap that fits
//! ```
//!
//! # Two-Pass Placement
//!
//! 1. Children with an explicit offset are reserved immediately
//!    ([`Space::place`]); a collision is an error.
//! 2. Children without an offset are deferred, then positioned in source order
//!    by [`Space::auto_place_remaining`], using a [`Placer`].
//!
//! Once everything is placed, [`Space::resolve_size`] fixes the extent,
//! either by validating an explicit size or by asking a [`Resizer`].
//!
//! Placement is first-fit and deterministic: identical inputs always produce
//! identical offsets.

mod error;
mod placer;
mod resizer;
mod space;

pub use error::SpaceError;
pub use placer::{BinaryPlacer, Gap, LinearPlacer, NoPlacer, Placer};
pub use resizer::{BinaryResizer, LinearResizer, NoResizer, Resizer};
pub use space::{Placement, Slot, Space};
