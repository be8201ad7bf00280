//! The [`Space`] container.

use std::fmt;

use crate::{Gap, LinearPlacer, LinearResizer, Placer, Resizer, SpaceError};

/// A child as placed in a [`Space`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Placement<T> {
    pub item: T,
    pub start: u64,
    pub size: u64,
}

impl<T> Placement<T> {
    /// Position one past the end.
    #[inline]
    pub fn end(&self) -> u64 {
        self.start + self.size
    }

    fn overlaps(&self, start: u64, end: u64) -> bool {
        self.size > 0 && start < end && self.start < end && start < self.end()
    }
}

/// One entry of a space walked in address order: a child or a gap.
#[derive(Debug, PartialEq, Eq)]
pub enum Slot<'a, T> {
    Item(&'a Placement<T>),
    Gap(Gap),
}

impl<T> Slot<'_, T> {
    pub fn start(&self) -> u64 {
        match self {
            Slot::Item(p) => p.start,
            Slot::Gap(g) => g.start,
        }
    }

    pub fn end(&self) -> u64 {
        match self {
            Slot::Item(p) => p.end(),
            Slot::Gap(g) => g.end,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, Slot::Gap(_))
    }
}

#[derive(Clone, Debug)]
struct Deferred<T> {
    item: T,
    size: u64,
    placer: &'static dyn Placer,
}

/// A finite extent holding non-overlapping children.
///
/// Children are kept in address order. Children placed without an offset
/// wait in source order until [`Space::auto_place_remaining`].
#[derive(Clone)]
pub struct Space<T> {
    placer: &'static dyn Placer,
    resizer: &'static dyn Resizer,
    items: Vec<Placement<T>>,
    deferred: Vec<Deferred<T>>,
    extent: Option<u64>,
}

impl<T> Default for Space<T> {
    fn default() -> Self {
        Space::new(&LinearPlacer, &LinearResizer)
    }
}

impl<T> Space<T> {
    /// Create an empty space with the given policies.
    pub fn new(placer: &'static dyn Placer, resizer: &'static dyn Resizer) -> Self {
        Space {
            placer,
            resizer,
            items: Vec::new(),
            deferred: Vec::new(),
            extent: None,
        }
    }

    /// Place a child, at `offset` if given, otherwise later by the space's
    /// own placer.
    pub fn place(&mut self, item: T, offset: Option<u64>, size: u64) -> Result<(), SpaceError> {
        let placer = self.placer;
        self.place_with(item, offset, size, placer)
    }

    /// Place a child, at `offset` if given, otherwise later by `placer`.
    pub fn place_with(
        &mut self,
        item: T,
        offset: Option<u64>,
        size: u64,
        placer: &'static dyn Placer,
    ) -> Result<(), SpaceError> {
        match offset {
            Some(start) => self.reserve(item, start, size),
            None => {
                self.deferred.push(Deferred { item, size, placer });
                Ok(())
            }
        }
    }

    fn reserve(&mut self, item: T, start: u64, size: u64) -> Result<(), SpaceError> {
        let end = start
            .checked_add(size)
            .ok_or(SpaceError::AddressOverflow { start, size })?;
        if size > 0 {
            if let Some(blocker) = self.items.iter().find(|p| p.overlaps(start, end)) {
                return Err(SpaceError::Overlap {
                    start,
                    size,
                    blocker_start: blocker.start,
                    blocker_size: blocker.size,
                });
            }
        }
        self.insert(Placement { item, start, size });
        Ok(())
    }

    fn insert(&mut self, placement: Placement<T>) {
        let idx = self.items.partition_point(|p| p.start <= placement.start);
        self.items.insert(idx, placement);
    }

    /// Position every deferred child, in the order they were offered.
    ///
    /// Each child goes into the lowest-addressed gap its placer accepts,
    /// including gaps left by children placed earlier in this pass.
    pub fn auto_place_remaining(&mut self) -> Result<(), SpaceError> {
        for Deferred { item, size, placer } in std::mem::take(&mut self.deferred) {
            let start = self.find_slot(size, placer)?;
            self.insert(Placement { item, start, size });
        }
        Ok(())
    }

    fn find_slot(&self, size: u64, placer: &dyn Placer) -> Result<u64, SpaceError> {
        for gap in self.open_gaps() {
            if let Some(start) = placer.place(size, gap)? {
                return Ok(start);
            }
        }
        Err(SpaceError::AddressOverflow {
            start: self.occupied_end(),
            size,
        })
    }

    /// Free ranges in address order, ending with the unbounded tail.
    fn open_gaps(&self) -> Vec<Gap> {
        let mut gaps = Vec::new();
        let mut cursor = 0;
        for p in &self.items {
            if p.start > cursor {
                gaps.push(Gap::new(cursor, p.start));
            }
            cursor = cursor.max(p.end());
        }
        gaps.push(Gap::new(cursor, u64::MAX));
        gaps
    }

    /// Fix the extent of the space.
    ///
    /// An explicit size is validated against the occupied range; otherwise
    /// the resizer computes one.
    pub fn resolve_size(&mut self, explicit: Option<u64>) -> Result<u64, SpaceError> {
        debug_assert!(self.deferred.is_empty(), "resolve_size before auto placement");
        let required = self.occupied_end();
        let extent = match explicit {
            Some(declared) if declared < required => {
                return Err(SpaceError::Undersized { declared, required })
            }
            Some(declared) => declared,
            None => self.resizer.resize(required)?,
        };
        self.extent = Some(extent);
        Ok(extent)
    }

    /// One past the highest occupied address, 0 if empty.
    pub fn occupied_end(&self) -> u64 {
        self.items.iter().map(Placement::end).max().unwrap_or(0)
    }

    /// The resolved extent, if [`Space::resolve_size`] has run.
    pub fn extent(&self) -> Option<u64> {
        self.extent
    }

    /// The resolved extent, or the occupied end before resolution.
    pub fn size(&self) -> u64 {
        self.extent.unwrap_or_else(|| self.occupied_end())
    }

    /// Placed children in address order.
    pub fn items(&self) -> std::slice::Iter<'_, Placement<T>> {
        self.items.iter()
    }

    /// Mutable access to placed children, for writing resolved positions
    /// back into them. Positions themselves cannot change.
    pub fn placements_mut(&mut self) -> impl Iterator<Item = (&mut T, u64, u64)> {
        self.items.iter_mut().map(|p| (&mut p.item, p.start, p.size))
    }

    /// Number of placed children.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of children still waiting for automatic placement.
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// Children and gaps in address order, covering `0..size()`.
    pub fn slots(&self) -> Vec<Slot<'_, T>> {
        let mut slots = Vec::with_capacity(self.items.len() * 2 + 1);
        let mut cursor = 0;
        for p in &self.items {
            if p.start > cursor {
                slots.push(Slot::Gap(Gap::new(cursor, p.start)));
            }
            slots.push(Slot::Item(p));
            cursor = cursor.max(p.end());
        }
        let size = self.size();
        if size > cursor {
            slots.push(Slot::Gap(Gap::new(cursor, size)));
        }
        slots
    }

    /// Gaps within `0..size()` in address order.
    pub fn gaps(&self) -> Vec<Gap> {
        self.slots()
            .into_iter()
            .filter_map(|slot| match slot {
                Slot::Gap(gap) => Some(gap),
                Slot::Item(_) => None,
            })
            .collect()
    }

    /// Number of gaps within `0..size()`.
    ///
    /// Decoders use this to tell whether a fallback branch is reachable.
    pub fn gap_count(&self) -> usize {
        self.gaps().len()
    }

    pub fn has_gaps(&self) -> bool {
        self.gap_count() > 0
    }

    /// The slot at the end of the space: the last child if it ends exactly
    /// at `size()`, otherwise the trailing gap. `None` for an empty extent.
    pub fn last(&self) -> Option<Slot<'_, T>> {
        self.slots().pop()
    }

    /// The child occupying `addr`, if any.
    pub fn occupant(&self, addr: u64) -> Option<&Placement<T>> {
        self.items
            .iter()
            .find(|p| p.start <= addr && addr < p.end())
    }
}

impl<T: PartialEq> PartialEq for Space<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items && self.extent == other.extent
    }
}

impl<T: Eq> Eq for Space<T> {}

impl<T: fmt::Debug> fmt::Debug for Space<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Space")
            .field("placer", &self.placer)
            .field("resizer", &self.resizer)
            .field("extent", &self.extent)
            .field("items", &self.items)
            .field("deferred", &self.deferred.len())
            .finish()
    }
}

/// Compact map for debugging, e.g. `A(4),B(1),-(11),C(2)`.
impl<T: fmt::Display> fmt::Display for Space<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slot) in self.slots().iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            match slot {
                Slot::Item(p) => write!(f, "{}({})", p.item, p.size)?,
                Slot::Gap(g) => write!(f, "-({})", g.len())?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
