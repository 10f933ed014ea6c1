//! Occupancy State
//!
//! When the write and read pointers coincide a circular buffer is either
//! empty or full; the pointers alone cannot tell which. [`OccupancyFlags`]
//! carries the answer explicitly instead of inspecting slot contents.

use std::fmt;

/// How many live elements a buffer holds, relative to its capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occupancy {
    /// No live elements
    Empty,
    /// Some, but fewer than capacity
    Partial,
    /// Capacity live elements
    Full,
}

impl Occupancy {
    /// Occupancy from explicit flags
    pub fn from_flags(empty: bool, full: bool) -> Self {
        match (empty, full) {
            (true, _) => Occupancy::Empty,
            (_, true) => Occupancy::Full,
            _ => Occupancy::Partial,
        }
    }

    /// Occupancy from a live-element count
    pub fn from_count(len: usize, capacity: usize) -> Self {
        if len == 0 {
            Occupancy::Empty
        } else if len >= capacity {
            Occupancy::Full
        } else {
            Occupancy::Partial
        }
    }
}

impl fmt::Display for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Occupancy::Empty => "empty",
            Occupancy::Partial => "partial",
            Occupancy::Full => "full",
        };
        f.write_str(name)
    }
}

/// Explicit `{empty, full}` flags
///
/// At most one flag is set at a time. Both are clear while unread data sits
/// between diverged pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupancyFlags {
    empty: bool,
    full: bool,
}

impl OccupancyFlags {
    /// Flags of a freshly constructed buffer
    pub fn new() -> Self {
        Self {
            empty: true,
            full: false,
        }
    }

    /// Check the empty flag
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Check the full flag
    #[inline]
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Record a placement; `coincide` is whether the pointers meet after it
    #[inline]
    pub fn mark_written(&mut self, coincide: bool) {
        self.empty = false;
        if coincide {
            self.full = true;
        }
    }

    /// Record a removal; `coincide` is whether the pointers meet after it
    #[inline]
    pub fn mark_read(&mut self, coincide: bool) {
        self.full = false;
        if coincide {
            self.empty = true;
        }
    }

    /// Undo a placement: the newest element was withdrawn
    #[inline]
    pub fn mark_withdrawn(&mut self, coincide: bool) {
        self.mark_read(coincide);
    }

    /// Undo a removal: the last read element is live again
    #[inline]
    pub fn mark_restored(&mut self, coincide: bool) {
        self.mark_written(coincide);
    }

    /// Summary of the flags
    pub fn occupancy(&self) -> Occupancy {
        Occupancy::from_flags(self.empty, self.full)
    }
}

impl Default for OccupancyFlags {
    fn default() -> Self {
        Self::new()
    }
}
