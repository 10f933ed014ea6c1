//! Pointer Tracker
//!
//! Write and read indices into a [`Slab`](crate::Slab). Each operation moves
//! one pointer by exactly one slot modulo capacity; bulk moves are expressed
//! as repeated single-slot moves.
//!
//! Both indices always lie in `[0, capacity)`.

/// Write/read indices with modular advance and retract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerTracker {
    write: usize,
    read: usize,
    capacity: usize,
}

impl PointerTracker {
    /// Both pointers at slot 0
    ///
    /// `capacity` must be non-zero; buffers reject zero capacity at
    /// construction.
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "pointer tracker needs a non-zero capacity");
        Self {
            write: 0,
            read: 0,
            capacity,
        }
    }

    /// Current write pointer
    #[inline]
    pub fn write(&self) -> usize {
        self.write
    }

    /// Current read pointer
    #[inline]
    pub fn read(&self) -> usize {
        self.read
    }

    /// Modulus of all pointer arithmetic
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Move the write pointer one slot forward
    #[inline]
    pub fn advance_write(&mut self) {
        self.write = self.next(self.write);
    }

    /// Move the read pointer one slot forward
    #[inline]
    pub fn advance_read(&mut self) {
        self.read = self.next(self.read);
    }

    /// Move the write pointer one slot back
    #[inline]
    pub fn retract_write(&mut self) {
        self.write = self.prev(self.write);
    }

    /// Move the read pointer one slot back
    #[inline]
    pub fn retract_read(&mut self) {
        self.read = self.prev(self.read);
    }

    /// Slot immediately behind the write pointer
    #[inline]
    pub fn behind_write(&self) -> usize {
        self.prev(self.write)
    }

    /// Slot immediately behind the read pointer
    #[inline]
    pub fn behind_read(&self) -> usize {
        self.prev(self.read)
    }

    /// Check if both pointers reference the same slot
    #[inline]
    pub fn coincide(&self) -> bool {
        self.write == self.read
    }

    /// Slots from the read pointer forward to the write pointer
    ///
    /// Zero when the pointers coincide, which is ambiguous between empty and
    /// full; occupancy state resolves it.
    #[inline]
    pub fn distance(&self) -> usize {
        (self.write + self.capacity - self.read) % self.capacity
    }

    /// `index` offset forward by `offset` slots
    #[inline]
    pub fn offset(&self, index: usize, offset: usize) -> usize {
        (index + offset) % self.capacity
    }

    #[inline]
    fn next(&self, index: usize) -> usize {
        (index + 1) % self.capacity
    }

    #[inline]
    fn prev(&self, index: usize) -> usize {
        (index + self.capacity - 1) % self.capacity
    }
}
