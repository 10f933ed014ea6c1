//! Element Store
//!
//! A [`Slab`] is the fixed-length, pre-allocated sequence of slots a buffer
//! owns. It never resizes after construction.
//!
//! # Design
//!
//! - Slots are `Option<Element>`: `None` is the explicit "never written"
//!   sentinel, so a genuinely zero-valued element is never mistaken for an
//!   empty slot.
//! - Reading a slot does not clear it. A value written to slot *i* stays
//!   observable until slot *i* is overwritten.

use slabbuf_core::Element;

/// Fixed-capacity slot storage
#[derive(Debug, Clone)]
pub struct Slab {
    slots: Box<[Option<Element>]>,
    written: usize,
}

impl Slab {
    /// Allocate `capacity` unwritten slots
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity].into_boxed_slice(),
            written: 0,
        }
    }

    /// Number of slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Element stored at `index`, if any
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Element> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Store `element` at `index`, returning the value it replaced
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`. Callers address slots through a
    /// [`PointerTracker`](crate::PointerTracker) or a bounds-checked position.
    pub fn put(&mut self, index: usize, element: Element) -> Option<Element> {
        let previous = self.slots[index].replace(element);
        if previous.is_none() {
            self.written += 1;
        }
        previous
    }

    /// Return the slot at `index` to the unwritten state
    ///
    /// Out-of-range indices are ignored.
    pub fn take(&mut self, index: usize) -> Option<Element> {
        let previous = self.slots.get_mut(index).and_then(Option::take);
        if previous.is_some() {
            self.written -= 1;
        }
        previous
    }

    /// Check if the slot at `index` holds an element
    #[inline]
    pub fn is_written(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Number of slots holding an element
    #[inline]
    pub fn written_count(&self) -> usize {
        self.written
    }

    /// Raw slots in storage order
    pub fn slots(&self) -> &[Option<Element>] {
        &self.slots
    }

    /// All slots in logical order starting at `start`
    ///
    /// Equivalent to rotating the raw storage left by `start`: the slots from
    /// `start` to the end, followed by the slots before `start`.
    pub fn rotated(&self, start: usize) -> Vec<Option<Element>> {
        let start = if self.slots.is_empty() {
            0
        } else {
            start % self.slots.len()
        };
        let (head, tail) = self.slots.split_at(start);
        tail.iter().chain(head.iter()).cloned().collect()
    }
}
