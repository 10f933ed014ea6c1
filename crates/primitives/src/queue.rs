//! QueueBuffer primitive
//!
//! FIFO buffer with an explicit live count. When full, a write either fails
//! (`Ok(false)`, nothing touched) or, with overwrite enabled, evicts the
//! oldest element.
//!
//! # Design
//!
//! Storage is circular: a head (read pointer), a tail (write pointer) and a
//! live count that is tracked independently of either pointer. Every
//! operation is O(1); no element is ever shifted. Externally this is the
//! same contract as a shift-to-front queue: FIFO order, oldest evicted first,
//! and [`get_buffer`](Buffer::get_buffer) starts at the oldest live element.

use slabbuf_core::{BufferResult, Element, ElementSpec};
use slabbuf_engine::{Buffer, BufferConfig, BufferCore, SequentialBuffer};

/// Fixed-capacity FIFO queue
#[derive(Debug)]
pub struct QueueBuffer {
    core: BufferCore<QueueBuffer>,
    len: usize,
    overwrite: bool,
}

impl QueueBuffer {
    /// Create an empty queue of `capacity` slots
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of slots; must be positive
    /// * `spec` - Shape, type and layout every element must match
    /// * `overwrite` - Evict the oldest element instead of refusing a write
    ///   when full
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `capacity` is zero.
    pub fn new(capacity: usize, spec: ElementSpec, overwrite: bool) -> BufferResult<Self> {
        Ok(Self {
            core: BufferCore::new(capacity, spec)?,
            len: 0,
            overwrite,
        })
    }

    /// Create a queue from a validated configuration
    pub fn from_config(config: &BufferConfig) -> BufferResult<Self> {
        config.validate()?;
        config.warn_ignored("QueueBuffer", true, false);
        Self::new(config.capacity, config.element_spec(), config.overwrite)
    }

    /// Check if a write into a full queue evicts the oldest element
    pub fn overwrites(&self) -> bool {
        self.overwrite
    }

    /// Oldest live element, without consuming it
    pub fn front(&self) -> Option<&Element> {
        if self.len == 0 {
            return None;
        }
        self.core.slab().get(self.core.pointers().read())
    }
}

impl Buffer for QueueBuffer {
    fn core(&self) -> &BufferCore<Self> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BufferCore<Self> {
        &mut self.core
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn is_full(&self) -> bool {
        self.len == self.size()
    }

    /// Every slot starting at the oldest live element
    ///
    /// The first [`len`](SequentialBuffer::len) entries are live; the rest are
    /// stale or unwritten.
    fn get_buffer(&self) -> Vec<Option<Element>> {
        self.core.slab().rotated(self.core.pointers().read())
    }
}

impl SequentialBuffer for QueueBuffer {
    fn write_operation(&mut self, item: Element) -> bool {
        let full = self.is_full();
        if full && !self.overwrite {
            tracing::debug!(
                target: "slabbuf::queue",
                len = self.len,
                "write refused, queue full"
            );
            return false;
        }

        let slot = self.core.pointers().write();
        self.core.slab_mut().put(slot, item);
        self.core.pointers_mut().advance_write();
        if full {
            self.core.pointers_mut().advance_read();
            tracing::debug!(target: "slabbuf::queue", slot, "oldest element evicted");
        } else {
            self.len += 1;
        }

        tracing::trace!(
            target: "slabbuf::queue",
            slot,
            write = self.core.pointers().write(),
            read = self.core.pointers().read(),
            len = self.len,
            "element placed"
        );
        true
    }

    fn read_operation(&mut self) -> Option<Element> {
        if self.len == 0 {
            return None;
        }
        let slot = self.core.pointers().read();
        let item = self.core.slab().get(slot).cloned();
        self.core.pointers_mut().advance_read();
        self.len -= 1;

        tracing::trace!(
            target: "slabbuf::queue",
            slot,
            read = self.core.pointers().read(),
            len = self.len,
            "element taken"
        );
        item
    }

    fn len(&self) -> usize {
        self.len
    }

    fn rollback_write(&mut self) -> Option<Element> {
        if self.len == 0 {
            return None;
        }
        self.core.pointers_mut().retract_write();
        let slot = self.core.pointers().write();
        self.len -= 1;
        tracing::debug!(target: "slabbuf::queue", slot, "write rolled back");
        self.core.slab_mut().take(slot)
    }

    fn rewind_read(&mut self) -> bool {
        let slot = self.core.pointers().behind_read();
        if self.is_full() || !self.core.slab().is_written(slot) {
            return false;
        }
        self.core.pointers_mut().retract_read();
        self.len += 1;
        tracing::debug!(target: "slabbuf::queue", slot, "read rewound");
        true
    }
}
