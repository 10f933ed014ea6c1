//! RingBuffer primitive
//!
//! Circular overwrite buffer: writes never fail, and a write into a full
//! buffer evicts the oldest live element.
//!
//! # Design
//!
//! Occupancy is an explicit `{empty, full}` flag pair rather than an
//! inspection of slot contents, so a stored zero is never mistaken for an
//! unwritten slot.
//!
//! | State   | `write`                                   | `read`                          |
//! |---------|-------------------------------------------|---------------------------------|
//! | empty   | place at wp, advance wp, clear empty      | empty signal, no mutation       |
//! | partial | place at wp, advance wp, full if wp == rp | take rp, advance rp, empty if rp == wp |
//! | full    | place at wp, advance wp and rp (evict)    | take rp, advance rp, clear full |
//!
//! # Example
//!
//! ```ignore
//! let mut ring = RingBuffer::new(3, ElementSpec::scalar(DType::Int64))?;
//! for v in [1i64, 2, 3, 4] {
//!     ring.write(v)?;
//! }
//! // 1 was evicted
//! assert_eq!(ring.read()?, Some(Element::scalar(2i64)));
//! ```

use slabbuf_core::{BufferResult, Element, ElementSpec};
use slabbuf_engine::{Buffer, BufferConfig, BufferCore, SequentialBuffer};
use slabbuf_storage::OccupancyFlags;

/// Fixed-capacity circular buffer with overwrite-oldest semantics
#[derive(Debug)]
pub struct RingBuffer {
    core: BufferCore<RingBuffer>,
    flags: OccupancyFlags,
}

impl RingBuffer {
    /// Create an empty ring of `capacity` slots
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of slots; must be positive
    /// * `spec` - Shape, type and layout every element must match
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `capacity` is zero.
    pub fn new(capacity: usize, spec: ElementSpec) -> BufferResult<Self> {
        Ok(Self {
            core: BufferCore::new(capacity, spec)?,
            flags: OccupancyFlags::new(),
        })
    }

    /// Create a ring from a validated configuration
    ///
    /// `overwrite` and `namespace` have no meaning for a ring and are ignored
    /// with a warning.
    pub fn from_config(config: &BufferConfig) -> BufferResult<Self> {
        config.validate()?;
        config.warn_ignored("RingBuffer", false, false);
        Self::new(config.capacity, config.element_spec())
    }

    /// Current write pointer
    pub fn write_pointer(&self) -> usize {
        self.core.pointers().write()
    }

    /// Current read pointer
    pub fn read_pointer(&self) -> usize {
        self.core.pointers().read()
    }
}

impl Buffer for RingBuffer {
    fn core(&self) -> &BufferCore<Self> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BufferCore<Self> {
        &mut self.core
    }

    fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    fn is_full(&self) -> bool {
        self.flags.is_full()
    }

    /// Every slot rotated to start at the write pointer
    ///
    /// Once full this is oldest to newest. Before that, the sequence starts
    /// with the unwritten (`None`) slots ahead of the write pointer; use
    /// [`live_elements`](SequentialBuffer::live_elements) for live data only.
    fn get_buffer(&self) -> Vec<Option<Element>> {
        self.core.slab().rotated(self.core.pointers().write())
    }
}

impl SequentialBuffer for RingBuffer {
    fn write_operation(&mut self, item: Element) -> bool {
        let slot = self.core.pointers().write();
        self.core.slab_mut().put(slot, item);
        self.core.pointers_mut().advance_write();

        if self.flags.is_full() {
            self.core.pointers_mut().advance_read();
            tracing::debug!(
                target: "slabbuf::ring",
                slot,
                read = self.core.pointers().read(),
                "oldest element evicted"
            );
        } else {
            let coincide = self.core.pointers().coincide();
            self.flags.mark_written(coincide);
        }

        tracing::trace!(
            target: "slabbuf::ring",
            slot,
            write = self.core.pointers().write(),
            read = self.core.pointers().read(),
            full = self.flags.is_full(),
            "element placed"
        );
        true
    }

    fn read_operation(&mut self) -> Option<Element> {
        if self.flags.is_empty() {
            return None;
        }
        let slot = self.core.pointers().read();
        let item = self.core.slab().get(slot).cloned();
        self.core.pointers_mut().advance_read();
        let coincide = self.core.pointers().coincide();
        self.flags.mark_read(coincide);

        tracing::trace!(
            target: "slabbuf::ring",
            slot,
            write = self.core.pointers().write(),
            read = self.core.pointers().read(),
            empty = self.flags.is_empty(),
            "element taken"
        );
        item
    }

    fn len(&self) -> usize {
        if self.flags.is_full() {
            self.size()
        } else if self.flags.is_empty() {
            0
        } else {
            self.core.pointers().distance()
        }
    }

    fn rollback_write(&mut self) -> Option<Element> {
        if self.flags.is_empty() {
            return None;
        }
        self.core.pointers_mut().retract_write();
        let slot = self.core.pointers().write();
        let item = self.core.slab_mut().take(slot);
        let coincide = self.core.pointers().coincide();
        self.flags.mark_withdrawn(coincide);
        tracing::debug!(target: "slabbuf::ring", slot, "write rolled back");
        item
    }

    fn rewind_read(&mut self) -> bool {
        let slot = self.core.pointers().behind_read();
        if self.flags.is_full() || !self.core.slab().is_written(slot) {
            return false;
        }
        self.core.pointers_mut().retract_read();
        let coincide = self.core.pointers().coincide();
        self.flags.mark_restored(coincide);
        tracing::debug!(target: "slabbuf::ring", slot, "read rewound");
        true
    }
}
