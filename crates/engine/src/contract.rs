//! Buffer Contract
//!
//! Every buffer variant owns a [`BufferCore`] (element store, pointers,
//! automation table, result columns) and implements [`Buffer`]. Variants
//! with a pointer-driven placement algorithm also implement
//! [`SequentialBuffer`], which supplies `write`/`read` as template methods:
//!
//! ```text
//! write(item)
//!   ├─ convert + validate item         (ShapeMismatch / TypeMismatch, no side effects)
//!   ├─ fire BEFORE_WRITE automations
//!   ├─ write_operation(element)        (variant placement algorithm)
//!   └─ fire AFTER_WRITE automations
//! ```
//!
//! The BEFORE/AFTER wrapper lives once, in
//! [`Buffer::run_with_automations`]; variants only supply placement.
//!
//! # Reentrancy
//!
//! Operations are synchronous and non-reentrant. An automation that calls
//! `write`/`read` on the buffer firing it receives `ReentrantAccess`.

use slabbuf_core::{
    BufferError, BufferResult, DType, Element, ElementSpec, Event, IntoElement, Layout, Scalar,
    Shape,
};
use slabbuf_storage::{Occupancy, PointerTracker, Slab};
use std::collections::BTreeMap;
use std::fmt;

use crate::automation::{fire, Automation, AutomationResults, Automations, ResultColumn};

/// Which lifecycle pair wraps a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Wrapped by `BeforeWrite` / `AfterWrite`
    Write,
    /// Wrapped by `BeforeRead` / `AfterRead`
    Read,
}

impl Operation {
    /// The (before, after) events of this operation
    pub fn events(self) -> (Event, Event) {
        match self {
            Operation::Write => (Event::BeforeWrite, Event::AfterWrite),
            Operation::Read => (Event::BeforeRead, Event::AfterRead),
        }
    }
}

/// Outcome of a placement step
///
/// Automation results of the AFTER event are recorded only when the
/// placement touched a slot: a refused write or an empty read leaves every
/// result column as it was. The actions still run.
pub trait Placement {
    /// Check if an element was placed or taken
    fn touched(&self) -> bool;
}

impl Placement for bool {
    fn touched(&self) -> bool {
        *self
    }
}

impl Placement for Option<Element> {
    fn touched(&self) -> bool {
        self.is_some()
    }
}

/// State shared by every buffer variant
///
/// `B` is the owning variant; automations registered here receive `&mut B`.
pub struct BufferCore<B> {
    spec: ElementSpec,
    slab: Slab,
    pointers: PointerTracker,
    automations: Automations<B>,
    results: AutomationResults,
    in_flight: bool,
}

impl<B> BufferCore<B> {
    /// Core for a buffer of `capacity` slots holding elements per `spec`
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `capacity` is zero.
    pub fn new(capacity: usize, spec: ElementSpec) -> BufferResult<Self> {
        if capacity == 0 {
            return Err(BufferError::invalid_config("capacity must be positive"));
        }
        Ok(Self {
            spec,
            slab: Slab::new(capacity),
            pointers: PointerTracker::new(capacity),
            automations: Automations::new(),
            results: AutomationResults::new(),
            in_flight: false,
        })
    }

    /// Number of slots; immutable after construction
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slab.capacity()
    }

    /// Declared element shape, type and layout
    #[inline]
    pub fn spec(&self) -> &ElementSpec {
        &self.spec
    }

    /// Element store
    #[inline]
    pub fn slab(&self) -> &Slab {
        &self.slab
    }

    /// Mutable element store
    #[inline]
    pub fn slab_mut(&mut self) -> &mut Slab {
        &mut self.slab
    }

    /// Write/read pointers
    #[inline]
    pub fn pointers(&self) -> &PointerTracker {
        &self.pointers
    }

    /// Mutable write/read pointers
    #[inline]
    pub fn pointers_mut(&mut self) -> &mut PointerTracker {
        &mut self.pointers
    }

    /// Registered automations
    pub fn automations(&self) -> &Automations<B> {
        &self.automations
    }

    pub(crate) fn automations_mut(&mut self) -> &mut Automations<B> {
        &mut self.automations
    }

    /// Automation result columns
    pub fn results(&self) -> &AutomationResults {
        &self.results
    }

    /// Mutable automation result columns
    pub fn results_mut(&mut self) -> &mut AutomationResults {
        &mut self.results
    }

    /// Check if a write/read of this buffer is currently executing
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}

impl<B> fmt::Debug for BufferCore<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferCore")
            .field("spec", &self.spec)
            .field("capacity", &self.capacity())
            .field("pointers", &self.pointers)
            .field("automations", &self.automations)
            .field("result_columns", &self.results.names())
            .finish()
    }
}

/// Capabilities shared by every buffer variant
pub trait Buffer: Sized {
    /// Shared state
    fn core(&self) -> &BufferCore<Self>;

    /// Mutable shared state
    fn core_mut(&mut self) -> &mut BufferCore<Self>;

    /// Check if the buffer holds no live elements
    fn is_empty(&self) -> bool;

    /// Check if the buffer holds `size()` live elements
    fn is_full(&self) -> bool;

    /// Every slot in the variant's logical order
    ///
    /// `None` marks a slot that was never written.
    fn get_buffer(&self) -> Vec<Option<Element>>;

    /// Slot an automation result for `event` is recorded at
    ///
    /// BEFORE events address the slot a pointer currently references (the
    /// slot about to be touched); AFTER events address the slot immediately
    /// behind it (the slot just finalized).
    fn touched_slot(&self, event: Event) -> usize {
        let pointers = self.core().pointers();
        match event {
            Event::BeforeWrite => pointers.write(),
            Event::AfterWrite => pointers.behind_write(),
            Event::BeforeRead => pointers.read(),
            Event::AfterRead => pointers.behind_read(),
        }
    }

    /// Capacity in slots
    fn size(&self) -> usize {
        self.core().capacity()
    }

    /// Declared element shape
    fn shape(&self) -> &Shape {
        self.core().spec().shape()
    }

    /// Declared element type
    fn dtype(&self) -> DType {
        self.core().spec().dtype()
    }

    /// Layout hint given at construction
    fn layout(&self) -> Layout {
        self.core().spec().layout()
    }

    /// Declared element spec
    fn spec(&self) -> &ElementSpec {
        self.core().spec()
    }

    /// Empty / partial / full summary
    fn occupancy(&self) -> Occupancy {
        Occupancy::from_flags(self.is_empty(), self.is_full())
    }

    /// Element currently stored at `slot`
    fn element_at(&self, slot: usize) -> Option<&Element> {
        self.core().slab().get(slot)
    }

    /// Register `automation` under `event`
    ///
    /// Returns `Ok(false)` if an automation with the same name is already
    /// registered under `event` (registration is idempotent). The dropped
    /// registration is logged at `warn` when its guard or result column
    /// differs from the registered one. A result column
    /// named by the automation is created on first registration and kept for
    /// the lifetime of the buffer.
    ///
    /// # Errors
    ///
    /// `InvalidAutomationRegistration` for an empty name, an empty column
    /// name, or a result column on a side-effect-only automation.
    fn add_automation(&mut self, automation: Automation<Self>, event: Event) -> BufferResult<bool> {
        automation.validate()?;
        let name = automation.name().to_string();
        let column = automation.result_column().map(str::to_string);
        let capacity = self.size();

        if let Some(existing) = self.core().automations().find(event, &name) {
            if existing.is_guarded() != automation.is_guarded()
                || existing.result_column() != column.as_deref()
            {
                tracing::warn!(
                    target: "slabbuf::automation",
                    automation = %name,
                    event = %event,
                    registered_column = ?existing.result_column(),
                    dropped_column = ?column,
                    "automation name already taken by a differently configured hook, registration dropped"
                );
            } else {
                tracing::debug!(
                    target: "slabbuf::automation",
                    automation = %name,
                    event = %event,
                    "automation already registered"
                );
            }
            return Ok(false);
        }

        let core = self.core_mut();
        core.automations_mut().register(automation, event);
        if let Some(column) = &column {
            core.results_mut().ensure_column(column, capacity);
        }
        tracing::debug!(
            target: "slabbuf::automation",
            automation = %name,
            event = %event,
            column = ?column,
            "automation registered"
        );
        Ok(true)
    }

    /// Result column by name
    fn automation_results(&self, column: &str) -> Option<&ResultColumn> {
        self.core().results().column(column)
    }

    /// Mutable result column by name
    fn automation_results_mut(&mut self, column: &str) -> Option<&mut ResultColumn> {
        self.core_mut().results_mut().column_mut(column)
    }

    /// Run `placement` between the BEFORE and AFTER automations of `operation`
    ///
    /// Any validation must already have happened: this fires side effects.
    ///
    /// # Errors
    ///
    /// `ReentrantAccess` if called while an operation of this buffer is in
    /// flight; `AutomationFailed` if an action fails (placement is skipped
    /// when a BEFORE action fails).
    fn run_with_automations<T, F>(&mut self, operation: Operation, placement: F) -> BufferResult<T>
    where
        T: Placement,
        F: FnOnce(&mut Self) -> T,
    {
        if self.core().in_flight {
            return Err(BufferError::ReentrantAccess);
        }
        self.core_mut().in_flight = true;

        let (before, after) = operation.events();
        let outcome = fire(self, before, true).and_then(|()| {
            let value = placement(self);
            let touched = value.touched();
            fire(self, after, touched).map(|()| value)
        });

        self.core_mut().in_flight = false;
        outcome
    }
}

/// An element read together with the automation results of its slot
#[derive(Debug, Clone, PartialEq)]
pub struct ReadRecord {
    /// Slot the element was read from
    pub slot: usize,
    /// The element
    pub element: Element,
    /// Recorded cell of every result column for `slot`
    pub results: BTreeMap<String, Scalar>,
}

/// Buffers whose placement is driven by the write/read pointers
pub trait SequentialBuffer: Buffer {
    /// Place an admitted element; `false` if the variant refused it
    fn write_operation(&mut self, item: Element) -> bool;

    /// Take the next element; `None` when empty
    fn read_operation(&mut self) -> Option<Element>;

    /// Number of live (unread) elements
    fn len(&self) -> usize;

    /// Withdraw the newest unread element
    ///
    /// Compensation for a write that must not stand; the slot returns to the
    /// unwritten state. An element already evicted by that write cannot be
    /// restored. Fires no automations.
    fn rollback_write(&mut self) -> Option<Element>;

    /// Return the most recently read element to the unread region
    ///
    /// Refused (returns `false`) when the buffer is full or the slot behind
    /// the read pointer holds no element. Fires no automations.
    fn rewind_read(&mut self) -> bool;

    /// Write one item
    ///
    /// Returns `Ok(false)` if the variant refused the placement.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` / `TypeMismatch` before any automation fires;
    /// `AutomationFailed` / `ReentrantAccess` from the wrapper.
    fn write<I: IntoElement>(&mut self, item: I) -> BufferResult<bool> {
        let element = item.into_element(self.spec())?;
        self.run_with_automations(Operation::Write, |buffer| buffer.write_operation(element))
    }

    /// Read one element; `Ok(None)` is the empty signal
    fn read(&mut self) -> BufferResult<Option<Element>> {
        self.run_with_automations(Operation::Read, |buffer| buffer.read_operation())
    }

    /// Read one element along with the result cells of its slot
    ///
    /// Results are captured after the AFTER_READ automations ran.
    fn read_with_results(&mut self) -> BufferResult<Option<ReadRecord>> {
        let Some(element) = self.read()? else {
            return Ok(None);
        };
        let slot = self.touched_slot(Event::AfterRead);
        let results = self.core().results().row(slot);
        Ok(Some(ReadRecord {
            slot,
            element,
            results,
        }))
    }

    /// Live elements from oldest to newest, without sentinels
    fn live_elements(&self) -> Vec<Element> {
        let core = self.core();
        let pointers = core.pointers();
        (0..self.len())
            .filter_map(|i| core.slab().get(pointers.offset(pointers.read(), i)).cloned())
            .collect()
    }

    /// Most recently written element
    fn newest(&self) -> Option<&Element> {
        self.core().slab().get(self.core().pointers().behind_write())
    }
}
