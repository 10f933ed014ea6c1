//! StateBuffer primitive
//!
//! Random-access buffer: no pointer advancement, every slot is addressed
//! directly, either by integer index or (when a [`Namespace`] is configured)
//! by string key.
//!
//! # Design
//!
//! The addressing mode is fixed at construction. Using the other mode is a
//! usage error (`IndexingModeMismatch`), distinct from an unknown key
//! (`InvalidNamespaceKey`) and an out-of-range index (`IndexOutOfRange`).
//!
//! Automations fire around `write`/`read` exactly as for the sequential
//! variants; their results are recorded at the resolved slot.
//!
//! # Example
//!
//! ```ignore
//! let mut state = StateBuffer::with_namespace(["x", "y"], ElementSpec::scalar(DType::Float64))?;
//! state.write(1.5, "x")?;
//! assert_eq!(state.read("x")?, Some(Element::scalar(1.5)));
//! ```

use rustc_hash::FxHashMap;
use slabbuf_core::{BufferError, BufferResult, Element, ElementSpec, Event, IntoElement};
use slabbuf_engine::{validate_namespace, Buffer, BufferConfig, BufferCore, Operation, Placement};
use std::fmt;

/// Slot address for a [`StateBuffer`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Position {
    /// Integer slot index; negative indices never resolve
    Index(i64),
    /// Namespace key
    Key(String),
}

impl Position {
    fn mode(&self) -> &'static str {
        match self {
            Position::Index(_) => "index",
            Position::Key(_) => "key",
        }
    }
}

impl From<usize> for Position {
    fn from(index: usize) -> Self {
        Position::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

impl From<i64> for Position {
    fn from(index: i64) -> Self {
        Position::Index(index)
    }
}

impl From<i32> for Position {
    fn from(index: i32) -> Self {
        Position::Index(index.into())
    }
}

impl From<u32> for Position {
    fn from(index: u32) -> Self {
        Position::Index(index.into())
    }
}

impl From<&str> for Position {
    fn from(key: &str) -> Self {
        Position::Key(key.to_string())
    }
}

impl From<String> for Position {
    fn from(key: String) -> Self {
        Position::Key(key)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Index(index) => write!(f, "{}", index),
            Position::Key(key) => write!(f, "'{}'", key),
        }
    }
}

/// Unique slot keys, one per slot, immutable after construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    keys: Vec<String>,
    index: FxHashMap<String, usize>,
}

impl Namespace {
    /// Namespace naming each of `capacity` slots
    ///
    /// # Errors
    ///
    /// `NamespaceLengthMismatch` if `keys` does not have `capacity` entries;
    /// `InvalidConfig` if a key repeats.
    pub fn new<I, S>(keys: I, capacity: usize) -> BufferResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        validate_namespace(&keys, capacity)?;
        let index = keys
            .iter()
            .enumerate()
            .map(|(slot, key)| (key.clone(), slot))
            .collect();
        Ok(Self { keys, index })
    }

    /// Slot of `key`
    pub fn resolve(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Key naming `slot`
    pub fn key(&self, slot: usize) -> Option<&str> {
        self.keys.get(slot).map(String::as_str)
    }

    /// Keys in slot order
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if there are no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Fixed-capacity keyed/indexed store
#[derive(Debug)]
pub struct StateBuffer {
    core: BufferCore<StateBuffer>,
    namespace: Option<Namespace>,
    active_slot: Option<usize>,
}

impl StateBuffer {
    /// Index-addressed buffer of `capacity` slots
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `capacity` is zero.
    pub fn new(capacity: usize, spec: ElementSpec) -> BufferResult<Self> {
        Ok(Self {
            core: BufferCore::new(capacity, spec)?,
            namespace: None,
            active_slot: None,
        })
    }

    /// Key-addressed buffer with one slot per key
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `keys` is empty or repeats a key.
    pub fn with_namespace<I, S>(keys: I, spec: ElementSpec) -> BufferResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        let capacity = keys.len();
        let namespace = Namespace::new(keys, capacity)?;
        Ok(Self {
            core: BufferCore::new(capacity, spec)?,
            namespace: Some(namespace),
            active_slot: None,
        })
    }

    /// Create a state buffer from a validated configuration
    ///
    /// With a namespace the buffer is key-addressed, otherwise
    /// index-addressed.
    pub fn from_config(config: &BufferConfig) -> BufferResult<Self> {
        config.validate()?;
        config.warn_ignored("StateBuffer", false, true);
        match &config.namespace {
            Some(keys) => Self::with_namespace(keys.iter().cloned(), config.element_spec()),
            None => Self::new(config.capacity, config.element_spec()),
        }
    }

    /// Configured namespace, if key-addressed
    pub fn namespace(&self) -> Option<&Namespace> {
        self.namespace.as_ref()
    }

    /// Slot the in-flight `write`/`read` addresses
    ///
    /// `Some` only while automations of that operation run.
    pub fn active_slot(&self) -> Option<usize> {
        self.active_slot
    }

    /// Resolve `position` to a slot index
    ///
    /// # Errors
    ///
    /// - `IndexingModeMismatch` if the position kind does not match the
    ///   buffer's addressing mode
    /// - `InvalidNamespaceKey` for an unknown key
    /// - `IndexOutOfRange` for a negative index or one `>= size()`
    pub fn resolve(&self, position: &Position) -> BufferResult<usize> {
        match (&self.namespace, position) {
            (Some(namespace), Position::Key(key)) => {
                namespace
                    .resolve(key)
                    .ok_or_else(|| BufferError::InvalidNamespaceKey { key: key.clone() })
            }
            (None, Position::Index(index)) => usize::try_from(*index)
                .ok()
                .filter(|slot| *slot < self.size())
                .ok_or(BufferError::IndexOutOfRange {
                    index: *index,
                    size: self.size(),
                }),
            (namespace, position) => Err(BufferError::IndexingModeMismatch {
                expected: if namespace.is_some() { "key" } else { "index" },
                actual: position.mode(),
            }),
        }
    }

    /// Write `item` into the slot at `position`
    ///
    /// Always places the item once validation passes; the `bool` mirrors the
    /// sequential variants' `write`.
    ///
    /// # Errors
    ///
    /// Addressing errors (see [`resolve`](Self::resolve)) and conversion
    /// errors are raised before any automation fires. `AutomationFailed` and
    /// `ReentrantAccess` come from the automation wrapper.
    pub fn write<I, P>(&mut self, item: I, position: P) -> BufferResult<bool>
    where
        I: IntoElement,
        P: Into<Position>,
    {
        let slot = self.resolve(&position.into())?;
        let element = item.into_element(self.spec())?;
        self.run_at(slot, Operation::Write, |state| {
            state.core.slab_mut().put(slot, element);
            tracing::trace!(target: "slabbuf::state", slot, "element placed");
            true
        })
    }

    /// Read the element at `position`
    ///
    /// `Ok(None)` if the slot was never written; AFTER_READ results are then
    /// not recorded.
    pub fn read<P: Into<Position>>(&mut self, position: P) -> BufferResult<Option<Element>> {
        let slot = self.resolve(&position.into())?;
        self.run_at(slot, Operation::Read, |state| {
            tracing::trace!(target: "slabbuf::state", slot, "element taken");
            state.core.slab().get(slot).cloned()
        })
    }

    /// Element at `position`, without firing automations
    pub fn peek<P: Into<Position>>(&self, position: P) -> BufferResult<Option<&Element>> {
        let slot = self.resolve(&position.into())?;
        Ok(self.core.slab().get(slot))
    }

    fn run_at<T, F>(&mut self, slot: usize, operation: Operation, placement: F) -> BufferResult<T>
    where
        T: Placement,
        F: FnOnce(&mut Self) -> T,
    {
        if self.core.is_in_flight() {
            return Err(BufferError::ReentrantAccess);
        }
        self.active_slot = Some(slot);
        let outcome = self.run_with_automations(operation, placement);
        self.active_slot = None;
        outcome
    }
}

impl Buffer for StateBuffer {
    fn core(&self) -> &BufferCore<Self> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BufferCore<Self> {
        &mut self.core
    }

    /// No slot has been written
    fn is_empty(&self) -> bool {
        self.core.slab().written_count() == 0
    }

    /// Every slot has been written
    fn is_full(&self) -> bool {
        self.core.slab().written_count() == self.size()
    }

    /// Slots in index (namespace) order
    fn get_buffer(&self) -> Vec<Option<Element>> {
        self.core.slab().slots().to_vec()
    }

    /// The resolved slot of the in-flight operation, for every event
    fn touched_slot(&self, _event: Event) -> usize {
        self.active_slot.unwrap_or_default()
    }
}
