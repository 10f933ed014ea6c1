//! Automation Subsystem
//!
//! Automations are callbacks attached to one of the four lifecycle
//! [`Event`]s of a buffer. Each carries an optional guard and an optional
//! result column.
//!
//! # Firing
//!
//! For every automation registered under the firing event, in registration
//! order:
//!
//! 1. If a guard is present and returns `false`, the automation is skipped.
//! 2. The action runs with mutable access to the buffer.
//! 3. If the automation stores results, the returned value is written into
//!    its column at the slot the event touches (see
//!    [`Buffer::touched_slot`](crate::Buffer::touched_slot)). An AFTER event
//!    whose placement touched nothing records no value.
//!
//! An action error aborts the remaining chain for that event and propagates
//! to the caller of `write`/`read` as `AutomationFailed`.
//!
//! # Result columns
//!
//! A column is created the first time an automation registers it and lives as
//! long as the buffer. It holds one cell per slot; cells are overwritten,
//! never appended.

use rustc_hash::FxHashMap;
use slabbuf_core::{BoxError, BufferError, BufferResult, Event, Scalar};
use std::collections::BTreeMap;
use std::fmt;

use crate::contract::Buffer;

/// Result type returned by automation actions
pub type AutomationResult<T> = Result<T, BoxError>;

type Action<B> = Box<dyn FnMut(&mut B) -> AutomationResult<Option<Scalar>> + Send>;
type Guard<B> = Box<dyn Fn(&B) -> bool + Send + Sync>;

/// A named callback attached to a buffer lifecycle event
///
/// # Example
///
/// ```ignore
/// let chk = Automation::new("chk", |ring: &mut RingBuffer| {
///     let sum: f64 = ring.newest().and_then(|e| e.to_f64_vec()).unwrap_or_default().iter().sum();
///     Ok(sum > 0.0)
/// })
/// .store_result_as("chk");
///
/// ring.add_automation(chk, Event::AfterWrite)?;
/// ```
pub struct Automation<B> {
    name: String,
    action: Action<B>,
    guard: Option<Guard<B>>,
    result_column: Option<String>,
    produces_result: bool,
}

impl<B> Automation<B> {
    /// Automation whose action produces a value
    ///
    /// The value is recorded only if a result column is configured with
    /// [`store_result_as`](Self::store_result_as).
    pub fn new<F, R>(name: impl Into<String>, mut action: F) -> Self
    where
        F: FnMut(&mut B) -> AutomationResult<R> + Send + 'static,
        R: Into<Scalar>,
    {
        Self {
            name: name.into(),
            action: Box::new(move |buffer| action(buffer).map(|value| Some(value.into()))),
            guard: None,
            result_column: None,
            produces_result: true,
        }
    }

    /// Side-effect-only automation
    ///
    /// Effects produce no value and therefore cannot store results.
    pub fn effect<F>(name: impl Into<String>, mut action: F) -> Self
    where
        F: FnMut(&mut B) -> AutomationResult<()> + Send + 'static,
    {
        Self {
            name: name.into(),
            action: Box::new(move |buffer| action(buffer).map(|()| None)),
            guard: None,
            result_column: None,
            produces_result: false,
        }
    }

    /// Only run the action when `guard` returns `true` for the current state
    pub fn when<G>(mut self, guard: G) -> Self
    where
        G: Fn(&B) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Box::new(guard));
        self
    }

    /// Record the action's value in the named result column
    pub fn store_result_as(mut self, column: impl Into<String>) -> Self {
        self.result_column = Some(column.into());
        self
    }

    /// Registration name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Result column, if results are stored
    pub fn result_column(&self) -> Option<&str> {
        self.result_column.as_deref()
    }

    /// Check if a guard is attached
    pub fn is_guarded(&self) -> bool {
        self.guard.is_some()
    }

    pub(crate) fn validate(&self) -> BufferResult<()> {
        if self.name.trim().is_empty() {
            return Err(BufferError::InvalidAutomationRegistration {
                reason: "automation name must not be empty".to_string(),
            });
        }
        match &self.result_column {
            Some(column) if column.trim().is_empty() => {
                Err(BufferError::InvalidAutomationRegistration {
                    reason: format!("automation '{}' has an empty result column name", self.name),
                })
            }
            Some(column) if !self.produces_result => {
                Err(BufferError::InvalidAutomationRegistration {
                    reason: format!(
                        "effect automation '{}' produces no value to store in '{}'",
                        self.name, column
                    ),
                })
            }
            _ => Ok(()),
        }
    }
}

impl<B> fmt::Debug for Automation<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Automation")
            .field("name", &self.name)
            .field("guarded", &self.guard.is_some())
            .field("result_column", &self.result_column)
            .finish()
    }
}

/// Per-event automation table of one buffer
pub struct Automations<B> {
    hooks: [Vec<Automation<B>>; 4],
}

impl<B> Automations<B> {
    /// Empty table
    pub fn new() -> Self {
        Self {
            hooks: Default::default(),
        }
    }

    /// Append `automation` under `event`
    ///
    /// Returns `false` without changing anything if an automation with the
    /// same name is already registered under `event`.
    pub fn register(&mut self, automation: Automation<B>, event: Event) -> bool {
        let hooks = &mut self.hooks[event.index()];
        if hooks.iter().any(|hook| hook.name == automation.name) {
            return false;
        }
        hooks.push(automation);
        true
    }

    /// Automation registered as `name` under `event`
    pub fn find(&self, event: Event, name: &str) -> Option<&Automation<B>> {
        self.hooks[event.index()].iter().find(|hook| hook.name == name)
    }

    /// Number of automations registered under `event`
    pub fn len(&self, event: Event) -> usize {
        self.hooks[event.index()].len()
    }

    /// Check if no automation is registered under any event
    pub fn is_empty(&self) -> bool {
        self.hooks.iter().all(Vec::is_empty)
    }

    /// Names registered under `event`, in firing order
    pub fn names(&self, event: Event) -> Vec<&str> {
        self.hooks[event.index()]
            .iter()
            .map(|hook| hook.name.as_str())
            .collect()
    }

    fn take(&mut self, event: Event) -> Vec<Automation<B>> {
        std::mem::take(&mut self.hooks[event.index()])
    }

    /// Put fired hooks back ahead of anything registered while they ran
    fn restore(&mut self, event: Event, hooks: Vec<Automation<B>>) {
        let slot = &mut self.hooks[event.index()];
        let registered_meanwhile = std::mem::replace(slot, hooks);
        for hook in registered_meanwhile {
            if !slot.iter().any(|existing| existing.name == hook.name) {
                slot.push(hook);
            }
        }
    }
}

impl<B> Default for Automations<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> fmt::Debug for Automations<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for event in Event::ALL {
            map.entry(&event, &self.names(event));
        }
        map.finish()
    }
}

/// One result cell per buffer slot
#[derive(Debug, Clone, PartialEq)]
pub struct ResultColumn {
    cells: Box<[Option<Scalar>]>,
}

impl ResultColumn {
    /// Column of `capacity` unset cells
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: vec![None; capacity].into_boxed_slice(),
        }
    }

    /// Value recorded for `slot`
    pub fn get(&self, slot: usize) -> Option<&Scalar> {
        self.cells.get(slot).and_then(Option::as_ref)
    }

    /// Overwrite the cell for `slot`; out-of-range slots are ignored
    pub fn set(&mut self, slot: usize, value: Scalar) {
        if let Some(cell) = self.cells.get_mut(slot) {
            *cell = Some(value);
        }
    }

    /// Clear the cell for `slot`
    pub fn clear(&mut self, slot: usize) {
        if let Some(cell) = self.cells.get_mut(slot) {
            *cell = None;
        }
    }

    /// All cells in slot order
    pub fn cells(&self) -> &[Option<Scalar>] {
        &self.cells
    }

    /// Number of cells (the buffer capacity)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the column has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Named result columns of one buffer
#[derive(Debug, Clone, Default)]
pub struct AutomationResults {
    columns: FxHashMap<String, ResultColumn>,
}

impl AutomationResults {
    /// No columns
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `name` with `capacity` cells unless it already exists
    pub fn ensure_column(&mut self, name: &str, capacity: usize) {
        self.columns
            .entry(name.to_string())
            .or_insert_with(|| ResultColumn::new(capacity));
    }

    /// Column by name
    pub fn column(&self, name: &str) -> Option<&ResultColumn> {
        self.columns.get(name)
    }

    /// Mutable column by name
    pub fn column_mut(&mut self, name: &str) -> Option<&mut ResultColumn> {
        self.columns.get_mut(name)
    }

    /// Store `value` in column `name` at `slot`
    pub fn record(&mut self, name: &str, slot: usize, value: Scalar) {
        if let Some(column) = self.columns.get_mut(name) {
            column.set(slot, value);
        }
    }

    /// Every recorded cell for `slot`, keyed by column name
    pub fn row(&self, slot: usize) -> BTreeMap<String, Scalar> {
        self.columns
            .iter()
            .filter_map(|(name, column)| column.get(slot).map(|v| (name.clone(), v.clone())))
            .collect()
    }

    /// Column names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.columns.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if no column exists
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Fire every automation registered under `event`
///
/// With `record` unset the actions run but their values are dropped.
pub(crate) fn fire<B: Buffer>(buffer: &mut B, event: Event, record: bool) -> BufferResult<()> {
    let mut hooks = buffer.core_mut().automations_mut().take(event);
    if hooks.is_empty() {
        return Ok(());
    }
    let outcome = run_hooks(buffer, event, record, &mut hooks);
    buffer.core_mut().automations_mut().restore(event, hooks);
    outcome
}

fn run_hooks<B: Buffer>(
    buffer: &mut B,
    event: Event,
    record: bool,
    hooks: &mut [Automation<B>],
) -> BufferResult<()> {
    for hook in hooks.iter_mut() {
        if let Some(guard) = &hook.guard {
            if !guard(&*buffer) {
                tracing::trace!(
                    target: "slabbuf::automation",
                    automation = %hook.name,
                    event = %event,
                    "automation skipped by guard"
                );
                continue;
            }
        }

        let value = match (hook.action)(&mut *buffer) {
            Ok(value) => value,
            Err(source) => {
                tracing::warn!(
                    target: "slabbuf::automation",
                    automation = %hook.name,
                    event = %event,
                    error = %source,
                    "automation failed"
                );
                return Err(BufferError::AutomationFailed {
                    name: hook.name.clone(),
                    event,
                    source,
                });
            }
        };

        if let (Some(column), Some(value)) = (&hook.result_column, value) {
            if !record {
                tracing::trace!(
                    target: "slabbuf::automation",
                    automation = %hook.name,
                    column = %column,
                    "no slot touched, result dropped"
                );
                continue;
            }
            let slot = buffer.touched_slot(event);
            tracing::trace!(
                target: "slabbuf::automation",
                automation = %hook.name,
                column = %column,
                slot,
                "automation result recorded"
            );
            buffer.core_mut().results_mut().record(column, slot, value);
        }
    }
    Ok(())
}
