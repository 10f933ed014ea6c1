//! Lifecycle events that automations attach to

use crate::error::{BufferError, BufferResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in the read/write lifecycle of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// Before an item is placed (code 0)
    BeforeWrite,
    /// After an item was placed (code 1)
    AfterWrite,
    /// Before an item is taken (code 2)
    BeforeRead,
    /// After an item was taken (code 3)
    AfterRead,
}

impl Event {
    /// All events in code order
    pub const ALL: [Event; 4] = [
        Event::BeforeWrite,
        Event::AfterWrite,
        Event::BeforeRead,
        Event::AfterRead,
    ];

    /// Resolve a legacy integer event code
    ///
    /// # Errors
    ///
    /// `InvalidAutomationRegistration` if `code` is not one of 0..=3.
    pub fn from_code(code: u8) -> BufferResult<Self> {
        Event::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| BufferError::InvalidAutomationRegistration {
                reason: format!("unknown event code {}", code),
            })
    }

    /// Integer code of this event
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Position of this event in per-event tables
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Check if this event fires before the placement runs
    pub fn is_before(self) -> bool {
        matches!(self, Event::BeforeWrite | Event::BeforeRead)
    }

    /// Check if this event belongs to a write
    pub fn is_write(self) -> bool {
        matches!(self, Event::BeforeWrite | Event::AfterWrite)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Event::BeforeWrite => "before_write",
            Event::AfterWrite => "after_write",
            Event::BeforeRead => "before_read",
            Event::AfterRead => "after_read",
        };
        f.write_str(name)
    }
}
