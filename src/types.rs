//! Public types for the slabbuf API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// ============================================================================
// Element model
// ============================================================================

pub use slabbuf_core::{DType, Layout, Scalar, Shape};
pub use slabbuf_core::{Element, ElementData, ElementSpec, ElementValue, IntoElement};

// Lifecycle events automations attach to
pub use slabbuf_core::Event;

// Errors
pub use slabbuf_core::{BoxError, BufferError, BufferResult};

// ============================================================================
// Buffer state
// ============================================================================

pub use slabbuf_storage::Occupancy;

// Automation results
pub use slabbuf_engine::{AutomationResult, ResultColumn};

// Read with results
pub use slabbuf_engine::ReadRecord;

// StateBuffer addressing
pub use slabbuf_primitives::{Namespace, Position};

// Configuration
pub use slabbuf_engine::BufferConfig;
