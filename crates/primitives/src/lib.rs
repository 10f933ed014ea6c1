//! Primitives layer for slabbuf
//!
//! This crate implements the three buffer variants:
//! - RingBuffer: circular overwrite, the oldest element is evicted when full
//! - QueueBuffer: FIFO with an optional overwrite-on-full policy
//! - StateBuffer: random access by index or namespace key
//!
//! Each variant owns a `BufferCore` and supplies only its placement
//! algorithm and occupancy policy; automation firing lives in the engine.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod queue;
pub mod ring;
pub mod state;

pub use queue::QueueBuffer;
pub use ring::RingBuffer;
pub use state::{Namespace, Position, StateBuffer};
