//! Storage layer for slabbuf
//!
//! This crate provides the leaves every buffer variant composes:
//! - [`Slab`]: the fixed-length element store
//! - [`PointerTracker`]: write/read indices with modular advance and retract
//! - [`OccupancyFlags`] / [`Occupancy`]: empty/full bookkeeping

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod occupancy;
pub mod pointer;
pub mod slab;

pub use occupancy::{Occupancy, OccupancyFlags};
pub use pointer::PointerTracker;
pub use slab::Slab;
