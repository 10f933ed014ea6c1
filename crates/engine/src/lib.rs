//! Buffer engine for slabbuf
//!
//! This crate ties the storage leaves into the behavior every buffer shares:
//! - [`Buffer`] / [`SequentialBuffer`]: the buffer contract and its
//!   write/read template methods
//! - [`BufferCore`]: the state each variant owns
//! - [`Automation`]: lifecycle callbacks and their [`ResultColumn`]s
//! - [`BufferConfig`]: declarative construction from TOML
//! - [`SharedBuffer`]: serialized access across threads

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod automation;
pub mod config;
pub mod contract;
pub mod shared;

pub use automation::{Automation, AutomationResult, AutomationResults, Automations, ResultColumn};
pub use config::{validate_namespace, BufferConfig};
pub use contract::{Buffer, BufferCore, Operation, Placement, ReadRecord, SequentialBuffer};
pub use shared::SharedBuffer;
