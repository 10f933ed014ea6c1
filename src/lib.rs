//! slabbuf: fixed-capacity element buffers with lifecycle automations
//!
//! Three buffer variants share one contract:
//! - [`RingBuffer`]: circular overwrite, evicts the oldest element when full
//! - [`QueueBuffer`]: FIFO, refuses or evicts when full
//! - [`StateBuffer`]: random access by index or namespace key
//!
//! Every `write`/`read` is wrapped by automations registered under the four
//! lifecycle [`Event`]s. An automation can store its result in a named
//! [`ResultColumn`] aligned to buffer slots.
//!
//! # Example
//!
//! ```
//! use slabbuf::prelude::*;
//!
//! let mut ring = RingBuffer::new(3, ElementSpec::scalar(DType::Int64))?;
//! ring.add_automation(
//!     Automation::new("positive", |ring: &mut RingBuffer| {
//!         let newest = ring.newest().and_then(Element::to_scalar);
//!         Ok(newest.and_then(|v| v.as_i64()).map_or(false, |v| v > 0))
//!     })
//!     .store_result_as("positive"),
//!     Event::AfterWrite,
//! )?;
//!
//! for v in [1i64, -2, 3, 4] {
//!     ring.write(v)?;
//! }
//! assert!(ring.is_full());
//! assert_eq!(ring.read()?, Some(Element::scalar(-2i64)));
//! assert_eq!(
//!     ring.automation_results("positive").and_then(|c| c.get(1)),
//!     Some(&Scalar::Bool(false))
//! );
//! # Ok::<(), slabbuf::BufferError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;

pub use types::*;

pub use slabbuf_engine::{Automation, Buffer, SequentialBuffer, SharedBuffer};
pub use slabbuf_primitives::{QueueBuffer, RingBuffer, StateBuffer};

/// Everything needed to build, fill and drain buffers
pub mod prelude {
    pub use crate::types::*;
    pub use crate::{
        Automation, Buffer, QueueBuffer, RingBuffer, SequentialBuffer, SharedBuffer, StateBuffer,
    };
}
