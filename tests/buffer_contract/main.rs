//! Buffer Contract Test Suite
//!
//! End-to-end scenarios across every buffer variant, driven through the
//! public `slabbuf` API only.
//!
//! ## Modules
//!
//! - **ring / queue / state scenarios**: placement and occupancy per variant
//! - **automation scenarios**: hook ordering, guards, result columns, failures
//! - **config scenarios**: building buffers from TOML
//! - **shared scenarios**: serialized access from several threads
//! - **properties**: proptest-driven FIFO, fullness and eviction properties
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test buffer_contract
//! ```

mod test_utils;

mod automation_scenarios;
mod config_scenarios;
mod properties;
mod queue_scenarios;
mod ring_scenarios;
mod shared_scenarios;
