//! Machine construction, validation, and event delivery.
//!
//! This module contains the active half of the crate:
//! - `Machine` runs transitions under a single transition lock
//! - `MachineBuilder` assembles machines fluently
//! - `MachineError` reports graph validation failures

mod builder;
mod error;
mod machine;

pub use builder::MachineBuilder;
pub use error::{MachineError, UnresolvedTarget};
pub use machine::Machine;
