//! Core data types for the transition engine.
//!
//! This module holds the passive pieces of a machine:
//! - `Value` and `Context` for shared mutable data
//! - `State` and `Transition` describing the graph
//! - `TransitionHistory` recording completed transitions
//!
//! None of these execute transitions on their own; the `engine` module
//! drives them.

mod context;
mod history;
mod state;
mod value;

pub use context::Context;
pub use history::{TransitionHistory, TransitionRecord, DEFAULT_HISTORY_CAPACITY};
pub use state::{ActionFn, GuardFn, ObserverFn, State, Transition};
pub use value::Value;
