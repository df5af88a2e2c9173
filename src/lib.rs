//! Signalbox: a thread-safe, event-driven finite state machine engine.
//!
//! A machine is a fixed graph of string-identified states connected by
//! event-keyed transitions. Delivering an event with `send` either
//! fires the matching transition (running its callbacks in a strict
//! order) or leaves the machine untouched. The graph is validated at
//! construction, so a machine that exists can never step onto an
//! undefined state.
//!
//! # Core Concepts
//!
//! - **State**: a named node owning its outgoing transitions plus
//!   optional entry and exit actions
//! - **Transition**: an event-keyed edge with an optional guard and an
//!   optional action
//! - **Context**: a key/value store shared by every callback of one
//!   machine, with atomic read-modify-write via `modify`
//! - **Observer**: a single callback notified after each completed
//!   transition
//! - **History**: a bounded log of completed transitions
//!
//! # Example
//!
//! ```rust
//! use signalbox::{Machine, State, Transition, Value};
//!
//! let machine = Machine::builder("job")
//!     .state(
//!         State::new("Queued").on(
//!             Transition::new("start", "Running").action(|_, ctx| {
//!                 ctx.modify("runs", |v| {
//!                     Value::Int(v.and_then(|v| v.as_int()).unwrap_or(0) + 1)
//!                 });
//!             }),
//!         ),
//!     )
//!     .state(
//!         State::new("Running")
//!             .on(Transition::new("finish", "Done"))
//!             .on(Transition::new("requeue", "Queued")),
//!     )
//!     .state(State::new("Done"))
//!     .initial("Queued")
//!     .build()?;
//!
//! assert_eq!(machine.send("start"), "Running");
//! assert_eq!(machine.send("finish"), "Done");
//! assert_eq!(machine.context().get("runs"), Some(Value::Int(1)));
//! # Ok::<(), signalbox::MachineError>(())
//! ```
//!
//! # Concurrency
//!
//! A machine is `Send + Sync` and all mutation goes through `&self`.
//! One lock serializes `send` end to end; a second, separate lock
//! guards the context, so context reads and writes never wait for an
//! in-flight transition.

pub mod core;
pub mod engine;

// Re-export commonly used types
pub use crate::core::{
    ActionFn, Context, GuardFn, ObserverFn, State, Transition, TransitionHistory,
    TransitionRecord, Value, DEFAULT_HISTORY_CAPACITY,
};
pub use crate::engine::{Machine, MachineBuilder, MachineError, UnresolvedTarget};
