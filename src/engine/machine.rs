//! The machine: validated state graph plus the locked `send` protocol.

use crate::core::{
    Context, ObserverFn, State, TransitionHistory, TransitionRecord, Value,
    DEFAULT_HISTORY_CAPACITY,
};
use crate::engine::builder::MachineBuilder;
use crate::engine::error::{MachineError, UnresolvedTarget};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Mutable portion of a machine, guarded by the transition lock.
struct Interior {
    current: String,
    observer: Option<ObserverFn>,
    history: TransitionHistory,
}

/// An event-driven state machine.
///
/// The state graph is fixed at construction and validated there: every
/// transition target must name a defined state, and the initial state
/// must exist. After construction the graph never changes; only the
/// current state, the observer registration, and the context data are
/// mutable.
///
/// All mutation goes through `&self`, so a machine can be shared across
/// threads directly or behind an `Arc`. A single transition lock
/// serializes [`Machine::send`] end to end, which makes concurrent
/// sends behave as if they arrived in some serial order with no
/// callback lost or run twice.
///
/// # Example
///
/// ```rust
/// use signalbox::{Machine, State, Transition};
///
/// let machine = Machine::new(
///     "order",
///     vec![
///         State::new("Start").on(Transition::new("Trigger", "Middle")),
///         State::new("Middle").on(Transition::new("Complete", "End")),
///         State::new("End"),
///     ],
///     "Start",
/// )?;
///
/// assert_eq!(machine.send("Trigger"), "Middle");
/// assert_eq!(machine.send("Complete"), "End");
/// assert_eq!(machine.send("Complete"), "End"); // no transition from End
/// # Ok::<(), signalbox::MachineError>(())
/// ```
pub struct Machine {
    id: String,
    states: HashMap<String, State>,
    initial: String,
    context: Context,
    interior: Mutex<Interior>,
}

impl Machine {
    /// Creates a machine with an empty context.
    ///
    /// Returns an error if `initial` is not a defined state or if any
    /// transition targets an undefined state.
    pub fn new(
        id: impl Into<String>,
        states: Vec<State>,
        initial: impl Into<String>,
    ) -> Result<Self, MachineError> {
        Self::assemble(
            id.into(),
            states,
            initial.into(),
            HashMap::new(),
            DEFAULT_HISTORY_CAPACITY,
        )
    }

    /// Creates a machine seeded with context data. The map is owned by
    /// the machine afterwards; the caller's copy cannot reach it.
    pub fn with_context(
        id: impl Into<String>,
        states: Vec<State>,
        initial: impl Into<String>,
        data: HashMap<String, Value>,
    ) -> Result<Self, MachineError> {
        Self::assemble(
            id.into(),
            states,
            initial.into(),
            data,
            DEFAULT_HISTORY_CAPACITY,
        )
    }

    /// Starts a fluent builder for a machine with this identifier.
    pub fn builder(id: impl Into<String>) -> MachineBuilder {
        MachineBuilder::new(id)
    }

    pub(crate) fn assemble(
        id: String,
        states: Vec<State>,
        initial: String,
        data: HashMap<String, Value>,
        history_capacity: usize,
    ) -> Result<Self, MachineError> {
        let mut registry: HashMap<String, State> = HashMap::with_capacity(states.len());
        for state in states {
            // Duplicate identifiers: the later definition wins.
            registry.insert(state.id().to_string(), state);
        }

        let mut state_ids: Vec<&String> = registry.keys().collect();
        state_ids.sort();

        let mut unresolved = Vec::new();
        for state_id in state_ids {
            let missing: Vec<String> = registry[state_id]
                .targets()
                .into_iter()
                .filter(|target| !registry.contains_key(*target))
                .map(str::to_string)
                .collect();
            if !missing.is_empty() {
                unresolved.push(UnresolvedTarget {
                    state: state_id.clone(),
                    targets: missing,
                });
            }
        }
        if !unresolved.is_empty() {
            return Err(MachineError::UnresolvedTargets(unresolved));
        }

        if !registry.contains_key(&initial) {
            return Err(MachineError::InitialStateNotFound { id: initial });
        }

        tracing::debug!(
            machine = %id,
            states = registry.len(),
            initial = %initial,
            "machine constructed"
        );

        Ok(Self {
            id,
            states: registry,
            context: Context::with_data(data),
            interior: Mutex::new(Interior {
                current: initial.clone(),
                observer: None,
                history: TransitionHistory::with_capacity(history_capacity),
            }),
            initial,
        })
    }

    /// Delivers an event and returns the identifier of the state the
    /// machine is in afterwards.
    ///
    /// If the current state has no transition for `event`, or the
    /// transition's guard returns false, the event is ignored and no
    /// callback runs. Otherwise the machine runs the exit action of
    /// the state it is leaving, the transition action, and the entry
    /// action of the target, in that order, then moves to the target
    /// and notifies the observer. A self-transition runs the full
    /// sequence.
    ///
    /// The whole sequence holds the machine's transition lock, so
    /// concurrent calls are serialized. Callbacks must not call `send`
    /// on the same machine; the lock is not re-entrant and doing so
    /// deadlocks.
    pub fn send(&self, event: &str) -> String {
        let mut interior = self.interior.lock();

        let state = self
            .states
            .get(&interior.current)
            .expect("current state is always a defined state");

        let Some(transition) = state.transition_for(event) else {
            tracing::trace!(
                machine = %self.id,
                state = %interior.current,
                event,
                "event ignored: no transition"
            );
            return interior.current.clone();
        };

        if !transition.allows(event, &self.context) {
            tracing::trace!(
                machine = %self.id,
                state = %interior.current,
                event,
                "event ignored: guard rejected"
            );
            return interior.current.clone();
        }

        let target = self
            .states
            .get(transition.target())
            .expect("transition targets are validated at construction");

        state.run_exit(event, &self.context);
        transition.run_action(event, &self.context);
        target.run_entry(event, &self.context);

        let from = std::mem::replace(&mut interior.current, target.id().to_string());
        interior
            .history
            .record(TransitionRecord::new(from.clone(), event, target.id()));

        tracing::debug!(
            machine = %self.id,
            from = %from,
            event,
            to = target.id(),
            "transition"
        );

        if let Some(observer) = &interior.observer {
            observer(target);
        }

        interior.current.clone()
    }

    /// Identifier of the state the machine is currently in.
    pub fn current_state(&self) -> String {
        self.interior.lock().current.clone()
    }

    /// True if the machine is currently in the state named `id`.
    pub fn matches(&self, id: &str) -> bool {
        self.interior.lock().current == id
    }

    /// Registers the observer notified after each completed transition
    /// with the state just entered. A second registration replaces the
    /// first; there is at most one observer.
    pub fn on_state_change<F>(&self, observer: F)
    where
        F: Fn(&State) + Send + Sync + 'static,
    {
        self.interior.lock().observer = Some(Arc::new(observer));
    }

    /// The machine's shared context. Guarded by its own lock, separate
    /// from the transition lock, so context access never waits for an
    /// in-flight transition to finish.
    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn initial_state(&self) -> &str {
        &self.initial
    }

    pub fn contains_state(&self, id: &str) -> bool {
        self.states.contains_key(id)
    }

    /// The state descriptor registered under `id`, if any.
    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.get(id)
    }

    /// Identifiers of every defined state, sorted.
    pub fn state_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.states.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// A copy of the transition history recorded so far.
    pub fn history(&self) -> TransitionHistory {
        self.interior.lock().history.clone()
    }
}

impl fmt::Debug for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Deliberately lock-free so Debug never blocks on a transition.
        f.debug_struct("Machine")
            .field("id", &self.id)
            .field("states", &self.state_ids())
            .field("initial", &self.initial)
            .finish_non_exhaustive()
    }
}
