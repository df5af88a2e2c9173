//! Builder for constructing machines with a fluent API.

use crate::core::{State, Value, DEFAULT_HISTORY_CAPACITY};
use crate::engine::error::MachineError;
use crate::engine::machine::Machine;
use std::collections::HashMap;

/// Assembles a [`Machine`] step by step.
///
/// The same validation runs on [`MachineBuilder::build`] as on
/// [`Machine::new`]: the initial state must be defined and every
/// transition target must resolve.
///
/// # Example
///
/// ```rust
/// use signalbox::{Machine, State, Transition};
///
/// let machine = Machine::builder("door")
///     .state(State::new("Locked").on(Transition::new("unlock", "Unlocked")))
///     .state(State::new("Unlocked").on(Transition::new("lock", "Locked")))
///     .initial("Locked")
///     .context_value("uses", 0)
///     .build()?;
///
/// assert_eq!(machine.send("unlock"), "Unlocked");
/// # Ok::<(), signalbox::MachineError>(())
/// ```
pub struct MachineBuilder {
    id: String,
    states: Vec<State>,
    initial: Option<String>,
    context: HashMap<String, Value>,
    history_capacity: usize,
}

impl MachineBuilder {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            states: Vec::new(),
            initial: None,
            context: HashMap::new(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Add a state to the machine.
    pub fn state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    /// Add multiple states at once.
    pub fn states<I>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = State>,
    {
        self.states.extend(states);
        self
    }

    /// Set the initial state (required).
    pub fn initial(mut self, id: impl Into<String>) -> Self {
        self.initial = Some(id.into());
        self
    }

    /// Seed a single context entry. May be called repeatedly.
    pub fn context_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Merge a map of context entries into the seed data.
    pub fn context(mut self, data: HashMap<String, Value>) -> Self {
        self.context.extend(data);
        self
    }

    /// Override how many transition records the machine retains.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Build the machine.
    /// Returns an error if required pieces are missing or the graph
    /// does not validate.
    pub fn build(self) -> Result<Machine, MachineError> {
        let initial = self.initial.ok_or(MachineError::MissingInitialState)?;
        Machine::assemble(
            self.id,
            self.states,
            initial,
            self.context,
            self.history_capacity,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Transition;

    #[test]
    fn builder_requires_an_initial_state() {
        let result = Machine::builder("m").state(State::new("Only")).build();
        assert!(matches!(result, Err(MachineError::MissingInitialState)));
    }

    #[test]
    fn builder_validates_the_graph() {
        let result = Machine::builder("m")
            .state(State::new("Start").on(Transition::new("go", "Gone")))
            .initial("Start")
            .build();
        assert!(matches!(result, Err(MachineError::UnresolvedTargets(_))));
    }

    #[test]
    fn builder_rejects_undefined_initial() {
        let result = Machine::builder("m")
            .state(State::new("Start"))
            .initial("Missing")
            .build();
        assert!(matches!(
            result,
            Err(MachineError::InitialStateNotFound { .. })
        ));
    }

    #[test]
    fn fluent_api_builds_a_working_machine() {
        let machine = Machine::builder("door")
            .states(vec![
                State::new("Locked").on(Transition::new("unlock", "Unlocked")),
                State::new("Unlocked").on(Transition::new("lock", "Locked")),
            ])
            .initial("Locked")
            .build()
            .unwrap();

        assert_eq!(machine.id(), "door");
        assert_eq!(machine.current_state(), "Locked");
        assert_eq!(machine.send("unlock"), "Unlocked");
    }

    #[test]
    fn builder_seeds_the_context() {
        let mut extra = HashMap::new();
        extra.insert("owner".to_string(), Value::from("ops"));

        let machine = Machine::builder("m")
            .state(State::new("Only"))
            .initial("Only")
            .context_value("count", 3)
            .context(extra)
            .build()
            .unwrap();

        assert_eq!(machine.context().get("count"), Some(Value::Int(3)));
        assert_eq!(machine.context().get("owner"), Some(Value::from("ops")));
    }

    #[test]
    fn history_capacity_override_is_applied() {
        let machine = Machine::builder("m")
            .state(State::new("Loop").on(Transition::new("spin", "Loop")))
            .initial("Loop")
            .history_capacity(2)
            .build()
            .unwrap();

        for _ in 0..5 {
            machine.send("spin");
        }
        assert_eq!(machine.history().len(), 2);
        assert_eq!(machine.history().capacity(), 2);
    }
}
