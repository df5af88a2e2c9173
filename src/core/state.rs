//! State and transition descriptors making up a machine graph.
//!
//! A [`State`] is identified by a string and owns the transitions that
//! leave it, keyed by event name. A [`Transition`] names the event that
//! fires it and the target state, and optionally carries a guard and an
//! action. Both types are plain descriptions; executing them is the
//! machine's job.

use crate::core::context::Context;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Callback attached to a state or transition. Receives the name of
/// the event that fired and the machine context.
pub type ActionFn = Arc<dyn Fn(&str, &Context) + Send + Sync>;

/// Predicate deciding whether a transition may fire. Receives the
/// event name and the machine context; returning `false` vetoes the
/// transition without side effects.
pub type GuardFn = Arc<dyn Fn(&str, &Context) -> bool + Send + Sync>;

/// Callback notified with the state just entered after a completed
/// transition.
pub type ObserverFn = Arc<dyn Fn(&State) + Send + Sync>;

/// A directed edge in the machine graph.
///
/// # Example
///
/// ```rust
/// use signalbox::{Context, Transition};
///
/// let t = Transition::new("submit", "Review")
///     .guard(|_, ctx| ctx.get("draft_complete").and_then(|v| v.as_bool()) == Some(true));
///
/// let ctx = Context::new();
/// assert!(!t.allows("submit", &ctx));
/// ctx.set("draft_complete", true);
/// assert!(t.allows("submit", &ctx));
/// ```
#[derive(Clone)]
pub struct Transition {
    event: String,
    target: String,
    guard: Option<GuardFn>,
    action: Option<ActionFn>,
}

impl Transition {
    /// Creates a transition fired by `event` that moves the machine to
    /// `target`.
    pub fn new(event: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            target: target.into(),
            guard: None,
            action: None,
        }
    }

    /// Attaches a guard. A transition without a guard always fires.
    pub fn guard<F>(mut self, guard: F) -> Self
    where
        F: Fn(&str, &Context) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Arc::new(guard));
        self
    }

    /// Attaches an action, run after the source state's exit action and
    /// before the target state's entry action.
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&str, &Context) + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn has_guard(&self) -> bool {
        self.guard.is_some()
    }

    /// Evaluates the guard for `event`, treating a missing guard as
    /// permission to fire.
    pub fn allows(&self, event: &str, ctx: &Context) -> bool {
        match &self.guard {
            Some(guard) => guard(event, ctx),
            None => true,
        }
    }

    /// Runs the transition action if one is attached.
    pub fn run_action(&self, event: &str, ctx: &Context) {
        if let Some(action) = &self.action {
            action(event, ctx);
        }
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("event", &self.event)
            .field("target", &self.target)
            .field("guard", &self.guard.is_some())
            .field("action", &self.action.is_some())
            .finish()
    }
}

/// A named node in the machine graph, owning its outgoing transitions
/// and optional entry/exit actions.
///
/// Transitions are keyed by event name; registering a second transition
/// for the same event replaces the first.
///
/// # Example
///
/// ```rust
/// use signalbox::{State, Transition};
///
/// let state = State::new("Draft")
///     .on(Transition::new("submit", "Review"))
///     .on(Transition::new("discard", "Closed"))
///     .on_entry(|_, _| println!("drafting"));
///
/// assert_eq!(state.id(), "Draft");
/// assert!(state.transition_for("submit").is_some());
/// assert!(state.transition_for("publish").is_none());
/// ```
#[derive(Clone)]
pub struct State {
    id: String,
    transitions: HashMap<String, Transition>,
    entry_action: Option<ActionFn>,
    exit_action: Option<ActionFn>,
}

impl State {
    /// Creates a state with the given identifier and no transitions.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            transitions: HashMap::new(),
            entry_action: None,
            exit_action: None,
        }
    }

    /// Registers a transition, keyed by its event name. A later
    /// transition for the same event silently replaces the earlier one.
    pub fn on(mut self, transition: Transition) -> Self {
        self.transitions
            .insert(transition.event().to_string(), transition);
        self
    }

    /// Sets the action run each time the machine enters this state.
    pub fn on_entry<F>(mut self, action: F) -> Self
    where
        F: Fn(&str, &Context) + Send + Sync + 'static,
    {
        self.entry_action = Some(Arc::new(action));
        self
    }

    /// Sets the action run each time the machine leaves this state.
    pub fn on_exit<F>(mut self, action: F) -> Self
    where
        F: Fn(&str, &Context) + Send + Sync + 'static,
    {
        self.exit_action = Some(Arc::new(action));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Looks up the transition registered for `event`, if any.
    pub fn transition_for(&self, event: &str) -> Option<&Transition> {
        self.transitions.get(event)
    }

    /// Event names this state responds to, sorted for determinism.
    pub fn events(&self) -> Vec<&str> {
        let mut events: Vec<&str> = self.transitions.keys().map(String::as_str).collect();
        events.sort_unstable();
        events
    }

    /// Distinct target identifiers reachable from this state, sorted.
    pub fn targets(&self) -> Vec<&str> {
        self.transitions
            .values()
            .map(Transition::target)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub(crate) fn run_entry(&self, event: &str, ctx: &Context) {
        if let Some(action) = &self.entry_action {
            action(event, ctx);
        }
    }

    pub(crate) fn run_exit(&self, event: &str, ctx: &Context) {
        if let Some(action) = &self.exit_action {
            action(event, ctx);
        }
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("id", &self.id)
            .field("events", &self.events())
            .field("entry_action", &self.entry_action.is_some())
            .field("exit_action", &self.exit_action.is_some())
            .finish()
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
