//! Validation errors raised while constructing a machine.

use std::fmt;
use thiserror::Error;

/// A state whose transitions name targets missing from the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedTarget {
    /// Identifier of the state owning the dangling transitions.
    pub state: String,
    /// Referenced target identifiers with no matching state, sorted.
    pub targets: Vec<String>,
}

impl fmt::Display for UnresolvedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let targets: Vec<String> = self.targets.iter().map(|t| format!("'{t}'")).collect();
        write!(
            f,
            "state '{}' references undefined target(s) {}",
            self.state,
            targets.join(", ")
        )
    }
}

/// Errors that can occur when validating a machine graph.
///
/// Construction never hands out a partially valid machine: on any of
/// these, no `Machine` value exists.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MachineError {
    #[error("Initial state not specified. Call .initial(id) before .build()")]
    MissingInitialState,

    #[error("Initial state '{id}' is not defined in the machine")]
    InitialStateNotFound { id: String },

    /// Every offending state and every missing target is listed, so a
    /// single failed build reports all dangling references at once.
    #[error("Missing transition target state(s): {}", format_unresolved(.0))]
    UnresolvedTargets(Vec<UnresolvedTarget>),
}

fn format_unresolved(unresolved: &[UnresolvedTarget]) -> String {
    unresolved
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
