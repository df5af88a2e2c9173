//! Bounded log of completed transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Number of records a history retains unless configured otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Record of one completed transition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// State the machine left.
    pub from: String,
    /// Event that fired the transition.
    pub event: String,
    /// State the machine entered.
    pub to: String,
    /// When the transition completed.
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    /// Creates a record stamped with the current time.
    pub fn new(from: impl Into<String>, event: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            event: event.into(),
            to: to.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered history of a machine's completed transitions.
///
/// The history is bounded: once `capacity` records are held, recording
/// another drops the oldest. A capacity of zero keeps nothing.
///
/// # Example
///
/// ```rust
/// use signalbox::{TransitionHistory, TransitionRecord};
///
/// let mut history = TransitionHistory::new();
/// history.record(TransitionRecord::new("Start", "go", "Middle"));
/// history.record(TransitionRecord::new("Middle", "finish", "End"));
///
/// assert_eq!(history.path(), vec!["Start", "Middle", "End"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionHistory {
    records: VecDeque<TransitionRecord>,
    capacity: usize,
}

impl Default for TransitionHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionHistory {
    /// Creates an empty history with [`DEFAULT_HISTORY_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Creates an empty history retaining at most `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity,
        }
    }

    /// Appends a record, dropping the oldest if over capacity.
    pub fn record(&mut self, record: TransitionRecord) {
        self.records.push_back(record);
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }
    }

    /// Records in order from oldest to newest.
    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    /// The most recent record, if any.
    pub fn latest(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    /// States traversed, in order: the `from` of the oldest retained
    /// record, then the `to` of each record.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(first.from.as_str());
        }
        for record in &self.records {
            path.push(record.to.as_str());
        }
        path
    }

    /// Elapsed time between the oldest and newest retained records, or
    /// `None` if the history is empty.
    pub fn duration(&self) -> Option<Duration> {
        match (self.records.front(), self.records.back()) {
            (Some(first), Some(last)) => last
                .timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok(),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
