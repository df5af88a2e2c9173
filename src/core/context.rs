//! Shared key/value storage for a running machine.

use crate::core::value::Value;
use parking_lot::Mutex;
use std::collections::HashMap;

/// A thread-safe map of named [`Value`]s owned by one machine.
///
/// Every callback attached to the machine receives a reference to the
/// same context, so data written by one callback is visible to the
/// next. All access goes through a single internal mutex; this lock is
/// separate from the machine's transition lock, so readers polling the
/// context are never blocked for the duration of a transition.
///
/// [`Context::modify`] applies a closure to the stored value while the
/// lock is held, which makes read-modify-write sequences atomic even
/// when several threads target the same key.
///
/// # Example
///
/// ```rust
/// use signalbox::{Context, Value};
///
/// let ctx = Context::new();
/// ctx.set("retries", 0);
/// ctx.modify("retries", |v| {
///     Value::Int(v.and_then(|v| v.as_int()).unwrap_or(0) + 1)
/// });
/// assert_eq!(ctx.get("retries"), Some(Value::Int(1)));
/// ```
#[derive(Debug, Default)]
pub struct Context {
    data: Mutex<HashMap<String, Value>>,
}

impl Context {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context seeded with `data`. The map is owned by the
    /// context from this point on; the caller keeps no handle to it.
    pub fn with_data(data: HashMap<String, Value>) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }

    /// Returns a copy of the value stored under `key`, or `None` if the
    /// key is absent.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.data.lock().get(key).cloned()
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.lock().insert(key.into(), value.into());
    }

    /// Atomically replaces the value under `key` with the result of
    /// `f`, which receives a copy of the current value (`None` if
    /// absent). The new value is stored and returned. No other thread
    /// can observe the key between the read and the write, and a panic
    /// inside `f` leaves the previous value in place.
    pub fn modify<F>(&self, key: &str, f: F) -> Value
    where
        F: FnOnce(Option<Value>) -> Value,
    {
        let mut data = self.data.lock();
        let current = data.get(key).cloned();
        let next = f(current);
        data.insert(key.to_string(), next.clone());
        next
    }

    /// Removes the value under `key`, returning it if present.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.data.lock().remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.lock().is_empty()
    }

    /// Returns a point-in-time copy of the whole store. Later writes do
    /// not affect the returned map.
    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.data.lock().clone()
    }
}
