//! Traffic Light State Machine
//!
//! This example demonstrates a cyclic machine with entry actions, a
//! guarded transition, and a context counter.
//!
//! Key concepts:
//! - Cyclic state transitions (states repeat)
//! - Context data shared between callbacks
//! - A guard that reads the context
//! - Observer notification on every transition
//!
//! Run with: cargo run --example traffic_light

use signalbox::{Machine, State, Transition, Value};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== Traffic Light State Machine ===\n");

    let machine = Machine::builder("intersection")
        .state(
            State::new("Red")
                .on_entry(|_, _| println!("  Red    (Stop)"))
                .on(Transition::new("advance", "Green")),
        )
        .state(
            State::new("Green")
                .on_entry(|_, _| println!("  Green  (Go!)"))
                .on(Transition::new("advance", "Yellow")),
        )
        .state(
            State::new("Yellow")
                .on_entry(|_, _| println!("  Yellow (Caution)"))
                .on(Transition::new("advance", "Red").action(|_, ctx| {
                    ctx.modify("cycles", |v| {
                        Value::Int(v.and_then(|v| v.as_int()).unwrap_or(0) + 1)
                    });
                }))
                // Maintenance may only interrupt after two full cycles.
                .on(
                    Transition::new("service", "Red")
                        .guard(|_, ctx| ctx.get("cycles").and_then(|v| v.as_int()).unwrap_or(0) >= 2),
                ),
        )
        .initial("Red")
        .context_value("cycles", 0)
        .build()
        .expect("traffic light graph is valid");

    machine.on_state_change(|state| {
        tracing::info!(entered = state.id(), "light changed");
    });

    println!("Initial state: {}\n", machine.current_state());

    println!("Advancing to Yellow:");
    machine.send("advance");
    machine.send("advance");

    println!("\nService request with no completed cycles (guard rejects it):");
    let landed = machine.send("service");
    println!("  still {landed}\n");

    println!("Running two full cycles:");
    for _ in 0..6 {
        machine.send("advance");
    }

    let cycles = machine
        .context()
        .get("cycles")
        .and_then(|v| v.as_int())
        .unwrap_or(0);
    println!("\nCompleted cycles: {cycles}");
    println!("Current state: {}\n", machine.current_state());

    println!("Service request again (guard allows it now):");
    let landed = machine.send("service");
    println!("  moved to {landed}");

    let path = machine
        .history()
        .path()
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" -> ");
    println!("\nPath travelled: {path}");

    println!("\n=== Example Complete ===");
}
