//! Property-based tests for the transition engine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use proptest::prelude::*;
use signalbox::{Context, Machine, State, Transition, Value};

/// Start --Trigger--> Middle --Complete--> End, with Reset back to
/// Start from both non-terminal states.
fn scenario_machine() -> Machine {
    Machine::new(
        "scenario",
        vec![
            State::new("Start")
                .on(Transition::new("Trigger", "Middle"))
                .on(Transition::new("Reset", "Start")),
            State::new("Middle")
                .on(Transition::new("Complete", "End"))
                .on(Transition::new("Reset", "Start")),
            State::new("End"),
        ],
        "Start",
    )
    .expect("scenario machine is valid")
}

/// Pure reference model of the scenario graph. Returns the target of
/// the transition `event` fires from `state`, or `None` when the event
/// is ignored.
fn model_step(state: &str, event: &str) -> Option<&'static str> {
    match (state, event) {
        ("Start", "Trigger") => Some("Middle"),
        ("Start", "Reset") => Some("Start"),
        ("Middle", "Complete") => Some("End"),
        ("Middle", "Reset") => Some("Start"),
        _ => None,
    }
}

/// Mostly known events with the occasional junk string mixed in.
fn arbitrary_event() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => Just("Trigger".to_string()),
        3 => Just("Reset".to_string()),
        3 => Just("Complete".to_string()),
        1 => "[a-z]{1,8}",
    ]
}

fn arbitrary_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e9..1.0e9f64).prop_map(Value::Float),
        "[a-z]{0,12}".prop_map(Value::Str),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Seq),
            prop::collection::hash_map("[a-z]{1,6}", inner, 0..4).prop_map(Value::Map),
        ]
    })
}

proptest! {
    #[test]
    fn unknown_events_never_change_state(event in "[a-z]{1,12}") {
        // Scenario events are capitalized, so a lowercase string can
        // never match one.
        let machine = scenario_machine();
        machine.send("Trigger");

        let before = machine.current_state();
        let after = machine.send(&event);

        prop_assert_eq!(after, before);
        prop_assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn machine_agrees_with_a_pure_model(
        events in prop::collection::vec(arbitrary_event(), 0..32)
    ) {
        let machine = scenario_machine();
        let mut expected = "Start".to_string();

        for event in &events {
            if let Some(next) = model_step(&expected, event) {
                expected = next.to_string();
            }
            let landed = machine.send(event);
            prop_assert_eq!(&landed, &expected);
        }

        prop_assert_eq!(machine.current_state(), expected);
    }

    #[test]
    fn send_always_returns_a_defined_state(
        events in prop::collection::vec(arbitrary_event(), 0..32)
    ) {
        let machine = scenario_machine();
        for event in &events {
            let landed = machine.send(event);
            prop_assert!(machine.contains_state(&landed));
        }
    }

    #[test]
    fn history_counts_exactly_the_fired_transitions(
        events in prop::collection::vec(arbitrary_event(), 0..32)
    ) {
        let machine = scenario_machine();
        let mut state = "Start".to_string();
        let mut fired = 0usize;

        for event in &events {
            if let Some(next) = model_step(&state, event) {
                state = next.to_string();
                fired += 1;
            }
            machine.send(event);
        }

        prop_assert_eq!(machine.history().len(), fired);
    }

    #[test]
    fn history_records_chain_contiguously(
        events in prop::collection::vec(arbitrary_event(), 0..32)
    ) {
        let machine = scenario_machine();
        for event in &events {
            machine.send(event);
        }

        let history = machine.history();
        let records: Vec<_> = history.records().cloned().collect();

        if let Some(first) = records.first() {
            prop_assert_eq!(first.from.as_str(), "Start");
        }
        for pair in records.windows(2) {
            prop_assert_eq!(pair[0].to.as_str(), pair[1].from.as_str());
        }
    }

    #[test]
    fn modify_accumulates_like_a_fold(
        deltas in prop::collection::vec(-100i64..=100, 0..32)
    ) {
        let ctx = Context::new();
        for delta in &deltas {
            ctx.modify("sum", |v| {
                Value::Int(v.and_then(|v| v.as_int()).unwrap_or(0) + delta)
            });
        }

        let expected: i64 = deltas.iter().sum();
        let stored = ctx.get("sum").and_then(|v| v.as_int()).unwrap_or(0);
        prop_assert_eq!(stored, expected);
    }

    #[test]
    fn values_round_trip_through_json(value in arbitrary_value()) {
        let json = serde_json::to_string(&value).unwrap();
        let deserialized: Value = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(deserialized, value);
    }

    #[test]
    fn guard_vetoes_leave_no_trace(gate in any::<bool>()) {
        let machine = Machine::builder("gated")
            .state(State::new("Shut").on(
                Transition::new("open", "Ajar").guard(move |_, _| gate),
            ))
            .state(State::new("Ajar"))
            .initial("Shut")
            .build()
            .unwrap();

        let landed = machine.send("open");
        if gate {
            prop_assert_eq!(landed, "Ajar");
            prop_assert_eq!(machine.history().len(), 1);
        } else {
            prop_assert_eq!(landed, "Shut");
            prop_assert!(machine.history().is_empty());
        }
    }
}
