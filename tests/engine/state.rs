//! The pending-input state machine and engine reset.

use palaver_engine::{Engine, EngineConfig, WAITING_FOR, WaitState};
use palaver_foundation::Value;

const SUPPORT: &str = r#"
var
    name = ""
    order = ""

intent "greeting"
    reply "What's your name?"
    set waiting_for = "name"

intent "provide_name"
    set name = $user_input
    reply "Hi $name"

intent "check_order"
    reply "Order number?"
    set waiting_for = "order_number"

intent "provide_order_number"
    set order = $user_input
    reply "Looking up $order"

intent "smalltalk"
    reply "Nice weather."
"#;

fn engine() -> Engine {
    Engine::from_source(SUPPORT).unwrap()
}

#[test]
fn name_wait_remaps_any_requested_intent() {
    let mut engine = engine();
    assert_eq!(engine.process("greeting", ""), "What's your name?");
    assert_eq!(engine.waiting_state(), Some(&WaitState::Name));

    assert_eq!(engine.process("anything", "Alice"), "Hi Alice");
    assert_eq!(engine.last_intent(), Some("provide_name"));
    assert_eq!(engine.waiting_state(), None);
    assert_eq!(engine.variable("name"), Some(&Value::from("Alice")));
}

#[test]
fn consumed_state_does_not_remap_the_next_turn() {
    let mut engine = engine();
    engine.process("greeting", "");
    engine.process("smalltalk", "Bob");
    assert_eq!(engine.process("smalltalk", "hmm"), "Nice weather.");
}

#[test]
fn order_number_wait() {
    let mut engine = engine();
    engine.process("check_order", "");
    assert_eq!(engine.waiting_state(), Some(&WaitState::OrderNumber));
    assert_eq!(engine.process("smalltalk", "ORDER7"), "Looking up ORDER7");
}

#[test]
fn waiting_for_is_readable_and_clearable() {
    let mut engine = Engine::from_source(
        r#"
intent "ask"
    set waiting_for = "issue_description"
    reply "state=$waiting_for"
intent "cancel"
    set waiting_for = "none"
    reply "state=[$waiting_for]"
"#,
    )
    .unwrap();
    assert_eq!(engine.process("ask", ""), "state=issue_description");
    // The script lacks describe_issue, so the state does not remap.
    assert_eq!(engine.process("cancel", ""), "state=[]");
    assert_eq!(engine.waiting_state(), None);
    assert_eq!(engine.variable(WAITING_FOR), Some(&Value::from("")));
}

#[test]
fn undeclared_state_falls_through_to_requested_intent() {
    let mut engine = Engine::from_source(
        "intent \"ask\"\n    set waiting_for = \"colour\"\nintent \"other\"\n    reply \"other ran\"\n",
    )
    .unwrap();
    engine.process("ask", "");
    assert_eq!(
        engine.waiting_state(),
        Some(&WaitState::Custom("colour".into()))
    );
    assert_eq!(engine.process("other", "blue"), "other ran");
    assert_eq!(
        engine.waiting_state(),
        Some(&WaitState::Custom("colour".into()))
    );
}

#[test]
fn script_declares_its_own_wait_route() {
    let mut engine = Engine::from_source(
        r#"
config
    wait_colour = "take_colour"
intent "ask"
    set waiting_for = "colour"
intent "take_colour"
    reply "You like $user_input"
"#,
    )
    .unwrap();
    engine.process("ask", "");
    assert_eq!(engine.process("whatever", "blue"), "You like blue");
    assert_eq!(engine.waiting_state(), None);
}

#[test]
fn config_routes_override_builtin_ones() {
    let source = format!("{SUPPORT}\nintent \"capture_name\"\n    reply \"Captured $user_input\"\n");
    let config = EngineConfig::new().with_wait_route(WaitState::Name, "capture_name");
    let mut engine = Engine::from_source_with_config(&source, config).unwrap();
    engine.process("greeting", "");
    assert_eq!(engine.process("x", "Zed"), "Captured Zed");
}

#[test]
fn reset_restores_defaults_and_keeps_registrations() {
    let mut engine = engine();
    engine.register("ping", |_: &[Value]| Ok(Value::from("pong")));
    engine.process("greeting", "");
    engine.process("x", "Alice");
    engine.process("check_order", "");

    engine.reset();
    assert_eq!(engine.variable("name"), Some(&Value::from("")));
    assert_eq!(engine.waiting_state(), None);
    assert_eq!(engine.input_history().count(), 0);
    assert_eq!(engine.last_intent(), None);
    assert!(engine.registry().contains("ping"));
    assert_eq!(engine.process("smalltalk", ""), "Nice weather.");
}

#[test]
fn intents_are_listed_in_declaration_order() {
    assert_eq!(
        engine().intents(),
        vec![
            "greeting",
            "provide_name",
            "check_order",
            "provide_order_number",
            "smalltalk",
        ]
    );
}
