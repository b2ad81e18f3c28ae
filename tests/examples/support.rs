//! The customer-support demo, end to end.

use palaver_engine::{Engine, EngineConfig, WaitState};
use palaver_foundation::Value;
use palaver_language::{parse, pretty_print};
use palaver_runtime::{Chat, ScriptedEditor};

const SUPPORT_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/support.pal");

/// Loads the demo with the standard library and a fake order backend.
fn support_engine() -> Engine {
    let config = EngineConfig::new().with_seed(2024);
    let mut engine = Engine::from_file_with_config(SUPPORT_PATH, config).unwrap();
    palaver_stdlib::register_all(engine.registry_mut());
    engine.register("order_lookup", |args: &[Value]| {
        Ok(Value::string(format!("{} shipped yesterday", args[0])))
    });
    engine
}

#[test]
fn demo_loads_cleanly() {
    let engine = support_engine();
    assert!(engine.diagnostics().is_empty());
    assert_eq!(
        engine.intents(),
        vec![
            "greeting",
            "provide_name",
            "check_order",
            "provide_order_number",
            "return_item",
            "confirm_return",
            "report_issue",
            "describe_issue",
            "escalate",
            "store_hours",
            "unknown",
        ]
    );
    assert_eq!(engine.variable("bot_name"), Some(&Value::from("Ava")));
    assert_eq!(
        engine.wait_routes().route(&WaitState::Custom("escalation".into())),
        Some("escalate")
    );
}

#[test]
fn demo_round_trips_through_the_pretty_printer() {
    let source = std::fs::read_to_string(SUPPORT_PATH).unwrap();
    let script = parse(&source).unwrap();
    let reparsed = parse(&pretty_print(&script)).unwrap();
    assert_eq!(reparsed.without_spans(), script.without_spans());
}

#[test]
fn full_support_conversation() {
    let mut engine = support_engine();

    let greeting = engine.process("greeting", "");
    assert!(greeting.ends_with("! I'm Ava, your support assistant.\nWhat's your name?"), "{greeting}");
    assert_eq!(engine.waiting_state(), Some(&WaitState::Name));

    assert_eq!(
        engine.process("check_order", "  Alice "),
        "Nice to meet you, Alice. How can I help today?"
    );

    assert_eq!(engine.process("check_order", ""), "Sure, what's your order number?");
    assert_eq!(
        engine.process("smalltalk", "xyz"),
        "'xyz' doesn't look like an order number. They look like ORDER12345."
    );
    assert_eq!(engine.waiting_state(), None);

    engine.process("check_order", "");
    assert_eq!(
        engine.process("anything", "order42"),
        "Order ORDER42: ORDER42 shipped yesterday"
    );
    assert_eq!(engine.variable("last_order"), Some(&Value::from("ORDER42")));

    assert_eq!(
        engine.process("return_item", ""),
        "Do you want to return ORDER42? (yes/no)"
    );
    assert_eq!(engine.process("x", "maybe"), "Please answer yes or no.");
    assert_eq!(engine.waiting_state(), Some(&WaitState::ReturnConfirm));
    assert_eq!(
        engine.process("x", "yes please"),
        "Return started for ORDER42. Refunds so far: 25."
    );

    engine.process("report_issue", "");
    assert_eq!(
        engine.process("x", "The box was crushed"),
        "Thanks Alice, I've filed your issue. Want a human? Say anything to escalate."
    );
    assert_eq!(engine.variable("issue"), Some(&Value::from("The box was crushed")));
    assert!(
        engine
            .process("x", "ok")
            .starts_with("Escalated to a human agent during 9:00-17:00. Ticket week ")
    );

    assert_eq!(
        engine.process("unknown", "weather?"),
        "Sorry Alice, I can help with orders, returns, and issues."
    );
    assert_eq!(engine.variable("ghost"), None);
    assert_eq!(engine.variable("turns"), Some(&Value::Int(13)));
}

#[test]
fn return_without_order_asks_for_one_first() {
    let mut engine = support_engine();
    assert_eq!(
        engine.process("return_item", ""),
        "Which order would you like to return? Ask me to check an order first."
    );
    assert_eq!(engine.waiting_state(), None);
}

#[test]
fn chat_transcript_over_the_demo() {
    let lines = [
        "Alice",
        "where is my order",
        "ORDER9",
        "I want to return it",
        "yes",
        "I need to report an issue",
        "Package arrived damaged",
        "please",
        ":wait",
        "tell me a joke",
        "bye",
    ];
    let mut chat = Chat::with_editor(support_engine(), ScriptedEditor::new(lines));
    let mut out = Vec::new();
    chat.run_with(&mut out).unwrap();
    let transcript = String::from_utf8(out).unwrap();
    let replies: Vec<&str> = transcript.lines().collect();

    assert!(replies[0].ends_with("I'm Ava, your support assistant."), "{transcript}");
    assert_eq!(
        &replies[1..],
        [
            "What's your name?",
            "Nice to meet you, Alice. How can I help today?",
            "Sure, what's your order number?",
            "Order ORDER9: ORDER9 shipped yesterday",
            "Do you want to return ORDER9? (yes/no)",
            "Return started for ORDER9. Refunds so far: 25.",
            "I'm sorry to hear that. Please describe the problem.",
            "Thanks Alice, I've filed your issue. Want a human? Say anything to escalate.",
            replies[9],
            "not waiting",
            "Sorry Alice, I can help with orders, returns, and issues.",
            "Goodbye!",
        ]
    );
    assert!(replies[9].starts_with("Escalated to a human agent"), "{transcript}");
    assert!(chat.engine().variable("issue").is_some());
}
