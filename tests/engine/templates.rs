//! Reply templates rendered during turns.

use palaver_engine::{Engine, EngineConfig};
use proptest::prelude::*;

fn seeded(source: &str, seed: u64) -> Engine {
    Engine::from_source_with_config(source, EngineConfig::new().with_seed(seed)).unwrap()
}

#[test]
fn variables_are_interpolated_in_replies() {
    let mut engine = seeded(
        "var name = \"Ada\"\nintent \"hi\"\n    reply \"Hello $name, you said '$user_input'. $missing!\"\n",
        1,
    );
    assert_eq!(engine.process("hi", "yo"), "Hello Ada, you said 'yo'. !");
}

#[test]
fn random_choice_stays_within_options() {
    let mut engine = seeded("intent \"g\"\n    reply \"{{random:[Hi|Hello|Hey]}}\"\n", 3);
    for _ in 0..20 {
        let reply = engine.process("g", "");
        assert!(["Hi", "Hello", "Hey"].contains(&reply.as_str()), "{reply}");
    }
}

#[test]
fn same_seed_gives_same_replies() {
    let source = "intent \"r\"\n    reply \"{{randint:1..1000}} {{random:[a|b|c|d|e]}}\"\n";
    let mut a = seeded(source, 99);
    let mut b = seeded(source, 99);
    for _ in 0..10 {
        assert_eq!(a.process("r", ""), b.process("r", ""));
    }
}

#[test]
fn reset_replays_seeded_randomness() {
    let mut engine = seeded("intent \"r\"\n    reply \"{{randint:1..1000000}}\"\n", 5);
    let first: Vec<String> = (0..3).map(|_| engine.process("r", "")).collect();
    engine.reset();
    let second: Vec<String> = (0..3).map(|_| engine.process("r", "")).collect();
    assert_eq!(first, second);
}

#[test]
fn clock_markers_resolve() {
    let mut engine = seeded("intent \"c\"\n    reply \"{{timestamp}}|{{week}}\"\n", 1);
    let reply = engine.process("c", "");
    let (timestamp, week) = reply.split_once('|').unwrap();
    assert!(timestamp.parse::<i64>().unwrap() > 1_600_000_000);
    assert!((1..=53).contains(&week.parse::<u32>().unwrap()));
}

#[test]
fn malformed_markers_are_kept() {
    let mut engine = seeded("intent \"m\"\n    reply \"{{randint:9..1}} {{nope}}\"\n", 1);
    assert_eq!(engine.process("m", ""), "{{randint:9..1}} {{nope}}");
}

#[test]
fn user_text_is_echoed_verbatim() {
    let mut engine = seeded(
        "var secret = \"hunter2\"\nintent \"echo\"\n    reply \"you said: \" + $user_input\n",
        1,
    );
    assert_eq!(
        engine.process("echo", "my $secret is safe"),
        "you said: my $secret is safe"
    );
    assert_eq!(
        engine.process("echo", "it costs $ten dollars"),
        "you said: it costs $ten dollars"
    );
    assert_eq!(
        engine.process("echo", "roll {{randint:1..9}}"),
        "you said: roll {{randint:1..9}}"
    );
}

#[test]
fn stored_values_are_not_rendered_again() {
    let mut engine = seeded(
        "var secret = \"hunter2\"\nintent \"keep\"\n    set note = $user_input\nintent \"show\"\n    reply \"note: \" + $note\n    log $note\n",
        1,
    );
    engine.process("keep", "{{random:[a|b]}} $secret");
    let turn = engine.process_turn("show", "").unwrap();
    assert_eq!(turn.reply(), "note: {{random:[a|b]}} $secret");
    assert_eq!(turn.logs, vec!["{{random:[a|b]}} $secret".to_string()]);
}

proptest! {
    #[test]
    fn any_input_is_echoed_unchanged(input in "[a-z0-9 ${}:.\\[\\]|]{0,24}") {
        let mut engine = seeded(
            "var secret = \"hunter2\"\nintent \"echo\"\n    reply \">\" + $user_input\n",
            1,
        );
        prop_assert_eq!(engine.process("echo", &input), format!(">{input}"));
    }
}
