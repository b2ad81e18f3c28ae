//! Host function calls, aliases, and the built-in library.

use std::sync::{Arc, Mutex};

use palaver_engine::{Engine, FunctionRegistry};
use palaver_foundation::{Error, ErrorKind, Value};

#[test]
fn unregistered_function_is_a_silent_no_op() {
    let mut engine = Engine::from_source(
        "intent \"g\"\n    call x = ghost()\n    reply \"after\"\n",
    )
    .unwrap();
    assert_eq!(engine.process("g", ""), "after");
    assert_eq!(engine.variable("x"), None);
}

#[test]
fn call_binds_result_and_receives_arguments() {
    let mut engine = Engine::from_source(
        "intent \"lookup\"\n    call status = order_lookup($user_input, 2)\n    reply $status\n",
    )
    .unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    engine.register("order_lookup", move |args: &[Value]| {
        log.lock().unwrap().extend(args.iter().cloned());
        Ok(Value::string(format!("{} is shipped", args[0])))
    });

    assert_eq!(engine.process("lookup", "ORDER1"), "ORDER1 is shipped");
    assert_eq!(
        *seen.lock().unwrap(),
        vec![Value::from("ORDER1"), Value::Int(2)]
    );
}

#[test]
fn failing_host_function_leaves_target_unset() {
    let mut engine = Engine::from_source(
        "var status = \"old\"\nintent \"f\"\n    call status = flaky()\n    reply \"status=$status\"\n",
    )
    .unwrap();
    engine.register("flaky", |_: &[Value]| Err(Error::host("flaky", "backend down")));
    assert_eq!(engine.process("f", ""), "status=old");
}

#[test]
fn call_without_target_runs_for_effect() {
    let mut engine = Engine::from_source("intent \"n\"\n    call notify($user_input)\n").unwrap();
    let count = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&count);
    engine.register("notify", move |_: &[Value]| {
        *counter.lock().unwrap() += 1;
        Ok(Value::empty())
    });
    engine.process("n", "a");
    engine.process("n", "b");
    assert_eq!(*count.lock().unwrap(), 2);
}

#[test]
fn function_section_aliases_resolve_first() {
    let mut engine = Engine::from_source(
        "function\n    shout = \"upper\"\nintent \"s\"\n    call loud = shout($user_input)\n    reply $loud\n",
    )
    .unwrap();
    palaver_stdlib::register_all(engine.registry_mut());
    assert_eq!(engine.process("s", "hey"), "HEY");
}

#[test]
fn stdlib_functions_from_scripts() {
    let mut engine = Engine::from_source(
        r#"
intent "t"
    call n = length($user_input)
    call id = extract($user_input, "ORDER(\d+)")
    call cleaned = trim("  padded  ")
    call both = concat($id, "-", $n)
    reply $both + " [" + $cleaned + "]"
"#,
    )
    .unwrap();
    palaver_stdlib::register_all(engine.registry_mut());
    assert_eq!(engine.process("t", "my ORDER77"), "77-10 [padded]");
}

#[test]
fn registry_reports_unregistered_calls() {
    let registry = FunctionRegistry::new();
    let err = registry.call("missing", &[]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnregisteredFunction(ref name) if name == "missing"));
}

#[test]
fn call_arguments_see_the_turn_input() {
    let mut engine = Engine::from_source(
        "intent \"a\"\n    set user_input = \"rewritten\"\n    call got = echo($user_input)\n    reply $got + \"/\" + $user_input\n",
    )
    .unwrap();
    engine.register("echo", |args: &[Value]| Ok(args[0].clone()));
    assert_eq!(engine.process("a", "typed"), "typed/rewritten");
}

#[test]
fn seeded_random_int_calls_replay() {
    let source = "intent \"roll\"\n    call n = random_int(1, 1000000)\n    reply $n\n";
    let rolls = || {
        let config = palaver_engine::EngineConfig::new().with_seed(8);
        let mut engine = Engine::from_source_with_config(source, config).unwrap();
        let seed = engine.config().seed;
        palaver_stdlib::register_all_with_seed(engine.registry_mut(), seed);
        (0..4).map(|_| engine.process("roll", "")).collect::<Vec<_>>()
    };
    assert_eq!(rolls(), rolls());
}
