//! Integration tests for the pretty-printer

use palaver_language::pretty::{PrettyConfig, pretty_print_with_config};
use palaver_language::{parse, pretty_print};

const SCRIPT: &str = r#"
config bot_name = "Ava"
var count = 0 total = 1.5
function lookup = "order_lookup"
intent "order"
  if $user_input matches "ORDER\d+"
    call status = lookup($user_input)
    reply "Order: " + $status
  else if $user_input contains "refund"
    set count = ($count + 1) * 2
  else
    log "no order"
  end
"#;

#[test]
fn pretty_output_reparses_to_the_same_tree() {
    let script = parse(SCRIPT).unwrap();
    let printed = pretty_print(&script);
    let reparsed = parse(&printed).unwrap();
    assert_eq!(reparsed.without_spans(), script.without_spans());
}

#[test]
fn pretty_printing_is_stable() {
    let once = pretty_print(&parse(SCRIPT).unwrap());
    let twice = pretty_print(&parse(&once).unwrap());
    assert_eq!(once, twice);
}

#[test]
fn else_if_chain_prints_one_end() {
    let printed = pretty_print(&parse(SCRIPT).unwrap());
    assert!(printed.contains("  else if $user_input contains \"refund\"\n"), "{printed}");
    assert_eq!(printed.matches("end\n").count(), 1, "{printed}");
}

#[test]
fn indent_width_is_configurable() {
    let script = parse("intent \"a\" reply \"x\"").unwrap();
    let config = PrettyConfig {
        indent_width: 4,
        ..PrettyConfig::default()
    };
    assert_eq!(pretty_print_with_config(&script, config), "intent \"a\"\n    reply \"x\"\n");
}
