//! Built-in host functions for Palaver scripts.
//!
//! This crate provides functions organized by category:
//! - Clock functions (`get_time`, `get_date`, `get_weekday`)
//! - String functions (`upper`, `lower`, `trim`, `length`, `concat`, `extract`)
//! - Random functions (`random_int`)
//!
//! [`register_all`] installs every one of them into a [`FunctionRegistry`];
//! [`register_all_with_seed`] does the same with a reproducible `random_int`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::unnecessary_wraps)]

use chrono::Local;
use palaver_engine::FunctionRegistry;
use palaver_foundation::{Error, Result, Value};
use std::sync::Mutex;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use regex::Regex;

/// Registers every built-in function.
pub fn register_all(registry: &mut FunctionRegistry) {
    register_all_with_seed(registry, None);
}

/// Registers every built-in function, seeding `random_int` when `seed` is set.
///
/// Pass the engine's configured seed so `call random_int(...)` replays the
/// same way `{{randint:...}}` markers do.
pub fn register_all_with_seed(registry: &mut FunctionRegistry, seed: Option<u64>) {
    registry.register("get_time", get_time);
    registry.register("get_date", get_date);
    registry.register("get_weekday", get_weekday);
    registry.register("upper", upper);
    registry.register("lower", lower);
    registry.register("trim", trim);
    registry.register("length", length);
    registry.register("concat", concat);
    registry.register("extract", extract);
    registry.register("random_int", seeded_random_int(seed));
}

// =============================================================================
// Argument helpers
// =============================================================================

fn arity(name: &str, args: &[Value], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(Error::host(
            name,
            format!("expected {expected} argument(s), got {}", args.len()),
        ))
    }
}

fn text_arg(name: &str, args: &[Value]) -> Result<String> {
    arity(name, args, 1)?;
    Ok(args[0].to_text())
}

fn int_arg(name: &str, value: &Value) -> Result<i64> {
    match value.coerce_number() {
        Some(Value::Int(n)) => Ok(n),
        _ => Err(Error::host(name, format!("expected an integer, got {value:?}"))),
    }
}

// =============================================================================
// Clock
// =============================================================================

/// Current local time as `HH:MM:SS`.
///
/// # Errors
/// Fails if called with arguments.
pub fn get_time(args: &[Value]) -> Result<Value> {
    arity("get_time", args, 0)?;
    Ok(Value::string(Local::now().format("%H:%M:%S").to_string()))
}

/// Current local date as `YYYY-MM-DD`.
///
/// # Errors
/// Fails if called with arguments.
pub fn get_date(args: &[Value]) -> Result<Value> {
    arity("get_date", args, 0)?;
    Ok(Value::string(Local::now().format("%Y-%m-%d").to_string()))
}

/// Current local weekday name, e.g. `Monday`.
///
/// # Errors
/// Fails if called with arguments.
pub fn get_weekday(args: &[Value]) -> Result<Value> {
    arity("get_weekday", args, 0)?;
    Ok(Value::string(Local::now().format("%A").to_string()))
}

// =============================================================================
// Strings
// =============================================================================

/// Uppercases the textual form of its argument.
///
/// # Errors
/// Fails unless called with exactly one argument.
pub fn upper(args: &[Value]) -> Result<Value> {
    Ok(Value::string(text_arg("upper", args)?.to_uppercase()))
}

/// Lowercases the textual form of its argument.
///
/// # Errors
/// Fails unless called with exactly one argument.
pub fn lower(args: &[Value]) -> Result<Value> {
    Ok(Value::string(text_arg("lower", args)?.to_lowercase()))
}

/// Strips surrounding whitespace.
///
/// # Errors
/// Fails unless called with exactly one argument.
pub fn trim(args: &[Value]) -> Result<Value> {
    Ok(Value::string(text_arg("trim", args)?.trim()))
}

/// Number of characters in the textual form of its argument.
///
/// # Errors
/// Fails unless called with exactly one argument.
pub fn length(args: &[Value]) -> Result<Value> {
    let count = text_arg("length", args)?.chars().count();
    Ok(Value::Int(i64::try_from(count).unwrap_or(i64::MAX)))
}

/// Concatenates the textual forms of all arguments.
///
/// # Errors
/// Never fails.
pub fn concat(args: &[Value]) -> Result<Value> {
    Ok(Value::string(args.iter().map(Value::to_text).collect::<String>()))
}

/// `extract(text, pattern)`: the first capture group of the first match, or
/// the whole match when the pattern has no groups, or `""` when nothing matches.
///
/// # Errors
/// Fails on a wrong argument count or a malformed pattern.
pub fn extract(args: &[Value]) -> Result<Value> {
    arity("extract", args, 2)?;
    let text = args[0].to_text();
    let pattern = args[1].to_text();
    let regex = Regex::new(&pattern).map_err(|err| Error::host("extract", err.to_string()))?;

    let found = regex.captures(&text).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(0))
            .map(|m| m.as_str().to_string())
    });
    Ok(Value::string(found.unwrap_or_default()))
}

// =============================================================================
// Random
// =============================================================================

/// `random_int(low, high)`: a uniformly random integer in `low..=high`.
///
/// Draws from the thread RNG and ignores any engine seed; use
/// [`seeded_random_int`] for reproducible runs.
///
/// # Errors
/// Fails on a wrong argument count, non-integer bounds, or `low > high`.
pub fn random_int(args: &[Value]) -> Result<Value> {
    let (low, high) = int_range(args)?;
    Ok(Value::Int(rand::thread_rng().gen_range(low..=high)))
}

/// Builds a `random_int` that draws from its own generator, seeded from
/// `seed` or from entropy.
#[must_use]
pub fn seeded_random_int(
    seed: Option<u64>,
) -> impl Fn(&[Value]) -> Result<Value> + Send + Sync + 'static {
    let rng = Mutex::new(seed.map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64));
    move |args: &[Value]| {
        let (low, high) = int_range(args)?;
        let mut rng = rng
            .lock()
            .map_err(|_| Error::host("random_int", "generator lock poisoned"))?;
        Ok(Value::Int(rng.gen_range(low..=high)))
    }
}

fn int_range(args: &[Value]) -> Result<(i64, i64)> {
    arity("random_int", args, 2)?;
    let low = int_arg("random_int", &args[0])?;
    let high = int_arg("random_int", &args[1])?;
    if low > high {
        return Err(Error::host(
            "random_int",
            format!("empty range {low}..={high}"),
        ));
    }
    Ok((low, high))
}
