//! Reply template processing.
//!
//! Two passes over a candidate reply:
//! 1. `{{...}}` markers are resolved independently of one another.
//! 2. `$name` references are replaced with variable values.
//!
//! Neither pass can fail: an unresolved variable becomes the empty string and
//! a malformed or unknown marker is left exactly as written.
//!
//! | Marker                   | Result                                  |
//! |--------------------------|-----------------------------------------|
//! | `{{random:[a\|b\|c]}}`   | one of the options                      |
//! | `{{randint:LOW..HIGH}}`  | an integer in `LOW..=HIGH`              |
//! | `{{timestamp}}`          | Unix seconds                            |
//! | `{{week}}`               | ISO week number                         |
//! | `{{date}}` / `{{time}}`  | local `YYYY-MM-DD` / `HH:MM:SS`         |

use chrono::{Datelike, Local, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::eval::Variables;

/// Resolves template markers and variable references in reply text.
#[derive(Debug, Clone)]
pub struct TemplateProcessor {
    rng: ChaCha8Rng,
}

impl TemplateProcessor {
    /// Creates a processor. A seed makes random markers reproducible.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
        Self { rng }
    }

    /// Resolves markers, then substitutes variables.
    pub fn render(&mut self, text: &str, variables: &Variables) -> String {
        if !text.contains("{{") && !text.contains('$') {
            return text.to_string();
        }
        let resolved = self.resolve_markers(text);
        interpolate(&resolved, variables)
    }

    /// Resolves every `{{...}}` marker in `text`.
    pub fn resolve_markers(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(open) = rest.find("{{") {
            out.push_str(&rest[..open]);
            let after = &rest[open + 2..];
            let Some(close) = after.find("}}") else {
                out.push_str(&rest[open..]);
                return out;
            };
            let body = &after[..close];

            // `{{ {{week}}`: restart at the innermost opener.
            if let Some(inner) = body.rfind("{{") {
                out.push_str(&rest[open..open + 2 + inner]);
                rest = &after[inner..];
                continue;
            }

            match self.resolve_marker(body.trim()) {
                Some(value) => out.push_str(&value),
                None => out.push_str(&rest[open..open + close + 4]),
            }
            rest = &after[close + 2..];
        }

        out.push_str(rest);
        out
    }

    fn resolve_marker(&mut self, body: &str) -> Option<String> {
        let (name, arg) = match body.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (body, None),
        };
        match (name, arg) {
            ("timestamp", None) => Some(Utc::now().timestamp().to_string()),
            ("week", None) => Some(Local::now().iso_week().week().to_string()),
            ("date", None) => Some(Local::now().format("%Y-%m-%d").to_string()),
            ("time", None) => Some(Local::now().format("%H:%M:%S").to_string()),
            ("random", Some(arg)) => self.random_choice(arg),
            ("randint", Some(arg)) => self.random_int(arg),
            _ => None,
        }
    }

    fn random_choice(&mut self, arg: &str) -> Option<String> {
        let inner = arg.strip_prefix('[')?.strip_suffix(']')?;
        if inner.trim().is_empty() {
            return None;
        }
        let options: Vec<&str> = inner.split('|').map(str::trim).collect();
        let pick = self.rng.gen_range(0..options.len());
        Some(options[pick].to_string())
    }

    fn random_int(&mut self, arg: &str) -> Option<String> {
        let (low, high) = arg.split_once("..")?;
        let low: i64 = low.trim().parse().ok()?;
        let high: i64 = high.trim().parse().ok()?;
        if low > high {
            return None;
        }
        Some(self.rng.gen_range(low..=high).to_string())
    }
}

impl Default for TemplateProcessor {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Replaces `$name` references with variable values.
///
/// A `$` not followed by an identifier is kept as written.
#[must_use]
pub fn interpolate(text: &str, variables: &Variables) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let Some(&(start, first)) = chars.peek() else {
            out.push('$');
            break;
        };
        if !(first.is_alphabetic() || first == '_') {
            out.push('$');
            continue;
        }
        let mut end = start;
        while let Some(&(i, c)) = chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                end = i + c.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        if let Some(value) = variables.get(&text[start..end]) {
            out.push_str(&value.to_text());
        }
    }

    out
}
