//! Expression evaluation.
//!
//! Evaluation is fail-soft and never returns an error: an unresolved name is
//! the empty string, a malformed `matches` pattern is `false`, and bad
//! arithmetic is `0`.

use std::collections::{BTreeMap, HashMap};

use palaver_foundation::Value;
use palaver_language::{ArithOp, CompareOp, Expr};
use regex::Regex;
use tracing::warn;

use crate::ops;
use crate::template::TemplateProcessor;

/// The variable store: name to value.
pub type Variables = BTreeMap<String, Value>;

/// Compiled `matches` patterns, keyed by pattern source.
///
/// A pattern that fails to compile is cached as `None` so the warning is
/// only logged once.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: HashMap<String, Option<Regex>>,
}

impl PatternCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the whole of `subject` matches `pattern`.
    pub fn is_full_match(&mut self, pattern: &str, subject: &str) -> bool {
        self.compiled
            .entry(pattern.to_string())
            .or_insert_with(|| compile_anchored(pattern))
            .as_ref()
            .is_some_and(|regex| regex.is_match(subject))
    }

    /// Number of distinct patterns seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    /// Returns true if no pattern has been seen yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}

/// Compiles `pattern` anchored at both ends.
///
/// The bare pattern is validated first: wrapping an unbalanced pattern such
/// as `a)|(b` would otherwise produce a different, valid regex.
fn compile_anchored(pattern: &str) -> Option<Regex> {
    let anchored = Regex::new(pattern).and_then(|_| Regex::new(&format!("^(?:{pattern})$")));
    match anchored {
        Ok(regex) => Some(regex),
        Err(err) => {
            warn!(pattern, error = %err, "malformed matches pattern evaluates to false");
            None
        }
    }
}

/// Evaluates expressions against a variable store.
pub struct Evaluator<'a> {
    variables: &'a Variables,
    patterns: &'a mut PatternCache,
    /// Renders string literals when set. Values read from variables are
    /// never rendered.
    templates: Option<&'a mut TemplateProcessor>,
    /// A name resolved ahead of the variable store.
    binding: Option<(&'a str, Value)>,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator.
    #[must_use]
    pub fn new(variables: &'a Variables, patterns: &'a mut PatternCache) -> Self {
        Self {
            variables,
            patterns,
            templates: None,
            binding: None,
        }
    }

    /// Runs every string literal through `templates` as it is evaluated.
    #[must_use]
    pub fn with_templates(mut self, templates: &'a mut TemplateProcessor) -> Self {
        self.templates = Some(templates);
        self
    }

    /// Resolves `name` to `value` regardless of the variable store.
    #[must_use]
    pub fn with_binding(mut self, name: &'a str, value: Value) -> Self {
        self.binding = Some((name, value));
        self
    }

    /// Evaluates `expr` to a value.
    pub fn eval(&mut self, expr: &Expr) -> Value {
        match expr {
            Expr::String(s, _) => match self.templates.as_deref_mut() {
                Some(templates) => Value::string(templates.render(s, self.variables)),
                None => Value::string(s.as_str()),
            },
            Expr::Int(n, _) => Value::Int(*n),
            Expr::Float(n, _) => Value::Float(*n),
            Expr::Bool(b, _) => Value::Bool(*b),
            Expr::Variable(name, _) | Expr::Identifier(name, _) => self.lookup(name),
            Expr::Arithmetic { op, lhs, rhs, .. } => {
                let lhs = self.eval(lhs);
                let rhs = self.eval(rhs);
                match op {
                    ArithOp::Add => ops::add(&lhs, &rhs),
                    ArithOp::Sub => ops::sub(&lhs, &rhs),
                    ArithOp::Mul => ops::mul(&lhs, &rhs),
                    ArithOp::Div => ops::div(&lhs, &rhs),
                }
            }
            Expr::Comparison { op, lhs, rhs, .. } => {
                let equal = ops::equals(&self.eval(lhs), &self.eval(rhs));
                Value::Bool(match op {
                    CompareOp::Eq => equal,
                    CompareOp::NotEq => !equal,
                })
            }
            Expr::Matches {
                subject, pattern, ..
            } => {
                let subject = self.eval(subject).to_text();
                Value::Bool(self.patterns.is_full_match(pattern, &subject))
            }
            Expr::Contains {
                haystack, needle, ..
            } => {
                let haystack = self.eval(haystack);
                let needle = self.eval(needle);
                Value::Bool(ops::contains(&haystack, &needle))
            }
        }
    }

    /// Evaluates `expr` and reports its truthiness.
    pub fn eval_condition(&mut self, expr: &Expr) -> bool {
        self.eval(expr).is_truthy()
    }

    fn lookup(&self, name: &str) -> Value {
        if let Some((bound, value)) = &self.binding {
            if *bound == name {
                return value.clone();
            }
        }
        self.variables.get(name).cloned().unwrap_or_default()
    }
}
