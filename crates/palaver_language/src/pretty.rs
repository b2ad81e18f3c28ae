//! Pretty-printer for AST nodes.
//!
//! This module converts a [`Script`] back to Palaver source. Parsing the
//! output yields a script that is structurally equal to the input (spans
//! aside).
//!
//! # Example
//!
//! ```
//! use palaver_language::{parse, pretty::pretty_print};
//!
//! let script = parse("intent \"hi\" reply \"Hello\"").unwrap();
//! assert_eq!(pretty_print(&script), "intent \"hi\"\n  reply \"Hello\"\n");
//! ```

use crate::ast::{
    Binding, CallStmt, ElseBranch, Expr, FunctionAlias, IfStmt, Intent, Script, Section, Stmt,
};

/// Configuration for pretty-printing.
#[derive(Debug, Clone)]
pub struct PrettyConfig {
    /// Number of spaces for each indentation level.
    pub indent_width: usize,
    /// Whether to put a blank line between sections.
    pub blank_line_between_sections: bool,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            blank_line_between_sections: true,
        }
    }
}

/// Pretty-print a script.
#[must_use]
pub fn pretty_print(script: &Script) -> String {
    pretty_print_with_config(script, PrettyConfig::default())
}

/// Pretty-print a script with custom configuration.
#[must_use]
pub fn pretty_print_with_config(script: &Script, config: PrettyConfig) -> String {
    let mut printer = PrettyPrinter::new(config);
    printer.print_script(script);
    printer.output
}

/// Pretty-print a single expression.
#[must_use]
pub fn pretty_print_expr(expr: &Expr) -> String {
    let mut printer = PrettyPrinter::new(PrettyConfig::default());
    printer.print_expr(expr);
    printer.output
}

/// Pretty-printer state.
struct PrettyPrinter {
    config: PrettyConfig,
    output: String,
    indent_level: usize,
}

impl PrettyPrinter {
    fn new(config: PrettyConfig) -> Self {
        Self {
            config,
            output: String::new(),
            indent_level: 0,
        }
    }

    fn print_script(&mut self, script: &Script) {
        for (i, section) in script.sections.iter().enumerate() {
            if i > 0 && self.config.blank_line_between_sections {
                self.output.push('\n');
            }
            self.print_section(section);
        }
    }

    fn print_section(&mut self, section: &Section) {
        match section {
            Section::Config(entries, _) => self.print_bindings("config", entries),
            Section::Var(entries, _) => self.print_bindings("var", entries),
            Section::Function(aliases, _) => self.print_aliases(aliases),
            Section::Intent(intent) => self.print_intent(intent),
        }
    }

    fn print_bindings(&mut self, keyword: &str, entries: &[Binding]) {
        self.output.push_str(keyword);
        self.output.push('\n');
        self.push_indent();
        for entry in entries {
            self.write_indent();
            self.output.push_str(&entry.name);
            self.output.push_str(" = ");
            self.print_expr(&entry.value);
            self.output.push('\n');
        }
        self.pop_indent();
    }

    fn print_aliases(&mut self, aliases: &[FunctionAlias]) {
        self.output.push_str("function\n");
        self.push_indent();
        for alias in aliases {
            self.write_indent();
            self.output.push_str(&alias.alias);
            self.output.push_str(" = ");
            self.print_string(&alias.target);
            self.output.push('\n');
        }
        self.pop_indent();
    }

    fn print_intent(&mut self, intent: &Intent) {
        self.output.push_str("intent ");
        self.print_string(&intent.name);
        self.output.push('\n');
        self.print_block(&intent.body);
    }

    fn print_block(&mut self, body: &[Stmt]) {
        self.push_indent();
        for stmt in body {
            self.print_stmt(stmt);
        }
        self.pop_indent();
    }

    fn print_stmt(&mut self, stmt: &Stmt) {
        self.write_indent();
        match stmt {
            Stmt::Reply(expr, _) => {
                self.output.push_str("reply ");
                self.print_expr(expr);
            }
            Stmt::Log(expr, _) => {
                self.output.push_str("log ");
                self.print_expr(expr);
            }
            Stmt::Set { name, value, .. } => {
                self.output.push_str("set ");
                self.output.push_str(name);
                self.output.push_str(" = ");
                self.print_expr(value);
            }
            Stmt::Call(call) => self.print_call(call),
            Stmt::If(stmt) => {
                self.print_if(stmt);
                self.write_indent();
                self.output.push_str("end");
            }
        }
        self.output.push('\n');
    }

    fn print_call(&mut self, call: &CallStmt) {
        self.output.push_str("call ");
        if let Some(target) = &call.target {
            self.output.push_str(target);
            self.output.push_str(" = ");
        }
        self.output.push_str(&call.function);
        self.output.push('(');
        for (i, arg) in call.args.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.print_expr(arg);
        }
        self.output.push(')');
    }

    /// Prints `if` through its last branch; the caller writes the closing `end`.
    fn print_if(&mut self, stmt: &IfStmt) {
        self.output.push_str("if ");
        self.print_expr(&stmt.condition);
        self.output.push('\n');
        self.print_block(&stmt.then_branch);
        match &stmt.else_branch {
            None => {}
            Some(ElseBranch::Else(body)) => {
                self.write_indent();
                self.output.push_str("else\n");
                self.print_block(body);
            }
            Some(ElseBranch::ElseIf(nested)) => {
                self.write_indent();
                self.output.push_str("else ");
                self.print_if(nested);
            }
        }
    }

    fn print_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::String(s, _) => self.print_string(s),
            Expr::Int(n, _) => self.output.push_str(&n.to_string()),
            Expr::Float(n, _) => self.print_float(*n),
            Expr::Bool(true, _) => self.output.push_str("true"),
            Expr::Bool(false, _) => self.output.push_str("false"),
            Expr::Variable(name, _) => {
                self.output.push('$');
                self.output.push_str(name);
            }
            Expr::Identifier(name, _) => self.output.push_str(name),
            Expr::Arithmetic { op, lhs, rhs, .. } => {
                let prec = op.precedence();
                self.print_operand(lhs, lhs.precedence() < prec);
                self.output.push(' ');
                self.output.push_str(op.symbol());
                self.output.push(' ');
                self.print_operand(rhs, rhs.precedence() <= prec);
            }
            Expr::Comparison { op, lhs, rhs, .. } => {
                self.print_operand(lhs, lhs.precedence() <= 1);
                self.output.push(' ');
                self.output.push_str(op.symbol());
                self.output.push(' ');
                self.print_operand(rhs, rhs.precedence() <= 1);
            }
            Expr::Matches {
                subject, pattern, ..
            } => {
                self.print_operand(subject, subject.precedence() <= 1);
                self.output.push_str(" matches ");
                self.print_string(pattern);
            }
            Expr::Contains {
                haystack, needle, ..
            } => {
                self.print_operand(haystack, haystack.precedence() <= 1);
                self.output.push_str(" contains ");
                self.print_operand(needle, needle.precedence() <= 1);
            }
        }
    }

    fn print_operand(&mut self, expr: &Expr, parenthesize: bool) {
        if parenthesize {
            self.output.push('(');
            self.print_expr(expr);
            self.output.push(')');
        } else {
            self.print_expr(expr);
        }
    }

    fn print_float(&mut self, n: f64) {
        // A float must keep its decimal point or it reads back as an integer.
        let s = n.to_string();
        self.output.push_str(&s);
        if !s.contains('.') {
            self.output.push_str(".0");
        }
    }

    fn print_string(&mut self, s: &str) {
        self.output.push('"');
        for c in s.chars() {
            match c {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                c => self.output.push(c),
            }
        }
        self.output.push('"');
    }

    fn write_indent(&mut self) {
        let width = self.indent_level * self.config.indent_width;
        self.output.extend(std::iter::repeat_n(' ', width));
    }

    fn push_indent(&mut self) {
        self.indent_level += 1;
    }

    fn pop_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }
}
